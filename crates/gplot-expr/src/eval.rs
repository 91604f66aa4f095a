//! Expression evaluation.

use gplot_core::EvalError;

use crate::ast::Expr;
use crate::builtins;
use crate::namespace::Function;
use crate::parse::parse;

/// Maximum nesting of user function calls.
pub const MAX_DEPTH: usize = 64;

/// Resolves the names an expression refers to.
pub trait Scope {
    fn variable(&self, name: &str) -> Option<f64>;

    fn function(&self, name: &str, arity: usize) -> Option<&Function>;

    /// Arities under which `name` is defined as a function, if any.
    fn arities(&self, _name: &str) -> Vec<usize> {
        Vec::new()
    }
}

/// A scope that binds a few extra variables on top of a parent scope.
///
/// Graph sampling uses this to bind `x` (or `t`) while evaluating a graph's
/// expression against the workspace.
pub struct Bindings<'a> {
    parent: &'a dyn Scope,
    names: &'a [&'a str],
    values: &'a [f64],
}

impl<'a> Bindings<'a> {
    pub fn new(parent: &'a dyn Scope, names: &'a [&'a str], values: &'a [f64]) -> Self {
        Self {
            parent,
            names,
            values,
        }
    }
}

impl Scope for Bindings<'_> {
    fn variable(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| self.values.get(i).copied())
            .or_else(|| self.parent.variable(name))
    }

    fn function(&self, name: &str, arity: usize) -> Option<&Function> {
        self.parent.function(name, arity)
    }

    fn arities(&self, name: &str) -> Vec<usize> {
        self.parent.arities(name)
    }
}

/// Local variables of one user function call.
struct Frame<'a> {
    names: &'a [String],
    values: &'a [f64],
}

impl Frame<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i).copied())
    }
}

/// Evaluate an expression. The result may be non-finite (`1/0`).
pub fn evaluate(expr: &Expr, scope: &dyn Scope) -> Result<f64, EvalError> {
    let top = Frame {
        names: &[],
        values: &[],
    };
    eval_at(expr, scope, &top, 0)
}

/// Parse and evaluate `text`, rejecting non-finite results.
pub fn evaluate_str(text: &str, scope: &dyn Scope) -> Result<f64, EvalError> {
    let expr = parse(text)?;
    let value = evaluate(&expr, scope)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::Undefined)
    }
}

fn eval_at(
    expr: &Expr,
    globals: &dyn Scope,
    frame: &Frame<'_>,
    depth: usize,
) -> Result<f64, EvalError> {
    match expr {
        Expr::Num(value) => Ok(*value),
        Expr::Var(name) => frame
            .lookup(name)
            .or_else(|| globals.variable(name))
            .or_else(|| builtins::constant(name))
            .ok_or_else(|| EvalError::UnknownSymbol(name.clone())),
        Expr::Neg(operand) => Ok(-eval_at(operand, globals, frame, depth)?),
        Expr::Binary(op, left, right) => {
            let l = eval_at(left, globals, frame, depth)?;
            let r = eval_at(right, globals, frame, depth)?;
            Ok(op.apply(l, r))
        }
        Expr::Call(name, args) => {
            let values = args
                .iter()
                .map(|arg| eval_at(arg, globals, frame, depth))
                .collect::<Result<Vec<_>, _>>()?;
            call(name, &values, globals, depth)
        }
    }
}

fn call(name: &str, args: &[f64], globals: &dyn Scope, depth: usize) -> Result<f64, EvalError> {
    if let Some(arity) = builtins::function_arity(name) {
        if arity != args.len() {
            return Err(EvalError::Arity {
                name: name.to_string(),
                expected: arity,
                got: args.len(),
            });
        }
        return builtins::call(name, args).ok_or(EvalError::Undefined);
    }

    let Some(function) = globals.function(name, args.len()) else {
        return match globals.arities(name).first() {
            Some(&expected) => Err(EvalError::Arity {
                name: name.to_string(),
                expected,
                got: args.len(),
            }),
            None => Err(EvalError::UnknownSymbol(name.to_string())),
        };
    };

    if depth >= MAX_DEPTH {
        return Err(EvalError::DepthExceeded);
    }
    let frame = Frame {
        names: &function.params,
        values: args,
    };
    eval_at(&function.body, globals, &frame, depth + 1)
}
