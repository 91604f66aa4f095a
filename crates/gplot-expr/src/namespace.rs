//! User function definitions.

use std::collections::BTreeMap;
use std::fmt;

use gplot_core::{EvalError, Evaluator};
use tracing::debug;

use crate::ast::Expr;
use crate::builtins;
use crate::error::NamespaceError;
use crate::eval::{Scope, evaluate_str};
use crate::parse::{is_identifier, parse};

/// A user-defined function such as `f(x,y) = x^2+y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Expr,
    /// Body as the user typed it.
    pub source: String,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `f(x,y)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(","))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.signature(), self.source)
    }
}

/// Function definitions keyed by name and arity.
///
/// The same name may be defined once per arity, so `f(x)` and `f(x,y)` can
/// coexist.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    functions: BTreeMap<(String, usize), Function>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or replace `name(params) = body`.
    ///
    /// The body is parsed immediately. Names it references are resolved at
    /// evaluation time, so forward and recursive references are allowed.
    pub fn define(
        &mut self,
        name: &str,
        params: Vec<String>,
        body: &str,
    ) -> Result<&Function, NamespaceError> {
        if !is_identifier(name) {
            return Err(NamespaceError::InvalidName(name.to_string()));
        }
        if builtins::is_reserved(name) {
            return Err(NamespaceError::Reserved(name.to_string()));
        }
        for (i, param) in params.iter().enumerate() {
            if !is_identifier(param) {
                return Err(NamespaceError::InvalidName(param.clone()));
            }
            if builtins::is_builtin(param) {
                return Err(NamespaceError::Reserved(param.clone()));
            }
            if params[..i].contains(param) {
                return Err(NamespaceError::DuplicateParameter(param.clone()));
            }
        }
        let source = body.trim();
        let expr = parse(source).map_err(|source| NamespaceError::Body {
            name: name.to_string(),
            source,
        })?;

        let function = Function {
            name: name.to_string(),
            params,
            body: expr,
            source: source.to_string(),
        };
        debug!(definition = %function, "define function");
        let key = (function.name.clone(), function.arity());
        self.functions.insert(key.clone(), function);
        Ok(&self.functions[&key])
    }

    /// Look up a function by name and arity.
    pub fn find(&self, name: &str, arity: usize) -> Option<&Function> {
        self.functions.get(&(name.to_string(), arity))
    }

    /// All arities `name` is defined with, ascending.
    pub fn arities(&self, name: &str) -> Vec<usize> {
        self.functions
            .keys()
            .filter(|(n, _)| n == name)
            .map(|&(_, arity)| arity)
            .collect()
    }

    pub fn remove(&mut self, name: &str, arity: usize) -> Option<Function> {
        self.functions.remove(&(name.to_string(), arity))
    }

    /// Definitions ordered by name, then arity.
    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Scope for Namespace {
    fn variable(&self, _name: &str) -> Option<f64> {
        None
    }

    fn function(&self, name: &str, arity: usize) -> Option<&Function> {
        self.find(name, arity)
    }

    fn arities(&self, name: &str) -> Vec<usize> {
        Namespace::arities(self, name)
    }
}

impl Evaluator for Namespace {
    fn evaluate(&self, text: &str) -> Result<f64, EvalError> {
        evaluate_str(text, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_find_by_arity() {
        let mut ns = Namespace::new();
        ns.define("f", vec!["u".into()], "u^2").unwrap();
        ns.define("f", vec!["u".into(), "v".into()], "u*v").unwrap();

        assert_eq!(ns.find("f", 1).unwrap().source, "u^2");
        assert_eq!(ns.find("f", 2).unwrap().signature(), "f(u,v)");
        assert!(ns.find("f", 3).is_none());
        assert_eq!(ns.arities("f"), vec![1, 2]);
        assert_eq!(ns.len(), 2);
    }

    #[test]
    fn display_shows_definition() {
        let mut ns = Namespace::new();
        let f = ns.define("g", vec!["x".into()], "  sin(x)+1 ").unwrap();
        assert_eq!(f.to_string(), "g(x) = sin(x)+1");
    }

    #[test]
    fn reserved_and_invalid_names() {
        let mut ns = Namespace::new();
        assert_eq!(
            ns.define("sin", vec!["u".into()], "u"),
            Err(NamespaceError::Reserved("sin".into()))
        );
        assert_eq!(
            ns.define("x", vec![], "1"),
            Err(NamespaceError::Reserved("x".into()))
        );
        assert_eq!(
            ns.define("2f", vec![], "1"),
            Err(NamespaceError::InvalidName("2f".into()))
        );
        assert_eq!(
            ns.define("f", vec!["pi".into()], "pi"),
            Err(NamespaceError::Reserved("pi".into()))
        );
        assert_eq!(
            ns.define("f", vec!["u".into(), "u".into()], "u"),
            Err(NamespaceError::DuplicateParameter("u".into()))
        );
        assert!(ns.is_empty());
    }

    #[test]
    fn bad_body_is_rejected_without_defining() {
        let mut ns = Namespace::new();
        let err = ns.define("f", vec!["u".into()], "u+").unwrap_err();
        assert!(matches!(err, NamespaceError::Body { ref name, .. } if name == "f"));
        assert!(ns.arities("f").is_empty());
    }

    #[test]
    fn namespace_is_an_evaluator() {
        let mut ns = Namespace::new();
        ns.define("double", vec!["u".into()], "2*u").unwrap();
        assert_eq!(ns.evaluate("double(4)+1"), Ok(9.0));
        assert!(ns.evaluate("double").is_err());
    }

    #[test]
    fn remove_by_arity() {
        let mut ns = Namespace::new();
        ns.define("f", vec!["u".into()], "u").unwrap();
        ns.define("h", vec![], "3").unwrap();
        assert!(ns.remove("f", 2).is_none());
        assert!(ns.remove("f", 1).is_some());
        assert_eq!(ns.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["h"]);
        assert!(ns.remove("h", 0).is_some());
        assert!(ns.is_empty());
    }
}
