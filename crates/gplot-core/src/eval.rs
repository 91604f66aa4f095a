//! The evaluator seam.
//!
//! Real-valued properties never parse arithmetic themselves: they hand the
//! text to an [`Evaluator`], which owns the expression language and the
//! variable namespace. The codec only cares whether a finite real came back.

use thiserror::Error;

/// Failure reported by an [`Evaluator`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("'{name}' expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("result is undefined")]
    Undefined,

    #[error("recursion limit exceeded")]
    DepthExceeded,
}

/// Evaluates expression text to a real number.
pub trait Evaluator {
    /// Evaluate `text`. A successful result may still be non-finite; callers
    /// that need a real number must check.
    fn evaluate(&self, text: &str) -> Result<f64, EvalError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, text: &str) -> Result<f64, EvalError> {
        (**self).evaluate(text)
    }
}

/// An evaluator that only understands numeric literals.
///
/// Useful where no namespace is available, e.g. when loading defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralEvaluator;

impl Evaluator for LiteralEvaluator {
    fn evaluate(&self, text: &str) -> Result<f64, EvalError> {
        let text = text.trim();
        text.parse::<f64>()
            .map_err(|_| EvalError::Syntax(format!("expected a number, found '{}'", text)))
    }
}
