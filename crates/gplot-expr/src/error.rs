//! Errors raised when editing a namespace.

use gplot_core::EvalError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum NamespaceError {
    #[error("'{0}' is reserved")]
    Reserved(String),

    #[error("'{0}' is not a valid name")]
    InvalidName(String),

    #[error("parameter '{0}' appears more than once")]
    DuplicateParameter(String),

    #[error("invalid definition of '{name}': {source}")]
    Body {
        name: String,
        #[source]
        source: EvalError,
    },
}
