//! Errors raised by property access.

use gplot_core::CodecError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("unknown property '{0}'")]
    Unknown(String),

    #[error("property '{0}' is read-only")]
    ReadOnly(String),

    #[error("\"{text}\" is not a valid {description}")]
    InvalidChoice { text: String, description: String },

    #[error("{name} must be {limit}, got \"{text}\"")]
    OutOfBounds {
        name: String,
        limit: String,
        text: String,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("{0}")]
    Invalid(String),
}
