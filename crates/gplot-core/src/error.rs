//! Errors raised by the value codec.

use thiserror::Error;

/// A textual value could not be converted into its typed form.
///
/// Every variant carries the offending text so the message can be shown to
/// the user verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("not a valid boolean: \"{0}\"")]
    InvalidBoolean(String),

    #[error("not a valid percentage: \"{0}\"")]
    InvalidPercent(String),

    #[error("not a real number: \"{0}\"")]
    NotReal(String),

    #[error("not an integer: \"{0}\"")]
    NotInteger(String),

    #[error("not a valid range: \"{0}\"")]
    InvalidRange(String),
}
