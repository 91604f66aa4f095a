//! Typed command arguments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type tag of an [`Argument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    Int,
    Real,
    Str,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Int => "integer",
            ArgKind::Real => "real",
            ArgKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// One command argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Argument {
    Int(i64),
    Real(f64),
    Str(String),
}

impl Argument {
    pub fn kind(&self) -> ArgKind {
        match self {
            Argument::Int(_) => ArgKind::Int,
            Argument::Real(_) => ArgKind::Real,
            Argument::Str(_) => ArgKind::Str,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Argument::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Argument::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Int(value)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Real(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Str(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Str(value)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Int(value) => write!(f, "{value}"),
            Argument::Real(value) => write!(f, "{value}"),
            Argument::Str(value) => f.write_str(value),
        }
    }
}
