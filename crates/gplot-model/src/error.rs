//! Errors raised by workspace operations.

use gplot_core::EvalError;
use gplot_expr::NamespaceError;
use gplot_props::PropertyError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("'{0}' is not a property path")]
    InvalidPath(String),

    #[error("no such target '{0}'")]
    UnknownTarget(String),

    #[error("no graph {index} (there {})", graph_count(.count))]
    GraphIndex { index: i64, count: usize },

    #[error("'{0}' is not defined")]
    NotFound(String),

    #[error("{0} graphs cannot be sampled")]
    NotSampleable(String),

    #[error("sample count must be between 2 and {max}, got {count}")]
    SampleCount { count: i64, max: usize },
}

fn graph_count(count: &usize) -> String {
    match *count {
        0 => "are none".to_string(),
        1 => "is 1".to_string(),
        n => format!("are {n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_index_message() {
        let err = ModelError::GraphIndex { index: 3, count: 1 };
        assert_eq!(err.to_string(), "no graph 3 (there is 1)");
        let err = ModelError::GraphIndex { index: 1, count: 0 };
        assert_eq!(err.to_string(), "no graph 1 (there are none)");
    }

    #[test]
    fn property_errors_pass_through() {
        let err: ModelError = PropertyError::Unknown("fgo".to_string()).into();
        assert_eq!(err.to_string(), "unknown property 'fgo'");
    }
}
