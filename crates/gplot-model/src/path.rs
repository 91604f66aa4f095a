//! Property paths: `name`, `<n>.name` and `<ident>.name`.

use std::fmt;

use gplot_expr::is_identifier;

use crate::error::ModelError;

/// The object a path points into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Plot,
    /// 1-based graph index as written.
    Graph(i64),
    Parameter(String),
}

impl Target {
    /// Parse a bare target: empty means the plot, digits a graph, an
    /// identifier a parameter.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Target::Plot);
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            return text
                .parse::<i64>()
                .map(Target::Graph)
                .map_err(|_| ModelError::UnknownTarget(text.to_string()));
        }
        if is_identifier(text) {
            return Ok(Target::Parameter(text.to_string()));
        }
        Err(ModelError::UnknownTarget(text.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Plot => write!(f, "plot"),
            Target::Graph(index) => write!(f, "graph {index}"),
            Target::Parameter(name) => write!(f, "parameter {name}"),
        }
    }
}

/// `[target.]name`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyPath {
    pub target: Target,
    pub name: String,
}

impl PropertyPath {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let text = text.trim();
        let invalid = || ModelError::InvalidPath(text.to_string());
        let (target, name) = match text.split_once('.') {
            Some((target, name)) => {
                let target = Target::parse(target).map_err(|_| invalid())?;
                if target == Target::Plot {
                    return Err(invalid());
                }
                (target, name)
            }
            None => (Target::Plot, text),
        };
        if !is_identifier(name) {
            return Err(invalid());
        }
        Ok(Self {
            target,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Plot => write!(f, "{}", self.name),
            Target::Graph(index) => write!(f, "{index}.{}", self.name),
            Target::Parameter(owner) => write!(f, "{owner}.{}", self.name),
        }
    }
}
