//! Expression engine for gplot.
//!
//! The property core treats evaluation as an opaque service. This crate is
//! the service the shell ships with:
//! - [`parse`] turns infix text such as `a*sin(x)^2` into an [`Expr`]
//! - [`evaluate`] computes an [`Expr`] against a [`Scope`]
//! - [`Namespace`] stores user function definitions keyed by name and arity

pub mod ast;
pub mod builtins;
pub mod error;
pub mod eval;
pub mod namespace;
pub mod parse;

pub use ast::{BinOp, Expr};
pub use builtins::{is_builtin, is_reserved};
pub use error::NamespaceError;
pub use eval::{Bindings, MAX_DEPTH, Scope, evaluate, evaluate_str};
pub use namespace::{Function, Namespace};
pub use parse::{ExprParser, ExprToken, MAX_NESTING, is_identifier, parse, tokenize};
