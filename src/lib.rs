//! # gplot
//!
//! Reflective property registry and textual command protocol for an
//! interactive plotter.
//!
//! | Crate | Role |
//! |---|---|
//! | [`core`] | value codec, ranges, the evaluator seam |
//! | [`expr`] | infix expressions and user functions |
//! | [`props`] | properties, registries, enum binding |
//! | [`model`] | plot settings, graphs, parameters, workspace |
//! | [`command`] | arguments, grammar, messages, dispatcher |
//! | [`session`] | handlers, configuration, line execution |

pub use gplot_command as command;
pub use gplot_core as core;
pub use gplot_expr as expr;
pub use gplot_model as model;
pub use gplot_props as props;
pub use gplot_session as session;

pub use gplot_session::{Reply, Session};
