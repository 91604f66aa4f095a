//! # gplot-model - the state a plotting session edits
//!
//! - [`PlotSettings`]: view, grid, axes, ranges and other plot-wide options
//! - [`Graph`]: one plotted expression and its drawing options
//! - [`Parameter`]: a named value that expressions can refer to
//! - [`Workspace`]: all of the above plus the function [`Namespace`](gplot_expr::Namespace),
//!   addressed through [`PropertyPath`]s
//!
//! Every object implements [`Reflect`](gplot_props::Reflect), so its fields
//! are read and written as text.

pub mod error;
pub mod graph;
pub mod parameter;
pub mod path;
pub mod settings;
pub mod workspace;

pub use error::ModelError;
pub use graph::{Graph, GraphKind, GraphStyle, MAX_SAMPLES, Sample};
pub use parameter::Parameter;
pub use path::{PropertyPath, Target};
pub use settings::{Axes, Grid, PlotSettings, View};
pub use workspace::{Symbols, Workspace};
