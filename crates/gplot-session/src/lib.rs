//! # gplot-session - a workspace driven by command lines
//!
//! [`Session`] wires the standard [`Grammar`](gplot_command::Grammar) to a
//! [`Dispatcher`](gplot_command::Dispatcher) whose handlers operate on a
//! [`Workspace`](gplot_model::Workspace):
//!
//! ```no_run
//! use gplot_session::Session;
//!
//! let mut session = Session::new().unwrap();
//! session.execute("fog = 50%");
//! let reply = session.execute("get fog");
//! assert_eq!(reply.lines, ["50%"]);
//! ```
//!
//! Shell settings live in `gplot.toml`, see [`SessionConfig`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod session;

pub use config::{LogSection, SessionConfig, ShellSection};
pub use error::ConfigError;
pub use handlers::{State, standard_dispatcher};
pub use session::{Reply, Session};
