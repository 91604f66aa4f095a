//! # gplot-command - the textual command protocol
//!
//! A line of input travels through three stages:
//!
//! 1. [`Grammar::parse`] matches it against the registered
//!    [`CommandDescriptor`]s and produces a [`Message`]: a [`CommandId`] plus
//!    typed [`Argument`]s at fixed positions.
//! 2. The message is plain data. It can be handed to another thread or
//!    serialized to JSON and back.
//! 3. [`Dispatcher::dispatch`] routes it by identifier to a handler, which
//!    reads its arguments through the typed accessors of [`Invocation`].
//!    Failures of any kind come back as an error message; the dispatcher
//!    itself never fails the caller.
//!
//! Argument positions per command are fixed and documented on
//! [`CommandId`].

pub mod argument;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod grammar;
pub mod message;

pub use argument::{ArgKind, Argument};
pub use descriptor::{CommandDescriptor, InputMode, standard_descriptors};
pub use dispatch::{Dispatcher, Flow, Handler, Invocation};
pub use error::{CommandError, GrammarError, ProtocolError};
pub use grammar::{Grammar, ParseInput, ParseOutcome, Parsed};
pub use message::{Args, CommandId, CommandState, Message, MessageKind};
