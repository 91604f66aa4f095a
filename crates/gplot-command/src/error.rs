//! Error types for parsing and dispatch.

use std::fmt;

use thiserror::Error;

use crate::argument::ArgKind;
use crate::message::{CommandId, MessageKind};

/// The parser and a handler disagree about a message's shape.
///
/// Never caused by user input: a descriptor built arguments the handler
/// does not expect, or a message was routed that nothing handles.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("{id}: missing argument {index}")]
    MissingArgument { id: CommandId, index: usize },

    #[error("{id}: argument {index} is {found}, expected {expected}")]
    ArgumentType {
        id: CommandId,
        index: usize,
        expected: ArgKind,
        found: ArgKind,
    },

    #[error("no handler for {0}")]
    NoHandler(CommandId),

    #[error("{id}: cannot dispatch a {kind:?} message")]
    NotARequest { id: CommandId, kind: MessageKind },
}

/// Why a command failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("internal error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Bad input or a rejected operation, shown to the user as is.
    #[error("{0}")]
    User(String),
}

impl CommandError {
    pub fn user(message: impl fmt::Display) -> Self {
        CommandError::User(message.to_string())
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, CommandError::Protocol(_))
    }
}

/// A descriptor table that would make routing or matching ambiguous.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("command {0} is registered twice")]
    DuplicateId(CommandId),

    #[error("command name '{0}' is registered twice")]
    DuplicateName(String),
}
