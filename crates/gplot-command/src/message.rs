//! Decoded commands as they travel between parser and dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::argument::Argument;

/// Arguments of one message. Most commands take at most four.
pub type Args = SmallVec<[Argument; 4]>;

/// Stable command identifiers. Routing uses these, never names.
///
/// Argument positions:
///
/// | Id | Arguments |
/// |---|---|
/// | `Help` | `[0] Str` command name, optional |
/// | `Quit` | none |
/// | `Get` | `[0..n] Str` property paths, n >= 1 |
/// | `Set` | `[0] Str` path, `[1] Str` value |
/// | `Props` | `[0] Str` target, optional |
/// | `Values` | `[0] Str` path |
/// | `Plot` | `[0] Str` expression |
/// | `Graphs` | none |
/// | `Delete` | `[0] Int` graph index |
/// | `Sample` | `[0] Int` graph index, `[1] Real` from, `[2] Real` to, `[3] Int` count |
/// | `Eval` | `[0] Str` expression |
/// | `Defs` | none |
/// | `Undef` | `[0] Str` name, `[1] Int` arity |
/// | `Reset` | none |
/// | `Define` | `[0] Str` name, `[1] Str` comma-joined parameters, `[2] Str` body |
/// | `Assign` | `[0] Str` path, `[1] Str` value |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandId {
    Help,
    Quit,
    Get,
    Set,
    Props,
    Values,
    Plot,
    Graphs,
    Delete,
    Sample,
    Eval,
    Defs,
    Undef,
    Reset,
    Define,
    Assign,
}

impl CommandId {
    pub const ALL: [CommandId; 16] = [
        CommandId::Help,
        CommandId::Quit,
        CommandId::Get,
        CommandId::Set,
        CommandId::Props,
        CommandId::Values,
        CommandId::Plot,
        CommandId::Graphs,
        CommandId::Delete,
        CommandId::Sample,
        CommandId::Eval,
        CommandId::Defs,
        CommandId::Undef,
        CommandId::Reset,
        CommandId::Define,
        CommandId::Assign,
    ];
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Request,
    Return,
    Error,
}

/// Lifecycle of a message. Transitions only move forward:
/// `Received -> Parsed -> Dispatched -> Completed | Failed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandState {
    #[default]
    Received,
    Parsed,
    Dispatched,
    Completed,
    Failed,
}

impl CommandState {
    pub fn is_finished(self) -> bool {
        matches!(self, CommandState::Completed | CommandState::Failed)
    }
}

/// A decoded command, and after dispatch, its response.
///
/// Contains only plain data, so it can cross threads or be serialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: CommandId,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub state: CommandState,
    #[serde(default)]
    pub args: Args,
    /// Lines produced by the handler.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Message {
    /// A parsed request ready for dispatch.
    pub fn request(id: CommandId, args: impl IntoIterator<Item = Argument>) -> Self {
        Self {
            id,
            kind: MessageKind::Request,
            state: CommandState::Parsed,
            args: args.into_iter().collect(),
            output: Vec::new(),
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a message received from a transport. A message that arrives
    /// without a state is treated as parsed.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let mut message: Message = serde_json::from_str(text)?;
        if message.state == CommandState::Received {
            message.state = CommandState::Parsed;
        }
        Ok(message)
    }
}
