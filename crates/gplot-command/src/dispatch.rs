//! Routing decoded messages to handlers.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, error, trace};

use crate::argument::{ArgKind, Argument};
use crate::error::{CommandError, ProtocolError};
use crate::message::{CommandId, CommandState, Message, MessageKind};

/// How a handler finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Take the generic success path: arguments cleared, acknowledged.
    Continue,
    /// The handler already stored its response via [`Invocation::reply`].
    Replied,
}

/// A command handler over state `S`.
pub type Handler<S> = fn(&mut S, &mut Invocation<'_>) -> Result<Flow, CommandError>;

/// The message a handler is working on, with typed argument access.
///
/// Accessors fail with a [`ProtocolError`] when the argument is missing or
/// has another type: the parser and the handler disagree, which is never
/// the user's fault.
pub struct Invocation<'m> {
    message: &'m mut Message,
}

impl<'m> Invocation<'m> {
    pub fn new(message: &'m mut Message) -> Self {
        Self { message }
    }

    pub fn id(&self) -> CommandId {
        self.message.id
    }

    pub fn args(&self) -> &[Argument] {
        &self.message.args
    }

    pub fn len(&self) -> usize {
        self.message.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.message.args.is_empty()
    }

    pub fn get_arg(&self, index: usize) -> Result<&Argument, ProtocolError> {
        self.message
            .args
            .get(index)
            .ok_or(ProtocolError::MissingArgument {
                id: self.message.id,
                index,
            })
    }

    pub fn get_str(&self, index: usize) -> Result<&str, ProtocolError> {
        let arg = self.get_arg(index)?;
        arg.as_str().ok_or_else(|| self.mismatch(index, ArgKind::Str, arg))
    }

    pub fn get_int(&self, index: usize) -> Result<i64, ProtocolError> {
        let arg = self.get_arg(index)?;
        arg.as_int().ok_or_else(|| self.mismatch(index, ArgKind::Int, arg))
    }

    pub fn get_real(&self, index: usize) -> Result<f64, ProtocolError> {
        let arg = self.get_arg(index)?;
        arg.as_real()
            .ok_or_else(|| self.mismatch(index, ArgKind::Real, arg))
    }

    /// An optional trailing string argument.
    pub fn opt_str(&self, index: usize) -> Result<Option<&str>, ProtocolError> {
        if index < self.len() {
            self.get_str(index).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Add a line of output.
    pub fn emit(&mut self, line: impl Into<String>) {
        self.message.output.push(line.into());
    }

    /// Store `values` as the response arguments and finish early.
    pub fn reply(&mut self, values: impl IntoIterator<Item = String>) -> Flow {
        self.message.args = values.into_iter().map(Argument::Str).collect();
        self.message.kind = MessageKind::Return;
        Flow::Replied
    }

    fn mismatch(&self, index: usize, expected: ArgKind, found: &Argument) -> ProtocolError {
        ProtocolError::ArgumentType {
            id: self.message.id,
            index,
            expected,
            found: found.kind(),
        }
    }
}

/// Routes messages by [`CommandId`] to handlers over state `S`.
pub struct Dispatcher<S> {
    handlers: BTreeMap<CommandId, Handler<S>>,
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<S> fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl<S> Dispatcher<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `id`, replacing any previous one.
    pub fn register(&mut self, id: CommandId, handler: Handler<S>) -> &mut Self {
        self.handlers.insert(id, handler);
        self
    }

    pub fn handles(&self, id: CommandId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Run `message` against `state`.
    ///
    /// The outcome is written into the message: on success its kind becomes
    /// `Return`, on failure `Error` with the error text. The same outcome is
    /// returned so callers can tell protocol errors from user errors.
    pub fn dispatch(&self, state: &mut S, message: &mut Message) -> Result<(), CommandError> {
        let result = self.run(state, message);
        match &result {
            Ok(()) => {
                message.kind = MessageKind::Return;
                message.error = None;
                advance(message, CommandState::Completed);
            }
            Err(err) => {
                if err.is_protocol() {
                    error!(id = %message.id, %err, "protocol error");
                } else {
                    debug!(id = %message.id, %err, "command failed");
                }
                message.kind = MessageKind::Error;
                message.error = Some(err.to_string());
                message.output.clear();
                advance(message, CommandState::Failed);
            }
        }
        result
    }

    fn run(&self, state: &mut S, message: &mut Message) -> Result<(), CommandError> {
        if message.kind != MessageKind::Request {
            return Err(ProtocolError::NotARequest {
                id: message.id,
                kind: message.kind,
            }
            .into());
        }
        let handler = self
            .handlers
            .get(&message.id)
            .copied()
            .ok_or(ProtocolError::NoHandler(message.id))?;

        advance(message, CommandState::Dispatched);
        let flow = handler(state, &mut Invocation::new(message))?;
        if flow == Flow::Continue {
            message.args.clear();
        }
        Ok(())
    }
}

fn advance(message: &mut Message, next: CommandState) {
    trace!(id = %message.id, from = ?message.state, to = ?next, "message state");
    message.state = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        total: i64,
    }

    fn add(state: &mut Counter, inv: &mut Invocation<'_>) -> Result<Flow, CommandError> {
        let amount = inv.get_int(0)?;
        if amount < 0 {
            return Err(CommandError::user("amount must not be negative"));
        }
        state.total += amount;
        inv.emit(format!("total {}", state.total));
        Ok(Flow::Continue)
    }

    fn get(state: &mut Counter, inv: &mut Invocation<'_>) -> Result<Flow, CommandError> {
        Ok(inv.reply([state.total.to_string()]))
    }

    fn dispatcher() -> Dispatcher<Counter> {
        let mut d = Dispatcher::new();
        d.register(CommandId::Delete, add).register(CommandId::Get, get);
        d
    }

    #[test]
    fn success_clears_arguments() {
        let d = dispatcher();
        let mut state = Counter::default();
        let mut m = Message::request(CommandId::Delete, [Argument::Int(5)]);
        d.dispatch(&mut state, &mut m).unwrap();
        assert_eq!(m.kind, MessageKind::Return);
        assert_eq!(m.state, CommandState::Completed);
        assert!(m.args.is_empty());
        assert_eq!(m.output, ["total 5"]);
    }

    #[test]
    fn reply_keeps_values() {
        let d = dispatcher();
        let mut state = Counter { total: 7 };
        let mut m = Message::request(CommandId::Get, []);
        d.dispatch(&mut state, &mut m).unwrap();
        assert_eq!(m.kind, MessageKind::Return);
        assert_eq!(m.args.to_vec(), [Argument::from("7")]);
    }

    #[test]
    fn user_failure_is_reported_and_state_survives() {
        let d = dispatcher();
        let mut state = Counter::default();
        let mut m = Message::request(CommandId::Delete, [Argument::Int(-1)]);
        let err = d.dispatch(&mut state, &mut m).unwrap_err();
        assert!(!err.is_protocol());
        assert_eq!(m.kind, MessageKind::Error);
        assert_eq!(m.state, CommandState::Failed);
        assert_eq!(m.error.as_deref(), Some("amount must not be negative"));

        let mut next = Message::request(CommandId::Delete, [Argument::Int(2)]);
        d.dispatch(&mut state, &mut next).unwrap();
        assert_eq!(state.total, 2);
    }

    #[test]
    fn shape_mismatch_is_a_protocol_error() {
        let d = dispatcher();
        let mut state = Counter::default();

        let mut missing = Message::request(CommandId::Delete, []);
        let err = d.dispatch(&mut state, &mut missing).unwrap_err();
        assert_eq!(
            err,
            CommandError::Protocol(ProtocolError::MissingArgument {
                id: CommandId::Delete,
                index: 0
            })
        );

        let mut wrong = Message::request(CommandId::Delete, [Argument::from("two")]);
        assert!(d.dispatch(&mut state, &mut wrong).unwrap_err().is_protocol());
        assert_eq!(wrong.kind, MessageKind::Error);
    }

    #[test]
    fn unhandled_and_answered_messages_are_refused() {
        let d = dispatcher();
        let mut state = Counter::default();
        let mut m = Message::request(CommandId::Quit, []);
        assert_eq!(
            d.dispatch(&mut state, &mut m),
            Err(CommandError::Protocol(ProtocolError::NoHandler(CommandId::Quit)))
        );

        let mut done = Message::request(CommandId::Get, []);
        d.dispatch(&mut state, &mut done).unwrap();
        done.state = CommandState::Parsed;
        assert!(d.dispatch(&mut state, &mut done).unwrap_err().is_protocol());
    }

    #[test]
    fn optional_arguments() {
        let mut m = Message::request(CommandId::Help, []);
        let inv = Invocation::new(&mut m);
        assert_eq!(inv.opt_str(0), Ok(None));
        let mut m = Message::request(CommandId::Help, [Argument::from("plot")]);
        let inv = Invocation::new(&mut m);
        assert_eq!(inv.opt_str(0), Ok(Some("plot")));
        assert_eq!(
            inv.get_real(0).unwrap_err().to_string(),
            "Help: argument 0 is string, expected real"
        );
    }
}
