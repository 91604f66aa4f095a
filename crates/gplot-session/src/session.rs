//! Line-at-a-time execution.

use gplot_command::{
    Argument, CommandError, Dispatcher, Grammar, GrammarError, Message, MessageKind, Parsed,
};
use gplot_model::Workspace;
use tracing::debug;

use crate::handlers::{State, standard_dispatcher};

/// Result of executing one line, ready to print.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub error: Option<String>,
    /// The session asked to end.
    pub quit: bool,
}

impl Reply {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Handler output, followed by the reply values of commands that
    /// answer with values.
    fn from_message(message: &Message, quit: bool) -> Self {
        if message.kind == MessageKind::Error {
            return Self {
                error: message.error.clone(),
                quit,
                ..Self::default()
            };
        }
        let values = message.args.iter().map(Argument::to_string);
        Self {
            lines: message.output.iter().cloned().chain(values).collect(),
            error: None,
            quit,
        }
    }
}

/// Grammar, dispatcher and workspace in one place.
pub struct Session {
    grammar: Grammar,
    dispatcher: Dispatcher<State>,
    state: State,
}

impl Session {
    pub fn new() -> Result<Self, GrammarError> {
        Ok(Self::with_grammar(Grammar::standard()?))
    }

    pub fn with_grammar(grammar: Grammar) -> Self {
        let state = State::new(grammar.descriptors().to_vec());
        Self {
            grammar,
            dispatcher: standard_dispatcher(),
            state,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.state.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.state.workspace
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// `quit` has been executed.
    pub fn is_finished(&self) -> bool {
        self.state.quit
    }

    /// Parse and run one line. Never fails: every problem becomes an error
    /// reply and the session stays usable.
    pub fn execute(&mut self, line: &str) -> Reply {
        match self.grammar.parse(line) {
            Parsed::Empty => Reply::default(),
            Parsed::Unrecognized => {
                debug!(line, "unrecognized input");
                Reply::failure(format!("unrecognized command: {}", line.trim()))
            }
            Parsed::PossibleAssignment => {
                debug!(line, "malformed assignment");
                Reply::failure(format!("not a valid assignment: {}", line.trim()))
            }
            Parsed::Command(mut message) => {
                // The outcome is also recorded in the message.
                let _ = self.dispatch(&mut message);
                Reply::from_message(&message, self.state.quit)
            }
        }
    }

    /// Run an already decoded message and return it with its response
    /// filled in.
    pub fn execute_message(&mut self, mut message: Message) -> Message {
        let _ = self.dispatch(&mut message);
        message
    }

    /// Run `message`, reporting the error as well as recording it.
    pub fn dispatch(&mut self, message: &mut Message) -> Result<(), CommandError> {
        self.dispatcher.dispatch(&mut self.state, message)
    }

    /// Run each line in order; stops early on `quit`.
    pub fn run_all<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> Vec<Reply> {
        let mut replies = Vec::new();
        for line in lines {
            let reply = self.execute(line);
            let quit = reply.quit;
            replies.push(reply);
            if quit {
                break;
            }
        }
        replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gplot_command::{CommandId, CommandState};

    fn session() -> Session {
        Session::new().unwrap()
    }

    #[test]
    fn assignment_then_get() {
        let mut s = session();
        assert_eq!(s.execute("fog = 50%"), Reply::default());
        assert_eq!(s.execute("get fog").lines, ["50%"]);
    }

    #[test]
    fn unrecognized_and_stray_equals() {
        let mut s = session();
        assert_eq!(
            s.execute("frobnicate").error.as_deref(),
            Some("unrecognized command: frobnicate")
        );
        assert_eq!(
            s.execute("3 = 4").error.as_deref(),
            Some("not a valid assignment: 3 = 4")
        );
        assert!(!s.execute("").is_error());
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let mut s = session();
        assert!(s.execute("set grid sideways").is_error());
        assert!(s.execute("get 4.width").is_error());
        s.execute("grid = full");
        assert_eq!(s.execute("g grid").lines, ["full"]);
    }

    #[test]
    fn quit_stops_run_all() {
        let mut s = session();
        let replies = s.run_all(["plot x", "quit", "plot x^2"]);
        assert_eq!(replies.len(), 2);
        assert!(replies[1].quit);
        assert!(s.is_finished());
        assert_eq!(s.workspace().graphs().len(), 1);
    }

    #[test]
    fn decoded_messages_skip_the_grammar() {
        let mut s = session();
        let request = Message::request(
            CommandId::Assign,
            [Argument::from("a"), Argument::from("4")],
        );
        let done = s.execute_message(request);
        assert_eq!(done.state, CommandState::Completed);
        assert_eq!(s.workspace().parameter("a").map(|p| p.value), Some(4.0));
    }

    #[test]
    fn protocol_errors_are_reported_distinctly() {
        let mut s = session();
        let mut bad = Message::request(CommandId::Sample, [Argument::from("1")]);
        let err = s.dispatch(&mut bad).unwrap_err();
        assert!(err.is_protocol());
        assert_eq!(bad.kind, MessageKind::Error);
        assert!(bad.error.unwrap().starts_with("internal error"));
        assert!(!s.execute("eval 1+").error.unwrap().starts_with("internal error"));
    }
}
