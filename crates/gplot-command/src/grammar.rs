//! Matching input lines against command descriptors.

use gplot_core::{find_top_level, is_balanced};
use tracing::trace;

use crate::descriptor::{CommandDescriptor, InputMode, standard_descriptors};
use crate::error::GrammarError;
use crate::message::{Args, Message};

/// What a descriptor's parser sees.
#[derive(Clone, Debug)]
pub struct ParseInput<'a> {
    /// The whole line, trimmed.
    pub line: &'a str,
    /// Everything after the command word, unsplit and trimmed.
    pub rest: &'a str,
    /// `rest` split on whitespace.
    pub tokens: Vec<&'a str>,
}

impl<'a> ParseInput<'a> {
    /// Split `line` into command word and input.
    pub fn new(line: &'a str) -> (&'a str, Self) {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let input = Self {
            line,
            rest,
            tokens: rest.split_whitespace().collect(),
        };
        (word, input)
    }
}

/// A descriptor parser's verdict. Rejection is not an error: the grammar
/// simply moves on to the next descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseOutcome {
    Accepted(Args),
    NoMatch,
}

/// Result of parsing one line.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed {
    Command(Message),
    /// Nothing matched, but the line has a top-level `=`.
    PossibleAssignment,
    Unrecognized,
    Empty,
}

/// Ordered descriptor table.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    descriptors: Vec<CommandDescriptor>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// All standard commands, keywords first and line patterns last.
    pub fn standard() -> Result<Self, GrammarError> {
        let mut grammar = Self::new();
        for descriptor in standard_descriptors() {
            grammar.register(descriptor)?;
        }
        Ok(grammar)
    }

    /// Append a descriptor. Identifiers must be unique, and so must names
    /// and aliases, ignoring case.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), GrammarError> {
        if self.descriptors.iter().any(|d| d.id == descriptor.id) {
            return Err(GrammarError::DuplicateId(descriptor.id));
        }
        for word in descriptor.words() {
            if self.find(word).is_some() {
                return Err(GrammarError::DuplicateName(word.to_string()));
            }
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// The keyword descriptor called `word` (name or alias).
    pub fn find(&self, word: &str) -> Option<&CommandDescriptor> {
        self.descriptors.iter().find(|d| d.answers_to(word))
    }

    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }

    /// Try every descriptor in order; the first that accepts wins.
    pub fn parse(&self, line: &str) -> Parsed {
        let (word, input) = ParseInput::new(line);
        if input.line.is_empty() {
            return Parsed::Empty;
        }
        for descriptor in &self.descriptors {
            let applies = match descriptor.mode {
                InputMode::Tokens | InputMode::Raw => descriptor.answers_to(word),
                InputMode::Line => true,
            };
            if !applies {
                continue;
            }
            if let ParseOutcome::Accepted(args) = (descriptor.parser)(&input) {
                trace!(id = %descriptor.id, "line matched");
                return Parsed::Command(Message::request(descriptor.id, args));
            }
        }
        if find_top_level(input.line, |c| c == '=').is_some() {
            Parsed::PossibleAssignment
        } else {
            Parsed::Unrecognized
        }
    }
}

// ============================================================================
// Shape checks shared by descriptor parsers
// ============================================================================

/// Optional sign followed by digits.
pub(crate) fn looks_like_integer(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// A finite decimal literal.
pub(crate) fn looks_like_real(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn looks_like_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `name`, `<n>.name` or `<ident>.name`.
pub(crate) fn looks_like_path(token: &str) -> bool {
    match token.split_once('.') {
        Some((target, name)) => {
            let target_ok = (!target.is_empty() && target.bytes().all(|b| b.is_ascii_digit()))
                || looks_like_identifier(target);
            target_ok && looks_like_identifier(name)
        }
        None => looks_like_identifier(token),
    }
}

/// `name(a,b)` -> `("name", ["a", "b"])`. Empty parentheses give no
/// parameters.
pub(crate) fn looks_like_call(text: &str) -> Option<(&str, Vec<&str>)> {
    let (name, tail) = text.trim().split_once('(')?;
    let inner = tail.strip_suffix(')')?;
    let name = name.trim_end();
    if !looks_like_identifier(name) {
        return None;
    }
    if inner.trim().is_empty() {
        return Some((name, Vec::new()));
    }
    let params: Vec<&str> = inner.split(',').map(str::trim).collect();
    params
        .iter()
        .all(|p| looks_like_identifier(p))
        .then_some((name, params))
}

/// Split `lhs = rhs` at the first `=` outside parentheses. Both sides are
/// trimmed and must be non-empty, and the right side balanced.
pub(crate) fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let at = find_top_level(line, |c| c == '=')?;
    let lhs = line[..at].trim();
    let rhs = line[at + 1..].trim();
    (!lhs.is_empty() && !rhs.is_empty() && is_balanced(rhs)).then_some((lhs, rhs))
}
