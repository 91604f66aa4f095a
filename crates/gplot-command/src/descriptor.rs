//! Command descriptors and the standard command table.

use smallvec::smallvec;

use crate::argument::Argument;
use crate::grammar::{
    ParseInput, ParseOutcome, looks_like_call, looks_like_identifier, looks_like_integer,
    looks_like_path, looks_like_real, split_assignment,
};
use crate::message::{Args, CommandId};

/// How a descriptor is matched and what its parser gets to see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Matched by command word; parser reads whitespace tokens.
    Tokens,
    /// Matched by command word; parser reads the unsplit remainder.
    Raw,
    /// No command word; parser sees every line that reaches it.
    Line,
}

pub type Parser = fn(&ParseInput<'_>) -> ParseOutcome;

#[derive(Clone, Debug)]
pub struct CommandDescriptor {
    pub id: CommandId,
    /// Command word. Empty for line patterns.
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub mode: InputMode,
    pub parser: Parser,
    pub usage: &'static str,
    pub description: &'static str,
}

impl CommandDescriptor {
    /// Name and alias, for keyword descriptors.
    pub fn words(&self) -> impl Iterator<Item = &'static str> {
        let keyword = self.mode != InputMode::Line;
        [Some(self.name), self.alias]
            .into_iter()
            .flatten()
            .filter(move |word| keyword && !word.is_empty())
    }

    pub fn answers_to(&self, word: &str) -> bool {
        self.words().any(|w| w.eq_ignore_ascii_case(word))
    }
}

fn accept(args: Args) -> ParseOutcome {
    ParseOutcome::Accepted(args)
}

// ============================================================================
// Parsers
// ============================================================================

fn no_arguments(input: &ParseInput<'_>) -> ParseOutcome {
    if input.tokens.is_empty() {
        accept(Args::new())
    } else {
        ParseOutcome::NoMatch
    }
}

fn parse_help(input: &ParseInput<'_>) -> ParseOutcome {
    match input.tokens.as_slice() {
        [] => accept(Args::new()),
        [topic] => accept(smallvec![Argument::from(*topic)]),
        _ => ParseOutcome::NoMatch,
    }
}

fn parse_get(input: &ParseInput<'_>) -> ParseOutcome {
    if input.tokens.is_empty() || !input.tokens.iter().all(|t| looks_like_path(t)) {
        return ParseOutcome::NoMatch;
    }
    accept(input.tokens.iter().map(|t| Argument::from(*t)).collect())
}

/// `set path value`, `set path = value` or `set path=value`.
fn parse_set(input: &ParseInput<'_>) -> ParseOutcome {
    let Some(end) = input.rest.find(|c: char| c.is_whitespace() || c == '=') else {
        return ParseOutcome::NoMatch;
    };
    let (path, value) = input.rest.split_at(end);
    let value = value.trim_start();
    let value = value.strip_prefix('=').unwrap_or(value).trim();
    if !looks_like_path(path) || value.is_empty() {
        return ParseOutcome::NoMatch;
    }
    accept(smallvec![Argument::from(path), Argument::from(value)])
}

fn parse_props(input: &ParseInput<'_>) -> ParseOutcome {
    match input.tokens.as_slice() {
        [] => accept(Args::new()),
        [target]
            if looks_like_identifier(target) || looks_like_integer(target).is_some_and(|n| n > 0) =>
        {
            accept(smallvec![Argument::from(*target)])
        }
        _ => ParseOutcome::NoMatch,
    }
}

fn parse_values(input: &ParseInput<'_>) -> ParseOutcome {
    match input.tokens.as_slice() {
        [path] if looks_like_path(path) => accept(smallvec![Argument::from(*path)]),
        _ => ParseOutcome::NoMatch,
    }
}

/// A non-empty, balanced expression. A leading `=` means the command word
/// is really the left side of an assignment.
fn parse_expression(input: &ParseInput<'_>) -> ParseOutcome {
    if input.rest.is_empty()
        || input.rest.starts_with('=')
        || !gplot_core::is_balanced(input.rest)
    {
        return ParseOutcome::NoMatch;
    }
    accept(smallvec![Argument::from(input.rest)])
}

fn parse_delete(input: &ParseInput<'_>) -> ParseOutcome {
    match input.tokens.as_slice() {
        [index] => match looks_like_integer(index) {
            Some(index) => accept(smallvec![Argument::Int(index)]),
            None => ParseOutcome::NoMatch,
        },
        _ => ParseOutcome::NoMatch,
    }
}

fn parse_sample(input: &ParseInput<'_>) -> ParseOutcome {
    let [index, from, to, count] = input.tokens.as_slice() else {
        return ParseOutcome::NoMatch;
    };
    match (
        looks_like_integer(index),
        looks_like_real(from),
        looks_like_real(to),
        looks_like_integer(count),
    ) {
        (Some(index), Some(from), Some(to), Some(count)) => accept(smallvec![
            Argument::Int(index),
            Argument::Real(from),
            Argument::Real(to),
            Argument::Int(count),
        ]),
        _ => ParseOutcome::NoMatch,
    }
}

/// `name` (arity 0) or `name(a,b)`.
fn parse_undef(input: &ParseInput<'_>) -> ParseOutcome {
    let target = input.rest;
    if looks_like_identifier(target) {
        return accept(smallvec![Argument::from(target), Argument::Int(0)]);
    }
    match looks_like_call(target) {
        Some((name, params)) => {
            accept(smallvec![Argument::from(name), Argument::Int(params.len() as i64)])
        }
        None => ParseOutcome::NoMatch,
    }
}

/// `name(a,b) = body`
fn parse_define(input: &ParseInput<'_>) -> ParseOutcome {
    let Some((lhs, body)) = split_assignment(input.line) else {
        return ParseOutcome::NoMatch;
    };
    match looks_like_call(lhs) {
        Some((name, params)) => accept(smallvec![
            Argument::from(name),
            Argument::from(params.join(",")),
            Argument::from(body),
        ]),
        None => ParseOutcome::NoMatch,
    }
}

/// `path = value`
fn parse_assign(input: &ParseInput<'_>) -> ParseOutcome {
    match split_assignment(input.line) {
        Some((lhs, rhs)) if looks_like_path(lhs) => {
            accept(smallvec![Argument::from(lhs), Argument::from(rhs)])
        }
        _ => ParseOutcome::NoMatch,
    }
}

// ============================================================================
// Standard table
// ============================================================================

fn keyword(
    id: CommandId,
    name: &'static str,
    alias: Option<&'static str>,
    mode: InputMode,
    parser: Parser,
    usage: &'static str,
    description: &'static str,
) -> CommandDescriptor {
    CommandDescriptor {
        id,
        name,
        alias,
        mode,
        parser,
        usage,
        description,
    }
}

/// Every built-in command, in matching order.
#[rustfmt::skip]
pub fn standard_descriptors() -> Vec<CommandDescriptor> {
    use CommandId::*;
    use InputMode::{Line, Raw, Tokens};

    vec![
        keyword(Help, "help", Some("?"), Tokens, parse_help, "help [command]", "List commands or describe one"),
        keyword(Quit, "quit", Some("exit"), Tokens, no_arguments, "quit", "Leave the shell"),
        keyword(Get, "get", Some("g"), Tokens, parse_get, "get <path>...", "Show property values"),
        keyword(Set, "set", None, Raw, parse_set, "set <path> <value>", "Change a property"),
        keyword(Props, "props", Some("ls"), Tokens, parse_props, "props [graph|parameter]", "List visible properties"),
        keyword(Values, "values", None, Tokens, parse_values, "values <path>", "List accepted values of a property"),
        keyword(Plot, "plot", Some("p"), Raw, parse_expression, "plot <expression>", "Add a graph"),
        keyword(Graphs, "graphs", None, Tokens, no_arguments, "graphs", "List graphs"),
        keyword(Delete, "delete", Some("del"), Tokens, parse_delete, "delete <graph>", "Remove a graph"),
        keyword(Sample, "sample", None, Tokens, parse_sample, "sample <graph> <from> <to> <count>", "Evaluate a graph at evenly spaced points"),
        keyword(Eval, "eval", Some("e"), Raw, parse_expression, "eval <expression>", "Evaluate an expression"),
        keyword(Defs, "defs", None, Tokens, no_arguments, "defs", "List parameters and functions"),
        keyword(Undef, "undef", Some("u"), Tokens, parse_undef, "undef <name>|<name(args)>", "Remove a definition"),
        keyword(Reset, "reset", None, Tokens, no_arguments, "reset", "Clear graphs and definitions, restore settings"),
        keyword(Define, "", None, Line, parse_define, "<name>(<args>) = <body>", "Define a function"),
        keyword(Assign, "", None, Line, parse_assign, "<path> = <value>", "Set a property or define a parameter"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_covers_every_id_once() {
        let table = standard_descriptors();
        let ids: HashSet<_> = table.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), table.len());
        assert_eq!(ids.len(), CommandId::ALL.len());
    }

    #[test]
    fn patterns_come_last_and_have_no_words() {
        let table = standard_descriptors();
        let first_pattern = table
            .iter()
            .position(|d| d.mode == InputMode::Line)
            .unwrap();
        assert!(table[first_pattern..].iter().all(|d| d.mode == InputMode::Line));
        assert!(table[first_pattern].words().next().is_none());
    }

    #[test]
    fn words_match_without_case() {
        let table = standard_descriptors();
        let delete = table.iter().find(|d| d.id == CommandId::Delete).unwrap();
        assert!(delete.answers_to("DEL"));
        assert!(delete.answers_to("Delete"));
        assert!(!delete.answers_to("d"));
    }
}
