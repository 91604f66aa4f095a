//! Handlers for the standard commands.

use gplot_command::{
    CommandDescriptor, CommandError, CommandId, Dispatcher, Flow, InputMode, Invocation,
};
use gplot_core::format_number;
use gplot_model::Workspace;

/// What handlers operate on.
#[derive(Debug, Default)]
pub struct State {
    pub workspace: Workspace,
    /// Descriptors, for `help`.
    pub commands: Vec<CommandDescriptor>,
    /// Set by `quit`.
    pub quit: bool,
}

impl State {
    pub fn new(commands: Vec<CommandDescriptor>) -> Self {
        Self {
            workspace: Workspace::new(),
            commands,
            quit: false,
        }
    }
}

type HandlerResult = Result<Flow, CommandError>;

/// A dispatcher with a handler for every [`CommandId`].
pub fn standard_dispatcher() -> Dispatcher<State> {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(CommandId::Help, help)
        .register(CommandId::Quit, quit)
        .register(CommandId::Get, get)
        .register(CommandId::Set, set)
        .register(CommandId::Props, props)
        .register(CommandId::Values, values)
        .register(CommandId::Plot, plot)
        .register(CommandId::Graphs, graphs)
        .register(CommandId::Delete, delete)
        .register(CommandId::Sample, sample)
        .register(CommandId::Eval, eval)
        .register(CommandId::Defs, defs)
        .register(CommandId::Undef, undef)
        .register(CommandId::Reset, reset)
        .register(CommandId::Define, define)
        .register(CommandId::Assign, assign);
    dispatcher
}

fn help(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    match inv.opt_str(0)? {
        None => {
            let width = state
                .commands
                .iter()
                .map(|c| c.usage.len())
                .max()
                .unwrap_or(0);
            let lines: Vec<String> = state
                .commands
                .iter()
                .map(|c| format!("{:width$}  {}", c.usage, c.description))
                .collect();
            for line in lines {
                inv.emit(line);
            }
        }
        Some(topic) => {
            let command = state
                .commands
                .iter()
                .find(|c| c.mode != InputMode::Line && c.answers_to(topic))
                .ok_or_else(|| CommandError::user(format!("no command '{topic}'")))?;
            let mut lines = vec![command.usage.to_string(), format!("  {}", command.description)];
            if let Some(alias) = command.alias {
                lines.push(format!("  alias: {alias}"));
            }
            for line in lines {
                inv.emit(line);
            }
        }
    }
    Ok(Flow::Continue)
}

fn quit(state: &mut State, _inv: &mut Invocation<'_>) -> HandlerResult {
    state.quit = true;
    Ok(Flow::Continue)
}

/// Replies with the values themselves instead of an acknowledgement.
fn get(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let values = (0..inv.len())
        .map(|i| -> Result<String, CommandError> {
            let path = inv.get_str(i)?;
            state.workspace.get(path).map_err(CommandError::user)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(inv.reply(values))
}

fn set(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let path = inv.get_str(0)?;
    let value = inv.get_str(1)?;
    state
        .workspace
        .set(path, value)
        .map_err(CommandError::user)?;
    Ok(Flow::Continue)
}

fn props(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let target = inv.opt_str(0)?.unwrap_or("");
    let lines = state
        .workspace
        .print(target)
        .map_err(CommandError::user)?;
    for line in lines {
        inv.emit(line);
    }
    Ok(Flow::Continue)
}

fn values(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let path = inv.get_str(0)?;
    let line = match state.workspace.values(path).map_err(CommandError::user)? {
        Some(values) => values.join(" "),
        None => "any value".to_string(),
    };
    inv.emit(line);
    Ok(Flow::Continue)
}

fn plot(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let expr = inv.get_str(0)?;
    let index = state
        .workspace
        .add_graph(expr)
        .map_err(CommandError::user)?;
    inv.emit(format!("graph {index}"));
    Ok(Flow::Continue)
}

fn graphs(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    for (i, graph) in state.workspace.graphs().iter().enumerate() {
        inv.emit(format!("{}: {}", i + 1, graph.summary()));
    }
    Ok(Flow::Continue)
}

fn delete(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let index = inv.get_int(0)?;
    state
        .workspace
        .delete_graph(index)
        .map_err(CommandError::user)?;
    Ok(Flow::Continue)
}

fn sample(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let index = inv.get_int(0)?;
    let from = inv.get_real(1)?;
    let to = inv.get_real(2)?;
    let count = inv.get_int(3)?;
    let samples = state
        .workspace
        .sample(index, from, to, count)
        .map_err(CommandError::user)?;
    for point in samples {
        let value = point.value.map_or("undefined".to_string(), format_number);
        inv.emit(format!("{}\t{}", format_number(point.at), value));
    }
    Ok(Flow::Continue)
}

fn eval(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let expr = inv.get_str(0)?;
    let value = state.workspace.eval(expr).map_err(CommandError::user)?;
    inv.emit(format_number(value));
    Ok(Flow::Continue)
}

fn defs(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    for line in state.workspace.definitions() {
        inv.emit(line);
    }
    Ok(Flow::Continue)
}

fn undef(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let name = inv.get_str(0)?;
    let arity = inv.get_int(1)?;
    state
        .workspace
        .undefine(name, arity)
        .map_err(CommandError::user)?;
    Ok(Flow::Continue)
}

fn reset(state: &mut State, _inv: &mut Invocation<'_>) -> HandlerResult {
    state.workspace.reset();
    Ok(Flow::Continue)
}

fn define(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let name = inv.get_str(0)?;
    let params = inv
        .get_str(1)?
        .split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    let body = inv.get_str(2)?;
    let stored = state
        .workspace
        .define_function(name, params, body)
        .map_err(CommandError::user)?;
    inv.emit(stored);
    Ok(Flow::Continue)
}

fn assign(state: &mut State, inv: &mut Invocation<'_>) -> HandlerResult {
    let lhs = inv.get_str(0)?;
    let rhs = inv.get_str(1)?;
    state
        .workspace
        .assign(lhs, rhs)
        .map_err(CommandError::user)?;
    Ok(Flow::Continue)
}
