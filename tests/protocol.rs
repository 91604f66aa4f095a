//! End-to-end tests of the command protocol.
//!
//! Lines go through the full pipeline: grammar, decoded message, dispatcher,
//! handler, workspace, and back to a reply.

use gplot::command::{Argument, CommandId, CommandState, Grammar, Message, MessageKind, Parsed};
use gplot::{Reply, Session};

fn session() -> Session {
    Session::new().expect("standard grammar is consistent")
}

/// Execute and require success.
fn ok(session: &mut Session, line: &str) -> Vec<String> {
    let reply = session.execute(line);
    assert!(reply.error.is_none(), "{line:?} failed: {:?}", reply.error);
    reply.lines
}

fn error(session: &mut Session, line: &str) -> String {
    session
        .execute(line)
        .error
        .unwrap_or_else(|| panic!("{line:?} should fail"))
}

// ============================================================================
// Assignment round trip
// ============================================================================

#[test]
fn fog_assignment_round_trip() {
    let grammar = Grammar::standard().unwrap();
    let Parsed::Command(message) = grammar.parse("fog = 50%") else {
        panic!("assignment did not parse");
    };
    assert_eq!(message.id, CommandId::Assign);

    let mut s = session();
    ok(&mut s, "fog = 50%");
    assert_eq!(s.workspace().settings().fog, 0.5);
    assert_eq!(ok(&mut s, "get fog"), ["50%"]);
}

#[test]
fn set_and_assign_are_equivalent() {
    let mut s = session();
    ok(&mut s, "set xrange [1;5]");
    ok(&mut s, "yrange = 3+-2");
    assert_eq!(ok(&mut s, "get xrange yrange"), ["[1;5]", "[1;5]"]);
    ok(&mut s, "xrange = 7");
    assert_eq!(ok(&mut s, "get xrange"), ["[5;9]"]);
}

#[test]
fn hidden_property_still_answers() {
    let mut s = session();
    let listed = ok(&mut s, "props");
    assert!(!listed.iter().any(|l| l.starts_with("fog")));
    ok(&mut s, "fog = 20%");
    assert_eq!(ok(&mut s, "get fog"), ["20%"]);
    ok(&mut s, "view = 3d");
    let listed = ok(&mut s, "props");
    assert!(listed.iter().any(|l| l.starts_with("fog ") && l.contains("20%")));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn failures_leave_the_session_usable() {
    let mut s = session();
    assert_eq!(error(&mut s, "grid = bogus"), "\"bogus\" is not a valid grid mode");
    assert_eq!(error(&mut s, "delete 3"), "no graph 3 (there are none)");
    assert_eq!(error(&mut s, "x = 2"), "'x' is reserved");
    assert_eq!(error(&mut s, "clip = maybe"), "not a valid boolean: \"maybe\"");
    assert_eq!(error(&mut s, "line_width = 0"), "line_width must be > 0, got \"0\"");
    assert_eq!(error(&mut s, "undef nothing"), "'nothing' is not defined");

    assert_eq!(ok(&mut s, "get grid clip line_width"), ["on", "on", "1"]);
    ok(&mut s, "grid = f");
    assert_eq!(ok(&mut s, "get grid"), ["full"]);
}

#[test]
fn protocol_errors_are_distinguishable() {
    let mut s = session();
    let mut message = Message::request(CommandId::Delete, [Argument::from("one")]);
    let err = s.dispatch(&mut message).unwrap_err();
    assert!(err.is_protocol());
    assert_eq!(message.kind, MessageKind::Error);
    assert_eq!(message.state, CommandState::Failed);

    let mut message = Message::request(CommandId::Delete, [Argument::Int(1)]);
    let err = s.dispatch(&mut message).unwrap_err();
    assert!(!err.is_protocol());

    assert_eq!(ok(&mut s, "plot x"), ["graph 1"]);
}

#[test]
fn deeply_nested_input_is_rejected() {
    let mut s = session();
    let parens = format!("eval {}1{}", "(".repeat(200_000), ")".repeat(200_000));
    assert!(error(&mut s, &parens).starts_with("syntax error: expression nested deeper"));
    let minuses = format!("eval {}1", "-".repeat(100_000));
    assert!(s.execute(&minuses).is_error());
    let sum = format!("plot {}", vec!["x"; 100_000].join("+"));
    assert!(s.execute(&sum).is_error());
    let range = format!("xrange = [{}0{};1]", "(".repeat(100_000), ")".repeat(100_000));
    assert!(s.execute(&range).is_error());

    assert_eq!(ok(&mut s, "eval ((1+2))*3"), ["9"]);
    assert!(ok(&mut s, "graphs").is_empty());
}

#[test]
fn command_words_work_as_parameter_names() {
    let mut s = session();
    ok(&mut s, "p = 3");
    assert_eq!(ok(&mut s, "get p.value"), ["3"]);
    ok(&mut s, "plot = 4");
    assert_eq!(ok(&mut s, "defs"), ["p = 3", "plot = 4"]);
    assert_eq!(error(&mut s, "e = 1"), "'e' is reserved");
    assert_eq!(ok(&mut s, "p p*x"), ["graph 1"]);
}

#[test]
fn set_accepts_equals_without_spaces() {
    let mut s = session();
    ok(&mut s, "set fog=20%");
    assert_eq!(ok(&mut s, "get fog"), ["20%"]);
}

#[test]
fn unrecognized_lines() {
    let mut s = session();
    assert_eq!(error(&mut s, "zoom in"), "unrecognized command: zoom in");
    assert_eq!(error(&mut s, "= 4"), "not a valid assignment: = 4");
    assert_eq!(s.execute("   "), Reply::default());
}

// ============================================================================
// Graphs, parameters and functions
// ============================================================================

#[test]
fn parameters_drive_graphs() {
    let mut s = session();
    ok(&mut s, "a = 2");
    ok(&mut s, "sq(u) = u^2");
    assert_eq!(ok(&mut s, "plot a*sq(x)"), ["graph 1"]);
    assert_eq!(ok(&mut s, "sample 1 0 2 3"), ["0\t0", "1\t2", "2\t8"]);

    ok(&mut s, "a.value = 3");
    assert_eq!(ok(&mut s, "sample 1 1 1 2"), ["1\t3", "1\t3"]);
    assert_eq!(ok(&mut s, "defs"), ["a = 3", "sq(u) = u^2"]);

    ok(&mut s, "undef sq(u)");
    assert!(s.execute("sample 1 0 1 2").is_error());
}

#[test]
fn graph_properties_by_index() {
    let mut s = session();
    ok(&mut s, "plot sin(x)");
    ok(&mut s, "p cos(x)");
    ok(&mut s, "2.kind = polar");
    ok(&mut s, "set 2.opacity 150%");
    assert_eq!(
        ok(&mut s, "get 2.kind 2.opacity 1.kind"),
        ["polar", "100%", "function"]
    );
    assert!(ok(&mut s, "props 2").iter().any(|l| l.starts_with("trange")));
    assert!(!ok(&mut s, "props 1").iter().any(|l| l.starts_with("trange")));
    assert_eq!(ok(&mut s, "values 2.style"), ["lines points surface"]);

    ok(&mut s, "del 1");
    assert_eq!(ok(&mut s, "graphs"), ["1: cos(x)  (polar)"]);
}

#[test]
fn reset_restores_defaults() {
    let mut s = session();
    ok(&mut s, "plot x");
    ok(&mut s, "a = 1");
    ok(&mut s, "grid = off");
    ok(&mut s, "reset");
    assert!(ok(&mut s, "graphs").is_empty());
    assert!(ok(&mut s, "defs").is_empty());
    assert_eq!(ok(&mut s, "get grid"), ["on"]);
}

// ============================================================================
// Transport
// ============================================================================

#[test]
fn decoded_messages_cross_a_json_transport() {
    let grammar = Grammar::standard().unwrap();
    let Parsed::Command(request) = grammar.parse("get grid view") else {
        panic!("get did not parse");
    };
    let wire = request.to_json().unwrap();

    let mut s = session();
    let response = s.execute_message(Message::from_json(&wire).unwrap());
    let wire = response.to_json().unwrap();
    let back = Message::from_json(&wire).unwrap();

    assert_eq!(back.kind, MessageKind::Return);
    assert_eq!(back.state, CommandState::Completed);
    assert_eq!(
        back.args.to_vec(),
        [Argument::from("on"), Argument::from("2d")]
    );
}

#[test]
fn quit_ends_the_session() {
    let mut s = session();
    let reply = s.execute("exit");
    assert!(reply.quit);
    assert!(s.is_finished());
}
