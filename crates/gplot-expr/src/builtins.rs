//! Builtin constants and functions.

/// Builtin constants.
pub const CONSTANTS: &[(&str, f64)] = &[("pi", std::f64::consts::PI), ("e", std::f64::consts::E)];

/// Coordinate names bound by graphs while sampling.
pub const COORDINATES: &[&str] = &["x", "y", "t"];

/// Builtin functions: name and arity.
pub const FUNCTIONS: &[(&str, usize)] = &[
    ("sin", 1),
    ("cos", 1),
    ("tan", 1),
    ("asin", 1),
    ("acos", 1),
    ("atan", 1),
    ("sqrt", 1),
    ("exp", 1),
    ("ln", 1),
    ("log", 1),
    ("abs", 1),
    ("floor", 1),
    ("ceil", 1),
    ("min", 2),
    ("max", 2),
];

pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, value)| value)
}

/// Arity of the builtin function `name`, if there is one.
pub fn function_arity(name: &str) -> Option<usize> {
    FUNCTIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, arity)| arity)
}

/// Whether `name` is a builtin constant or function.
pub fn is_builtin(name: &str) -> bool {
    constant(name).is_some() || function_arity(name).is_some()
}

/// Whether `name` may not be used for a user definition.
pub fn is_reserved(name: &str) -> bool {
    is_builtin(name) || COORDINATES.contains(&name)
}

/// Apply a builtin. The caller has already checked the arity.
pub(crate) fn call(name: &str, args: &[f64]) -> Option<f64> {
    let value = match (name, args) {
        ("sin", [a]) => a.sin(),
        ("cos", [a]) => a.cos(),
        ("tan", [a]) => a.tan(),
        ("asin", [a]) => a.asin(),
        ("acos", [a]) => a.acos(),
        ("atan", [a]) => a.atan(),
        ("sqrt", [a]) => a.sqrt(),
        ("exp", [a]) => a.exp(),
        ("ln", [a]) => a.ln(),
        ("log", [a]) => a.log10(),
        ("abs", [a]) => a.abs(),
        ("floor", [a]) => a.floor(),
        ("ceil", [a]) => a.ceil(),
        ("min", [a, b]) => a.min(*b),
        ("max", [a, b]) => a.max(*b),
        _ => return None,
    };
    Some(value)
}
