//! Properties backed by a fixed name <-> value table.

use tracing::warn;

use crate::error::PropertyError;
use crate::property::Property;

/// Ordered `(name, value)` pairs, listed in this order.
pub type EnumTable<T> = &'static [(&'static str, T)];

/// Shown when the live value matches no table entry.
pub const CORRUPT: &str = "corrupt";

/// Name registered for `value`.
pub fn enum_name<T: PartialEq>(table: EnumTable<T>, value: &T) -> Option<&'static str> {
    table.iter().find(|(_, v)| v == value).map(|(name, _)| *name)
}

/// Resolve `text` to a value: an exact name first, then a one-character
/// alias. When several names share an initial, the first listed wins.
pub fn enum_lookup<T: Copy>(table: EnumTable<T>, text: &str) -> Option<T> {
    let text = text.trim();
    if let Some(&(_, value)) = table.iter().find(|(name, _)| *name == text) {
        return Some(value);
    }
    let mut chars = text.chars();
    let (Some(initial), None) = (chars.next(), chars.next()) else {
        return None;
    };
    table
        .iter()
        .find(|(name, _)| name.starts_with(initial))
        .map(|&(_, value)| value)
}

pub fn enum_names<T>(table: EnumTable<T>) -> Vec<String> {
    table.iter().map(|(name, _)| name.to_string()).collect()
}

/// Build a property reflecting an enumerated field.
///
/// - getter: value -> name, or [`CORRUPT`] if the field holds a value the
///   table does not know (logged, never an error)
/// - setter: name or one-letter alias -> value, then `post_set`
/// - values: every name, in table order
pub fn enum_property<O, T>(
    name: &'static str,
    description: &'static str,
    table: EnumTable<T>,
    get: fn(&O) -> T,
    set: fn(&mut O, T),
    post_set: Option<fn(&mut O)>,
) -> Property<O>
where
    O: 'static,
    T: Copy + PartialEq + 'static,
{
    Property::new(name, description, move |owner: &O| {
        match enum_name(table, &get(owner)) {
            Some(label) => label.to_string(),
            None => {
                warn!(property = name, "live value matches no enumerated name");
                CORRUPT.to_string()
            }
        }
    })
    .with_setter(move |owner: &mut O, text: &str, _eval| {
        let value = enum_lookup(table, text).ok_or_else(|| PropertyError::InvalidChoice {
            text: text.trim().to_string(),
            description: description.to_string(),
        })?;
        set(owner, value);
        if let Some(after) = post_set {
            after(owner);
        }
        Ok(())
    })
    .with_values(move |_: &O| enum_names(table))
}
