//! Typed property builders.
//!
//! Each helper pairs a plain accessor with the matching codec so owners
//! describe fields in one line. Setters parse and check limits first and only
//! then call the accessor, so a rejected value never reaches the owner.

use std::fmt;

use gplot_core::{
    Range, RangeNotation, format_bool, format_number, format_percent, format_range, parse_bool,
    parse_integer, parse_percent, parse_range, parse_real,
};

use crate::error::PropertyError;
use crate::property::Property;

/// Lower bound enforced by numeric setters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Limit {
    #[default]
    None,
    /// Strictly greater than.
    Above(f64),
    /// Greater than or equal to.
    AtLeast(f64),
}

impl Limit {
    pub fn admits(self, value: f64) -> bool {
        match self {
            Limit::None => true,
            Limit::Above(bound) => value > bound,
            Limit::AtLeast(bound) => value >= bound,
        }
    }

    fn check(self, name: &str, text: &str, value: f64) -> Result<(), PropertyError> {
        if self.admits(value) {
            Ok(())
        } else {
            Err(PropertyError::OutOfBounds {
                name: name.to_string(),
                limit: self.to_string(),
                text: text.trim().to_string(),
            })
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::None => write!(f, "any number"),
            Limit::Above(bound) => write!(f, "> {}", format_number(*bound)),
            Limit::AtLeast(bound) => write!(f, ">= {}", format_number(*bound)),
        }
    }
}

pub fn bool_property<O: 'static>(
    name: &'static str,
    description: &'static str,
    get: fn(&O) -> bool,
    set: fn(&mut O, bool),
) -> Property<O> {
    Property::new(name, description, move |owner: &O| format_bool(get(owner)))
        .with_setter(move |owner: &mut O, text: &str, _eval| {
            set(owner, parse_bool(text)?);
            Ok(())
        })
        .with_values(|_: &O| vec![format_bool(false), format_bool(true)])
}

/// A fraction in [0, 1], shown as a percentage.
pub fn percent_property<O: 'static>(
    name: &'static str,
    description: &'static str,
    get: fn(&O) -> f64,
    set: fn(&mut O, f64),
) -> Property<O> {
    Property::new(name, description, move |owner: &O| format_percent(get(owner))).with_setter(
        move |owner: &mut O, text: &str, _eval| {
            set(owner, parse_percent(text)?);
            Ok(())
        },
    )
}

/// A real number evaluated through the owner's evaluator.
pub fn real_property<O: 'static>(
    name: &'static str,
    description: &'static str,
    limit: Limit,
    get: fn(&O) -> f64,
    set: fn(&mut O, f64),
) -> Property<O> {
    Property::new(name, description, move |owner: &O| format_number(get(owner))).with_setter(
        move |owner: &mut O, text: &str, eval| {
            let value = parse_real(text, eval)?;
            limit.check(name, text, value)?;
            set(owner, value);
            Ok(())
        },
    )
}

pub fn integer_property<O: 'static>(
    name: &'static str,
    description: &'static str,
    limit: Limit,
    get: fn(&O) -> i64,
    set: fn(&mut O, i64),
) -> Property<O> {
    Property::new(name, description, move |owner: &O| get(owner).to_string()).with_setter(
        move |owner: &mut O, text: &str, eval| {
            let value = parse_integer(text, eval)?;
            limit.check(name, text, value as f64)?;
            set(owner, value);
            Ok(())
        },
    )
}

/// A range. Input may leave parts out; they are taken from the current
/// value. Output follows the notation the owner currently prefers.
pub fn range_property<O: 'static>(
    name: &'static str,
    description: &'static str,
    notation: fn(&O) -> RangeNotation,
    get: fn(&O) -> Range,
    set: fn(&mut O, Range),
) -> Property<O> {
    Property::new(name, description, move |owner: &O| {
        format_range(get(owner), notation(owner))
    })
    .with_setter(move |owner: &mut O, text: &str, eval| {
        let range = parse_range(text, get(owner), eval)?;
        set(owner, range);
        Ok(())
    })
}

/// Free text. `set` receives the trimmed input and may reject it, in which
/// case it must leave the owner untouched.
pub fn text_property<O: 'static>(
    name: &'static str,
    description: &'static str,
    get: fn(&O) -> String,
    set: fn(&mut O, &str) -> Result<(), PropertyError>,
) -> Property<O> {
    Property::new(name, description, move |owner: &O| get(owner))
        .with_setter(move |owner: &mut O, text: &str, _eval| set(owner, text.trim()))
}
