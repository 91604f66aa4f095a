//! Text <-> value conversions shared by every property.
//!
//! Parsers accept the loosest syntax users type; formatters produce one
//! canonical spelling that the matching parser accepts again.

use crate::error::CodecError;
use crate::eval::Evaluator;
use crate::range::{Range, RangeNotation};
use crate::scan::{find_top_level, find_top_level_str, strip_enclosing};

/// Significant digits used when rendering real numbers.
pub const SIGNIFICANT_DIGITS: usize = 10;

/// Significant digits used when rendering percentages.
pub const PERCENT_DIGITS: usize = 6;

/// Marker separating center and half-width in centered range notation.
pub const RANGE_MARKER: &str = "+-";

const TRUE_WORDS: [&str; 4] = ["1", "on", "true", "yes"];
const FALSE_WORDS: [&str; 4] = ["0", "off", "false", "no"];

// ============================================================================
// Booleans
// ============================================================================

/// Parse a boolean. Spellings are case-sensitive.
pub fn parse_bool(text: &str) -> Result<bool, CodecError> {
    let word = text.trim();
    if TRUE_WORDS.contains(&word) {
        Ok(true)
    } else if FALSE_WORDS.contains(&word) {
        Ok(false)
    } else {
        Err(CodecError::InvalidBoolean(word.to_string()))
    }
}

pub fn format_bool(value: bool) -> String {
    let word = if value { "on" } else { "off" };
    word.to_string()
}

// ============================================================================
// Percentages
// ============================================================================

/// Parse a fraction in [0, 1].
///
/// `0.25` and `25%` are the same value. Out-of-range input is clamped rather
/// than rejected.
pub fn parse_percent(text: &str) -> Result<f64, CodecError> {
    let trimmed = text.trim();
    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(number) => (number.trim_end(), 0.01),
        None => (trimmed, 1.0),
    };
    let value = number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CodecError::InvalidPercent(trimmed.to_string()))?;
    Ok((value * scale).clamp(0.0, 1.0))
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_significant(value * 100.0, PERCENT_DIGITS))
}

// ============================================================================
// Real numbers and integers
// ============================================================================

/// Evaluate `text` to a finite real number.
pub fn parse_real(text: &str, eval: &dyn Evaluator) -> Result<f64, CodecError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CodecError::NotReal(String::new()));
    }
    match eval.evaluate(trimmed) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CodecError::NotReal(trimmed.to_string())),
    }
}

/// Evaluate `text` and require an integral result.
pub fn parse_integer(text: &str, eval: &dyn Evaluator) -> Result<i64, CodecError> {
    let trimmed = text.trim();
    let value =
        parse_real(trimmed, eval).map_err(|_| CodecError::NotInteger(trimmed.to_string()))?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(CodecError::NotInteger(trimmed.to_string()));
    }
    Ok(value as i64)
}

pub fn format_number(value: f64) -> String {
    format_significant(value, SIGNIFICANT_DIGITS)
}

/// Render `value` with at most `digits` significant digits.
///
/// Trailing zeros are trimmed. Magnitudes outside 1e-6..1e15 switch to
/// exponent notation.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.max(1);
    let magnitude = value.abs().log10().floor() as i32;
    if !(-6..15).contains(&magnitude) {
        let text = format!("{:.*e}", digits - 1, value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{}", trim_fraction(mantissa), exponent),
            None => text,
        };
    }
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    let text = trim_fraction(&format!("{:.*}", decimals, value));
    if text == "-0" { "0".to_string() } else { text }
}

fn trim_fraction(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

// ============================================================================
// Ranges
// ============================================================================

/// Parse a range, using `previous` for whatever the text leaves unspecified.
///
/// Syntaxes, tried in order:
/// 1. `[a,b]`, `[a;b]`, `(a,b)`, `(a;b)` - explicit bounds
/// 2. `c+-h` - center and half-width
/// 3. `c+-` - new center, previous half-width
/// 4. `c` - new center, previous half-width
///
/// Separators and markers only count at bracket depth zero; anything nested
/// belongs to a sub-expression handed to the evaluator.
pub fn parse_range(text: &str, previous: Range, eval: &dyn Evaluator) -> Result<Range, CodecError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CodecError::InvalidRange(String::new()));
    }

    if let Some(inner) = strip_enclosing(trimmed)
        && let Some(sep) = find_top_level(inner, |c| c == ',' || c == ';')
    {
        let a = parse_real(&inner[..sep], eval)?;
        let b = parse_real(&inner[sep + 1..], eval)?;
        return Ok(Range::from_bounds(a, b));
    }

    if let Some(marker) = find_top_level_str(trimmed, RANGE_MARKER) {
        let center = parse_real(&trimmed[..marker], eval)?;
        let rest = trimmed[marker + RANGE_MARKER.len()..].trim();
        if rest.is_empty() {
            return Ok(previous.recentered(center));
        }
        let half_width = parse_real(rest, eval)?;
        return Ok(Range::new(center, half_width));
    }

    let center =
        parse_real(trimmed, eval).map_err(|_| CodecError::InvalidRange(trimmed.to_string()))?;
    Ok(previous.recentered(center))
}

pub fn format_range(range: Range, notation: RangeNotation) -> String {
    match notation {
        RangeNotation::Bounds => format!(
            "[{};{}]",
            format_number(range.min()),
            format_number(range.max())
        ),
        RangeNotation::Centered => format!(
            "{}{}{}",
            format_number(range.center),
            RANGE_MARKER,
            format_number(range.half_width)
        ),
    }
}
