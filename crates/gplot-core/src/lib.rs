//! Core types for the gplot property system.
//!
//! This crate provides the pieces every other gplot crate builds on:
//! - The value codec: text <-> boolean, percentage, real, integer and range
//! - The [`Range`] type and its two textual notations
//! - The [`Evaluator`] seam through which real numbers are computed
//! - Paren-depth aware scanning helpers shared with the command grammar

pub mod codec;
pub mod error;
pub mod eval;
pub mod range;
pub mod scan;

// Re-export commonly used items at crate root
pub use codec::{
    format_bool, format_number, format_percent, format_range, format_significant, parse_bool,
    parse_integer, parse_percent, parse_range, parse_real,
};
pub use error::CodecError;
pub use eval::{EvalError, Evaluator, LiteralEvaluator};
pub use range::{Range, RangeNotation};
pub use scan::{find_top_level, find_top_level_str, is_balanced};
