//! # gplot-props - reflective property registry
//!
//! Objects such as plot settings, graphs and parameters expose their fields
//! as named, introspectable [`Property`] values so a shell can read and write
//! them as text without knowing their types.
//!
//! ## Binding to an instance
//!
//! A property never captures its owner. Its getter and setter receive the
//! owner as an explicit argument, and the per-instance [`PropertyRegistry`]
//! is rebuilt (not cloned) whenever the owner is copied:
//!
//! ```ignore
//! let mut copy = plot.clone();          // copy's registry is empty
//! copy.set_property("fog", "20%", &ev)?; // rebuilt against `copy`
//! assert_ne!(plot.get_property("fog")?, copy.get_property("fog")?);
//! ```
//!
//! ## Building properties
//!
//! Typed helpers in [`kinds`] and [`enums`] wrap a getter/setter pair with
//! the matching codec from `gplot-core`; [`Reflect`] supplies the
//! get/set/list surface once an owner names its registry and initializer.

pub mod enums;
pub mod error;
pub mod kinds;
pub mod property;
pub mod reflect;
pub mod registry;
pub mod table;

pub use enums::{CORRUPT, EnumTable, enum_lookup, enum_name, enum_names, enum_property};
pub use error::PropertyError;
pub use kinds::{
    Limit, bool_property, integer_property, percent_property, range_property, real_property,
    text_property,
};
pub use property::Property;
pub use reflect::{PropertyInfo, Reflect};
pub use registry::{PropertyRegistry, PropertySet};
pub use table::render_table;
