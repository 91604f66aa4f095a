//! The text-level surface every property owner exposes.

use gplot_core::Evaluator;
use serde::Serialize;

use crate::error::PropertyError;
use crate::registry::{PropertyRegistry, PropertySet};
use crate::table::render_table;

/// One row of a property listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyInfo {
    pub name: String,
    pub value: String,
    pub description: String,
    pub visible: bool,
    pub read_only: bool,
}

/// An object whose fields are reachable by name as text.
///
/// Implementors store a [`PropertyRegistry`] and provide [`Reflect::describe`],
/// which registers their properties; everything else is derived.
///
/// Hidden properties are left out of listings but remain gettable and
/// settable by name.
pub trait Reflect: Sized + 'static {
    fn registry(&self) -> &PropertyRegistry<Self>;

    /// Register this type's properties. Runs once per instance.
    fn describe(set: &mut PropertySet<Self>);

    fn properties(&self) -> &PropertySet<Self> {
        self.registry().get_or_init(Self::describe)
    }

    fn has_property(&self, name: &str) -> bool {
        self.properties().contains(name)
    }

    fn get_property(&self, name: &str) -> Result<String, PropertyError> {
        self.properties()
            .lookup(name)
            .map(|property| property.get(self))
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))
    }

    fn set_property(
        &mut self,
        name: &str,
        text: &str,
        eval: &dyn Evaluator,
    ) -> Result<(), PropertyError> {
        let property = self
            .properties()
            .lookup(name)
            .cloned()
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        property.set(self, text, eval)
    }

    /// Accepted values of an enumerated property; `None` when free-form.
    fn property_values(&self, name: &str) -> Result<Option<Vec<String>>, PropertyError> {
        self.properties()
            .lookup(name)
            .map(|property| property.values(self))
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))
    }

    /// Every property, hidden ones included, with its current visibility.
    fn list_properties(&self) -> Vec<PropertyInfo> {
        self.properties()
            .iter()
            .map(|property| PropertyInfo {
                name: property.name().to_string(),
                value: property.get(self),
                description: property.description().to_string(),
                visible: property.is_visible(self),
                read_only: property.is_read_only(),
            })
            .collect()
    }

    fn visible_properties(&self) -> Vec<PropertyInfo> {
        self.list_properties()
            .into_iter()
            .filter(|info| info.visible)
            .collect()
    }

    /// Aligned `name value description` lines for the visible properties.
    fn print_properties(&self) -> Vec<String> {
        render_table(&self.visible_properties())
    }
}
