//! A single named, introspectable attribute.

use std::fmt;
use std::sync::Arc;

use gplot_core::Evaluator;

use crate::error::PropertyError;

type Getter<O> = Arc<dyn Fn(&O) -> String>;
type Setter<O> = Arc<dyn Fn(&mut O, &str, &dyn Evaluator) -> Result<(), PropertyError>>;
type Predicate<O> = Arc<dyn Fn(&O) -> bool>;
type Enumerator<O> = Arc<dyn Fn(&O) -> Vec<String>>;

/// A property of owners of type `O`.
///
/// Every function receives the owner explicitly, so one `Property` can serve
/// any instance and never reaches a stale one. Cloning is cheap: the
/// functions are shared.
pub struct Property<O> {
    name: &'static str,
    description: &'static str,
    getter: Getter<O>,
    setter: Option<Setter<O>>,
    visible: Option<Predicate<O>>,
    values: Option<Enumerator<O>>,
}

impl<O> Property<O> {
    /// A read-only property. Getters never fail.
    pub fn new(
        name: &'static str,
        description: &'static str,
        getter: impl Fn(&O) -> String + 'static,
    ) -> Self {
        Self {
            name,
            description,
            getter: Arc::new(getter),
            setter: None,
            visible: None,
            values: None,
        }
    }

    /// Make the property writable.
    ///
    /// The setter must validate before it mutates: on `Err` the owner has to
    /// be left exactly as it was.
    pub fn with_setter(
        mut self,
        setter: impl Fn(&mut O, &str, &dyn Evaluator) -> Result<(), PropertyError> + 'static,
    ) -> Self {
        self.setter = Some(Arc::new(setter));
        self
    }

    /// Only show the property while `predicate` holds. The predicate is
    /// evaluated on every query and must have no side effects.
    pub fn visible_when(mut self, predicate: impl Fn(&O) -> bool + 'static) -> Self {
        self.visible = Some(Arc::new(predicate));
        self
    }

    /// Declare the finite set of accepted values.
    pub fn with_values(mut self, values: impl Fn(&O) -> Vec<String> + 'static) -> Self {
        self.values = Some(Arc::new(values));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }

    pub fn is_visible(&self, owner: &O) -> bool {
        self.visible.as_ref().is_none_or(|visible| visible(owner))
    }

    pub fn get(&self, owner: &O) -> String {
        (self.getter)(owner)
    }

    pub fn set(&self, owner: &mut O, text: &str, eval: &dyn Evaluator) -> Result<(), PropertyError> {
        match &self.setter {
            Some(setter) => setter(owner, text, eval),
            None => Err(PropertyError::ReadOnly(self.name.to_string())),
        }
    }

    /// Accepted values, or `None` for free-form properties.
    pub fn values(&self, owner: &O) -> Option<Vec<String>> {
        self.values.as_ref().map(|values| values(owner))
    }
}

impl<O> Clone for Property<O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            description: self.description,
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
            visible: self.visible.clone(),
            values: self.values.clone(),
        }
    }
}

impl<O> fmt::Debug for Property<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("read_only", &self.is_read_only())
            .field("conditional", &self.visible.is_some())
            .field("enumerated", &self.values.is_some())
            .finish()
    }
}
