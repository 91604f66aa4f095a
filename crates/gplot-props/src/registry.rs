//! Per-instance property registries.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;

use tracing::{trace, warn};

use crate::property::Property;

/// The populated properties of one owner, in registration order.
pub struct PropertySet<O> {
    entries: Vec<Property<O>>,
    index: BTreeMap<&'static str, usize>,
}

impl<O> PropertySet<O> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Register a property. Names are unique: registering a name twice keeps
    /// the first position but the later definition.
    pub fn add(&mut self, property: Property<O>) -> &mut Self {
        let name = property.name();
        match self.index.get(name) {
            Some(&slot) => {
                warn!(property = name, "property registered twice");
                self.entries[slot] = property;
            }
            None => {
                self.index.insert(name, self.entries.len());
                self.entries.push(property);
            }
        }
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Property<O>> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property<O>> {
        self.entries.iter()
    }

    /// Properties whose visibility predicate currently holds for `owner`.
    pub fn list_visible<'a>(&'a self, owner: &'a O) -> impl Iterator<Item = &'a Property<O>> {
        self.entries.iter().filter(move |p| p.is_visible(owner))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|p| p.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<O> Default for PropertySet<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily built property set stored inside its owner.
///
/// The set is built on first query by the owner's initializer and then
/// reused. Cloning a registry yields an empty one: a copied owner rebuilds
/// its own set instead of inheriting entries built for the original.
pub struct PropertyRegistry<O> {
    cell: OnceCell<PropertySet<O>>,
}

impl<O> PropertyRegistry<O> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the populated set, running `init` if this is the first query.
    pub fn get_or_init(&self, init: fn(&mut PropertySet<O>)) -> &PropertySet<O> {
        self.cell.get_or_init(|| {
            let mut set = PropertySet::new();
            init(&mut set);
            trace!(
                owner = std::any::type_name::<O>(),
                properties = set.len(),
                "property registry built"
            );
            set
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<O> Default for PropertyRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for PropertyRegistry<O> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for PropertyRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(set) => write!(f, "PropertyRegistry({} properties)", set.len()),
            None => write!(f, "PropertyRegistry(empty)"),
        }
    }
}
