//! Named parameters.

use gplot_core::{Range, RangeNotation};
use gplot_props::{
    Limit, PropertyRegistry, PropertySet, Reflect, bool_property, range_property, real_property,
};

/// A named real value that expressions can refer to, with the slider range
/// and step a front end would animate it over.
#[derive(Clone, Debug)]
pub struct Parameter {
    name: String,
    pub value: f64,
    pub range: Range,
    pub step: f64,
    pub animate: bool,
    registry: PropertyRegistry<Parameter>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            range: Range::new(value, 10.0),
            step: 0.1,
            animate: false,
            registry: PropertyRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Reflect for Parameter {
    fn registry(&self) -> &PropertyRegistry<Self> {
        &self.registry
    }

    fn describe(set: &mut PropertySet<Self>) {
        set.add(real_property(
            "value",
            "Current value",
            Limit::None,
            |p: &Self| p.value,
            |p: &mut Self, v| p.value = v,
        ))
        .add(range_property(
            "range",
            "Slider range",
            |_: &Self| RangeNotation::Centered,
            |p: &Self| p.range,
            |p: &mut Self, r| p.range = r,
        ))
        .add(real_property(
            "step",
            "Slider step",
            Limit::Above(0.0),
            |p: &Self| p.step,
            |p: &mut Self, v| p.step = v,
        ))
        .add(bool_property(
            "animate",
            "Sweep the slider range",
            |p: &Self| p.animate,
            |p: &mut Self, v| p.animate = v,
        ));
    }
}
