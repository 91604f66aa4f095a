//! Graphs: a plotted expression plus its drawing options.

use std::f64::consts::PI;

use gplot_core::{EvalError, Range, RangeNotation};
use gplot_expr::{Bindings, Expr, Scope, evaluate, parse};
use gplot_props::{
    EnumTable, Limit, PropertyError, PropertyRegistry, PropertySet, Reflect, bool_property,
    enum_property, integer_property, percent_property, range_property, real_property,
    text_property,
};

use crate::error::ModelError;

/// Upper bound on points returned by one [`Graph::sample`] call.
pub const MAX_SAMPLES: usize = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphKind {
    #[default]
    Function,
    Parametric,
    Polar,
    Implicit,
}

impl GraphKind {
    /// The free variable sampled over, if the kind can be sampled.
    pub fn variable(self) -> Option<&'static str> {
        match self {
            GraphKind::Function => Some("x"),
            GraphKind::Parametric | GraphKind::Polar => Some("t"),
            GraphKind::Implicit => None,
        }
    }

    pub fn uses_trange(self) -> bool {
        matches!(self, GraphKind::Parametric | GraphKind::Polar)
    }

    pub fn name(self) -> &'static str {
        KINDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("function", |(name, _)| *name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphStyle {
    #[default]
    Lines,
    Points,
    Surface,
}

const KINDS: EnumTable<GraphKind> = &[
    ("function", GraphKind::Function),
    ("parametric", GraphKind::Parametric),
    ("polar", GraphKind::Polar),
    ("implicit", GraphKind::Implicit),
];
const STYLES: EnumTable<GraphStyle> = &[
    ("lines", GraphStyle::Lines),
    ("points", GraphStyle::Points),
    ("surface", GraphStyle::Surface),
];

/// One sampled point. `value` is `None` where the expression is undefined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub at: f64,
    pub value: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct Graph {
    source: String,
    expr: Expr,
    pub kind: GraphKind,
    pub visible: bool,
    pub width: f64,
    pub opacity: f64,
    pub trange: Range,
    pub style: GraphStyle,
    pub points: i64,
    registry: PropertyRegistry<Graph>,
}

impl Graph {
    /// Parse `source` into a new function graph.
    pub fn new(source: &str) -> Result<Self, EvalError> {
        let source = source.trim();
        let expr = parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
            kind: GraphKind::default(),
            visible: true,
            width: 1.0,
            opacity: 1.0,
            trange: Range::from_bounds(0.0, 2.0 * PI),
            style: GraphStyle::default(),
            points: 200,
            registry: PropertyRegistry::new(),
        })
    }

    /// The expression as the user wrote it.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Replace the expression. On a parse error the graph is unchanged.
    pub fn set_source(&mut self, source: &str) -> Result<(), EvalError> {
        let source = source.trim();
        self.expr = parse(source)?;
        self.source = source.to_string();
        Ok(())
    }

    /// Evaluate the expression at `count` evenly spaced points of
    /// `[from, to]`, binding the kind's free variable over `scope`.
    pub fn sample(
        &self,
        scope: &dyn Scope,
        from: f64,
        to: f64,
        count: i64,
    ) -> Result<Vec<Sample>, ModelError> {
        let variable = self
            .kind
            .variable()
            .ok_or_else(|| ModelError::NotSampleable(self.kind.name().to_string()))?;
        let count = usize::try_from(count)
            .ok()
            .filter(|n| (2..=MAX_SAMPLES).contains(n))
            .ok_or(ModelError::SampleCount {
                count,
                max: MAX_SAMPLES,
            })?;

        let names = [variable];
        let step = (to - from) / (count - 1) as f64;
        (0..count)
            .map(|i| -> Result<Sample, ModelError> {
                let at = from + step * i as f64;
                let values = [at];
                let bindings = Bindings::new(scope, &names, &values);
                let value = evaluate(&self.expr, &bindings)?;
                Ok(Sample {
                    at,
                    value: value.is_finite().then_some(value),
                })
            })
            .collect()
    }

    /// One-line summary: `expr  (kind[, hidden])`.
    pub fn summary(&self) -> String {
        if self.visible {
            format!("{}  ({})", self.source, self.kind.name())
        } else {
            format!("{}  ({}, hidden)", self.source, self.kind.name())
        }
    }
}

impl Reflect for Graph {
    fn registry(&self) -> &PropertyRegistry<Self> {
        &self.registry
    }

    fn describe(set: &mut PropertySet<Self>) {
        set.add(text_property(
            "expr",
            "Plotted expression",
            |g: &Self| g.source.clone(),
            |g: &mut Self, text| {
                g.set_source(text)
                    .map_err(|e| PropertyError::Invalid(e.to_string()))
            },
        ))
        .add(enum_property(
            "kind",
            "graph kind",
            KINDS,
            |g: &Self| g.kind,
            |g: &mut Self, v| g.kind = v,
            None,
        ))
        .add(bool_property(
            "visible",
            "Draw this graph",
            |g: &Self| g.visible,
            |g: &mut Self, v| g.visible = v,
        ))
        .add(real_property(
            "width",
            "Line width",
            Limit::Above(0.0),
            |g: &Self| g.width,
            |g: &mut Self, v| g.width = v,
        ))
        .add(percent_property(
            "opacity",
            "Opacity",
            |g: &Self| g.opacity,
            |g: &mut Self, v| g.opacity = v,
        ))
        .add(
            range_property(
                "trange",
                "Parameter extent",
                |_: &Self| RangeNotation::Bounds,
                |g: &Self| g.trange,
                |g: &mut Self, r| g.trange = r,
            )
            .visible_when(|g: &Self| g.kind.uses_trange()),
        )
        .add(enum_property(
            "style",
            "drawing style",
            STYLES,
            |g: &Self| g.style,
            |g: &mut Self, v| g.style = v,
            None,
        ))
        .add(integer_property(
            "points",
            "Samples along the curve",
            Limit::AtLeast(2.0),
            |g: &Self| g.points,
            |g: &mut Self, v| g.points = v,
        ));
    }
}
