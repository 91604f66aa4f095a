//! Plot-wide settings.

use gplot_core::{Range, RangeNotation};
use gplot_props::{
    EnumTable, Limit, Property, PropertyRegistry, PropertySet, Reflect, bool_property,
    enum_property, integer_property, percent_property, range_property, real_property,
    text_property,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Flat,
    Space,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Grid {
    Off,
    #[default]
    On,
    Full,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axes {
    None,
    Box,
    #[default]
    Cross,
}

const VIEWS: EnumTable<View> = &[("2d", View::Flat), ("3d", View::Space)];
const GRIDS: EnumTable<Grid> = &[("off", Grid::Off), ("on", Grid::On), ("full", Grid::Full)];
const AXES: EnumTable<Axes> = &[("none", Axes::None), ("box", Axes::Box), ("cross", Axes::Cross)];
const NOTATIONS: EnumTable<RangeNotation> = &[
    ("bounds", RangeNotation::Bounds),
    ("centered", RangeNotation::Centered),
];

#[derive(Clone, Debug)]
pub struct PlotSettings {
    pub view: View,
    pub grid: Grid,
    pub axes: Axes,
    /// Depth fog, 0..=1. Only meaningful in 3d.
    pub fog: f64,
    pub clip: bool,
    pub antialias: bool,
    pub xrange: Range,
    pub yrange: Range,
    pub zrange: Range,
    pub range_style: RangeNotation,
    pub line_width: f64,
    pub resolution: i64,
    pub title: String,
    /// Bumped whenever a display mode changes.
    revision: u64,
    registry: PropertyRegistry<PlotSettings>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            view: View::default(),
            grid: Grid::default(),
            axes: Axes::default(),
            fog: 0.0,
            clip: true,
            antialias: true,
            xrange: Range::default(),
            yrange: Range::default(),
            zrange: Range::default(),
            range_style: RangeNotation::default(),
            line_width: 1.0,
            resolution: 200,
            title: String::new(),
            revision: 0,
            registry: PropertyRegistry::new(),
        }
    }
}

impl PlotSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_3d(&self) -> bool {
        self.view == View::Space
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl Reflect for PlotSettings {
    fn registry(&self) -> &PropertyRegistry<Self> {
        &self.registry
    }

    fn describe(set: &mut PropertySet<Self>) {
        set.add(enum_property(
            "view",
            "view mode",
            VIEWS,
            |s: &Self| s.view,
            |s: &mut Self, v| s.view = v,
            Some(Self::touch),
        ))
        .add(enum_property(
            "grid",
            "grid mode",
            GRIDS,
            |s: &Self| s.grid,
            |s: &mut Self, v| s.grid = v,
            Some(Self::touch),
        ))
        .add(enum_property(
            "axes",
            "axes style",
            AXES,
            |s: &Self| s.axes,
            |s: &mut Self, v| s.axes = v,
            Some(Self::touch),
        ))
        .add(
            percent_property("fog", "Depth fog", |s: &Self| s.fog, |s: &mut Self, v| s.fog = v)
                .visible_when(Self::is_3d),
        )
        .add(bool_property(
            "clip",
            "Clip graphs to the view box",
            |s: &Self| s.clip,
            |s: &mut Self, v| s.clip = v,
        ))
        .add(bool_property(
            "antialias",
            "Smooth lines",
            |s: &Self| s.antialias,
            |s: &mut Self, v| s.antialias = v,
        ))
        .add(range_property(
            "xrange",
            "Horizontal extent",
            |s: &Self| s.range_style,
            |s: &Self| s.xrange,
            |s: &mut Self, r| s.xrange = r,
        ))
        .add(range_property(
            "yrange",
            "Vertical extent",
            |s: &Self| s.range_style,
            |s: &Self| s.yrange,
            |s: &mut Self, r| s.yrange = r,
        ))
        .add(
            range_property(
                "zrange",
                "Depth extent",
                |s: &Self| s.range_style,
                |s: &Self| s.zrange,
                |s: &mut Self, r| s.zrange = r,
            )
            .visible_when(Self::is_3d),
        )
        .add(enum_property(
            "range_style",
            "range notation",
            NOTATIONS,
            |s: &Self| s.range_style,
            |s: &mut Self, v| s.range_style = v,
            Some(Self::touch),
        ))
        .add(real_property(
            "line_width",
            "Default line width",
            Limit::Above(0.0),
            |s: &Self| s.line_width,
            |s: &mut Self, v| s.line_width = v,
        ))
        .add(integer_property(
            "resolution",
            "Samples per graph",
            Limit::AtLeast(2.0),
            |s: &Self| s.resolution,
            |s: &mut Self, v| s.resolution = v,
        ))
        .add(text_property(
            "title",
            "Plot title",
            |s: &Self| s.title.clone(),
            |s: &mut Self, text| {
                s.title = text.to_string();
                Ok(())
            },
        ))
        .add(Property::new("revision", "Display mode changes", |s: &Self| {
            s.revision.to_string()
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gplot_core::LiteralEvaluator;
    use gplot_props::PropertyError;

    fn visible(s: &PlotSettings) -> Vec<String> {
        s.visible_properties().into_iter().map(|i| i.name).collect()
    }

    #[test]
    fn defaults_read_back() {
        let s = PlotSettings::new();
        assert_eq!(s.get_property("view").unwrap(), "2d");
        assert_eq!(s.get_property("grid").unwrap(), "on");
        assert_eq!(s.get_property("axes").unwrap(), "cross");
        assert_eq!(s.get_property("clip").unwrap(), "on");
        assert_eq!(s.get_property("xrange").unwrap(), "[-10;10]");
        assert_eq!(s.get_property("resolution").unwrap(), "200");
        assert_eq!(s.get_property("title").unwrap(), "");
    }

    #[test]
    fn depth_properties_follow_view() {
        let mut s = PlotSettings::new();
        let names = visible(&s);
        assert!(!names.contains(&"fog".to_string()));
        assert!(!names.contains(&"zrange".to_string()));

        s.set_property("view", "3", &LiteralEvaluator).unwrap();
        let names = visible(&s);
        assert!(names.contains(&"fog".to_string()));
        assert!(names.contains(&"zrange".to_string()));
    }

    #[test]
    fn mode_changes_bump_revision() {
        let mut s = PlotSettings::new();
        s.set_property("grid", "full", &LiteralEvaluator).unwrap();
        s.set_property("axes", "b", &LiteralEvaluator).unwrap();
        s.set_property("line_width", "2", &LiteralEvaluator).unwrap();
        assert_eq!(s.revision(), 2);
        assert_eq!(s.get_property("revision").unwrap(), "2");
        assert_eq!(
            s.set_property("revision", "0", &LiteralEvaluator),
            Err(PropertyError::ReadOnly("revision".to_string()))
        );
    }

    #[test]
    fn range_style_changes_range_output() {
        let mut s = PlotSettings::new();
        s.set_property("xrange", "[0;4]", &LiteralEvaluator).unwrap();
        s.set_property("range_style", "c", &LiteralEvaluator).unwrap();
        assert_eq!(s.get_property("xrange").unwrap(), "2+-2");
    }

    #[test]
    fn shared_initial_picks_first_grid_mode() {
        let mut s = PlotSettings::new();
        s.set_property("grid", "o", &LiteralEvaluator).unwrap();
        assert_eq!(s.grid, Grid::Off);
        assert_eq!(s.get_property("grid").unwrap(), "off");
    }

    #[test]
    fn rejected_values_keep_defaults() {
        let mut s = PlotSettings::new();
        assert!(s.set_property("grid", "x", &LiteralEvaluator).is_err());
        assert!(s.set_property("resolution", "1", &LiteralEvaluator).is_err());
        assert!(s.set_property("line_width", "0", &LiteralEvaluator).is_err());
        assert_eq!(s.grid, Grid::On);
        assert_eq!(s.resolution, 200);
        assert_eq!(s.line_width, 1.0);
        assert_eq!(s.revision(), 0);
    }
}
