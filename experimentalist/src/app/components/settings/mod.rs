mod logic;
mod ui;

use std::ops::RangeInclusive;

pub use logic::{resolve_columns, resolve_style, ResolvedStyle};
pub(crate) use ui::hex_color_edit;
use svg_export::LegendAnchor;

pub const FIG_WIDTH_RANGE: RangeInclusive<f64> = 2.0..=20.0;
pub const FIG_HEIGHT_RANGE: RangeInclusive<f64> = 2.0..=15.0;
pub const DPI_RANGE: RangeInclusive<u32> = 50..=600;
pub const LINE_WIDTH_RANGE: RangeInclusive<f64> = 0.5..=10.0;
pub const ALPHA_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const MARKER_SIZE_RANGE: RangeInclusive<f64> = 1.0..=20.0;

/// The four matplotlib line styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
}

/// A column picked for one file, or whatever the global setting says.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ColumnChoice {
    #[default]
    UseGlobal,
    Column(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineStyleChoice {
    #[default]
    UseGlobal,
    None,
    Style(LineStyle),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkerChoice {
    #[default]
    UseGlobal,
    None,
    Marker(Marker),
}

/// A per-file value that only counts while `enabled`.
#[derive(Clone, Debug, PartialEq)]
pub struct Override<T> {
    pub enabled: bool,
    pub value: T,
}

/// Figure geometry, labels and the fallback style of every file.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSettings {
    /// Inches.
    pub fig_width: f64,
    /// Inches.
    pub fig_height: f64,
    pub dpi: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend: LegendAnchor,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub color: String,
    /// `None` draws no connecting lines.
    pub linestyle: Option<LineStyle>,
    pub linewidth: f64,
    pub alpha: f64,
}

/// Style overrides of a single file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileSettings {
    pub show: bool,
    pub legend: String,
    pub x: ColumnChoice,
    pub y: ColumnChoice,
    pub color: Override<String>,
    pub linestyle: LineStyleChoice,
    pub linewidth: Override<f64>,
    pub alpha: Override<f64>,
    pub marker: MarkerChoice,
    pub markersize: Override<f64>,
    pub zorder: Override<i32>,
}

impl LineStyle {
    pub const ALL: [LineStyle; 4] = [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::DashDot,
        LineStyle::Dotted,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
            LineStyle::DashDot => "-.",
            LineStyle::Dotted => ":",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ls| ls.symbol() == symbol)
    }
}

impl Marker {
    pub const ALL: [Marker; 7] = [
        Marker::Circle,
        Marker::Square,
        Marker::TriangleUp,
        Marker::TriangleDown,
        Marker::Diamond,
        Marker::Cross,
        Marker::Plus,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::Circle => "o",
            Marker::Square => "s",
            Marker::TriangleUp => "^",
            Marker::TriangleDown => "v",
            Marker::Diamond => "D",
            Marker::Cross => "x",
            Marker::Plus => "+",
        }
    }
}

impl<T> Override<T> {
    pub fn off(value: T) -> Self {
        Self {
            enabled: false,
            value,
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.enabled.then_some(&self.value)
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            fig_width: 6.0,
            fig_height: 4.0,
            dpi: 100,
            title: "My Plot".to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            legend: LegendAnchor::Best,
            x_column: None,
            y_column: None,
            color: "#1f77b4".to_string(),
            linestyle: Some(LineStyle::Solid),
            linewidth: 1.5,
            alpha: 1.0,
        }
    }
}

impl FileSettings {
    /// Defaults for a new file: shown, labelled with its file name, colour
    /// override seeded with its group colour, everything else from globals.
    pub fn new(file_name: &str, group_color: &str) -> Self {
        Self {
            show: true,
            legend: file_name.to_string(),
            x: ColumnChoice::UseGlobal,
            y: ColumnChoice::UseGlobal,
            color: Override::off(group_color.to_string()),
            linestyle: LineStyleChoice::UseGlobal,
            linewidth: Override::off(1.5),
            alpha: Override::off(1.0),
            marker: MarkerChoice::UseGlobal,
            markersize: Override::off(6.0),
            zorder: Override::off(1),
        }
    }
}
