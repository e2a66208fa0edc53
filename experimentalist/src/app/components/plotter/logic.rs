use std::{collections::HashMap, io::Write, path::Path};

use app_core::string_error::ErrorStringExt;
use svg_export::{Axis, Dash, Figure, LegendAnchor, LinePlot, MarkerShape};

use crate::app::components::{
    resolve_columns, resolve_style, FileId, FileRegistry, FileSettings, GlobalSettings,
    GroupBoard, LineStyle, Marker, ResolvedStyle,
};

pub const EMPTY_PLOT_MESSAGE: &str = "No valid datasets selected.";

/// Renderer defaults for values a file leaves unset.
pub(crate) const DEFAULT_MARKER_SIZE: f64 = 6.0;
pub(crate) const DEFAULT_ZORDER: f64 = 2.0;

const POINTS_PER_INCH: f64 = 72.0;

/// One drawn file.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub file: FileId,
    pub label: String,
    pub x_column: String,
    pub y_column: String,
    pub style: ResolvedStyle,
    pub points: Vec<[f64; 2]>,
}

/// Everything needed to draw one figure.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotPlan {
    pub width_px: f64,
    pub height_px: f64,
    pub dpi: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend: LegendAnchor,
    /// Group order, then file order within the group.
    pub series: Vec<Series>,
}

/// Resolve every visible file into a series. Files which are hidden, not
/// loaded or lack one of their columns are skipped; `None` if nothing is left.
pub fn build_plan(
    groups: &GroupBoard,
    files: &FileRegistry,
    file_settings: &HashMap<FileId, FileSettings>,
    globals: &GlobalSettings,
) -> Option<PlotPlan> {
    let mut series = Vec::new();
    for grp in groups.groups() {
        for fid in grp.files.iter() {
            let (Some(s), Some(table)) = (file_settings.get(fid), files.table(*fid)) else {
                continue;
            };
            if !s.show {
                continue;
            }
            let Some((x_column, y_column)) = resolve_columns(s, globals) else {
                continue;
            };
            let Some(points) = table.xy(x_column, y_column) else {
                log::trace!("{:?} has no column '{}' or '{}'", fid, x_column, y_column);
                continue;
            };
            series.push(Series {
                file: *fid,
                label: s.legend.clone(),
                x_column: x_column.to_string(),
                y_column: y_column.to_string(),
                style: resolve_style(s, globals, &grp.color),
                points,
            });
        }
    }
    if series.is_empty() {
        return None;
    }
    Some(PlotPlan {
        width_px: globals.fig_width * globals.dpi as f64,
        height_px: globals.fig_height * globals.dpi as f64,
        dpi: globals.dpi,
        title: globals.title.clone(),
        x_label: globals.x_label.clone(),
        y_label: globals.y_label.clone(),
        legend: globals.legend,
        series,
    })
}

impl PlotPlan {
    /// Series in the order they are painted: ascending z-order, plan order
    /// among equal z-orders.
    pub fn draw_order(&self) -> Vec<&Series> {
        let mut order: Vec<_> = self.series.iter().collect();
        order.sort_by(|a, b| a.zorder().total_cmp(&b.zorder()));
        order
    }

    /// Convert a size in typographic points to pixels at the plan's dpi.
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / POINTS_PER_INCH
    }

    pub fn to_figure(&self, size: Option<(u64, u64)>) -> Figure {
        let (width, height) =
            size.unwrap_or((self.width_px.round() as u64, self.height_px.round() as u64));
        let mut ax = Axis::default()
            .with_xlabel(&self.x_label)
            .with_ylabel(&self.y_label)
            .with_legend(self.legend);
        for s in self.series.iter() {
            let xs: Vec<f64> = s.points.iter().map(|[x, _]| *x).collect();
            let ys: Vec<f64> = s.points.iter().map(|[_, y]| *y).collect();
            let line = LinePlot::new(&xs, &ys)
                .with_color(&s.style.color)
                .with_linewidth(self.pt_to_px(s.style.linewidth))
                .with_dash(s.style.linestyle.map(dash))
                .with_opacity(s.style.alpha)
                .with_marker(
                    s.style.marker.map(marker_shape),
                    self.pt_to_px(s.style.markersize.unwrap_or(DEFAULT_MARKER_SIZE)),
                )
                .with_zorder(s.zorder())
                .with_name(&s.label);
            ax.add_line(line);
        }
        ax.autoscale();

        let mut fig = Figure::empty(width, height).with_title(&self.title);
        ax.insert_into(&mut fig);
        fig
    }
}

impl Series {
    pub fn zorder(&self) -> f64 {
        self.style
            .zorder
            .map(|z| z as f64)
            .unwrap_or(DEFAULT_ZORDER)
    }
}

fn dash(ls: LineStyle) -> Dash {
    match ls {
        LineStyle::Solid => Dash::Solid,
        LineStyle::Dashed => Dash::Dashed,
        LineStyle::DashDot => Dash::DashDot,
        LineStyle::Dotted => Dash::Dotted,
    }
}

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Circle => MarkerShape::Circle,
        Marker::Square => MarkerShape::Square,
        Marker::TriangleUp => MarkerShape::TriangleUp,
        Marker::TriangleDown => MarkerShape::TriangleDown,
        Marker::Diamond => MarkerShape::Diamond,
        Marker::Cross => MarkerShape::Cross,
        Marker::Plus => MarkerShape::Plus,
    }
}

/// Write the plan as SVG to `path`. `size` overrides the pixel size derived
/// from the figure settings.
pub fn save_svg(plan: &PlotPlan, path: &Path, size: Option<(u64, u64)>) -> Result<(), String> {
    log::debug!("requested to save svg at '{:?}'", path);
    let mut file =
        std::fs::File::create(path).err_to_string("unable to create file for saving svg")?;
    file.write_all(plan.to_figure(size).render().as_bytes())
        .err_to_string("could not write svg file")?;
    log::info!("saved plot to {:?}", path);
    Ok(())
}
