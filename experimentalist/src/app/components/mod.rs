mod file_handling;
mod groups;
mod palettes;
mod plotter;
mod settings;

pub use file_handling::{FileId, FileRegistry, Upload};
pub use groups::{ColourGroup, GroupBoard, GroupEditor};
pub use palettes::{Palette, PaletteBook, TAB10};
pub use plotter::{build_plan, save_svg, PlotPlan, Plotter, Series, EMPTY_PLOT_MESSAGE};
pub use settings::{
    resolve_columns, resolve_style, ColumnChoice, FileSettings, GlobalSettings, LineStyle,
    LineStyleChoice, Marker, MarkerChoice, Override, ResolvedStyle,
};
