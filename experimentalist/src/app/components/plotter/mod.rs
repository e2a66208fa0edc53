mod logic;
mod ui;

pub use logic::{build_plan, save_svg, PlotPlan, Series, EMPTY_PLOT_MESSAGE};

/// Renders the current plot plan with `egui_plot`.
#[derive(Debug, Default)]
pub struct Plotter {
    /// Bumped whenever a new plan arrives, so the plot fits its new data.
    generation: usize,
}

impl Plotter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_bounds(&mut self) {
        self.generation += 1;
    }
}
