use crate::app::common::is_hex_color;

use super::{
    ColumnChoice, FileSettings, GlobalSettings, LineStyle, LineStyleChoice, Marker, MarkerChoice,
    ALPHA_RANGE, DPI_RANGE, FIG_HEIGHT_RANGE, FIG_WIDTH_RANGE, LINE_WIDTH_RANGE,
};

/// Final draw attributes of one file. `None` for marker size and z-order
/// leaves them to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub color: String,
    pub linestyle: Option<LineStyle>,
    pub linewidth: f64,
    pub alpha: f64,
    pub marker: Option<Marker>,
    pub markersize: Option<f64>,
    pub zorder: Option<i32>,
}

/// Merge the file's overrides, its group colour and the global defaults,
/// attribute by attribute.
pub fn resolve_style(s: &FileSettings, g: &GlobalSettings, group_color: &str) -> ResolvedStyle {
    let color = match s.color.get() {
        Some(color) => color.as_str(),
        None => group_color,
    };
    let color = if is_hex_color(color) { color } else { g.color.as_str() };

    let linestyle = match s.linestyle {
        LineStyleChoice::UseGlobal => g.linestyle,
        LineStyleChoice::None => None,
        LineStyleChoice::Style(ls) => Some(ls),
    };

    // There is no global marker, "use global" means no marker.
    let marker = match s.marker {
        MarkerChoice::UseGlobal | MarkerChoice::None => None,
        MarkerChoice::Marker(m) => Some(m),
    };

    ResolvedStyle {
        color: color.to_string(),
        linestyle,
        linewidth: s.linewidth.get().copied().unwrap_or(g.linewidth),
        alpha: s.alpha.get().copied().unwrap_or(g.alpha),
        marker,
        markersize: s.markersize.get().copied(),
        zorder: s.zorder.get().copied(),
    }
}

/// The x and y column names to plot for a file, `None` while no global
/// column is set and the file does not override it.
pub fn resolve_columns<'a>(s: &'a FileSettings, g: &'a GlobalSettings) -> Option<(&'a str, &'a str)> {
    let pick = |choice: &'a ColumnChoice, global: &'a Option<String>| match choice {
        ColumnChoice::UseGlobal => global.as_deref(),
        ColumnChoice::Column(name) => Some(name.as_str()),
    };
    Some((pick(&s.x, &g.x_column)?, pick(&s.y, &g.y_column)?))
}

impl GlobalSettings {
    /// Pin every number into its allowed range.
    pub fn clamp(&mut self) {
        let clamp = |v: f64, range: &std::ops::RangeInclusive<f64>| {
            if v.is_nan() {
                *range.start()
            } else {
                v.clamp(*range.start(), *range.end())
            }
        };
        self.fig_width = clamp(self.fig_width, &FIG_WIDTH_RANGE);
        self.fig_height = clamp(self.fig_height, &FIG_HEIGHT_RANGE);
        self.linewidth = clamp(self.linewidth, &LINE_WIDTH_RANGE);
        self.alpha = clamp(self.alpha, &ALPHA_RANGE);
        self.dpi = self.dpi.clamp(*DPI_RANGE.start(), *DPI_RANGE.end());
    }

    /// Keep the global columns valid for `columns` (those of the first
    /// loaded file). Missing selections become the first column for x and
    /// the second (or first) column for y.
    pub fn sync_columns(&mut self, columns: &[&str]) {
        let (default_x, default_y) = default_columns(columns);
        let valid = |sel: &Option<String>| sel.as_deref().is_some_and(|c| columns.contains(&c));
        if !valid(&self.x_column) {
            self.x_column = default_x;
        }
        if !valid(&self.y_column) {
            self.y_column = default_y;
        }
    }
}

fn default_columns(columns: &[&str]) -> (Option<String>, Option<String>) {
    let x = columns.first().map(|c| c.to_string());
    let y = columns.get(1).or(columns.first()).map(|c| c.to_string());
    (x, y)
}

impl FileSettings {
    /// Drop per-file column choices the file does not have any more.
    pub fn sync_columns(&mut self, columns: &[&str]) {
        for choice in [&mut self.x, &mut self.y] {
            if let ColumnChoice::Column(name) = choice {
                if !columns.contains(&name.as_str()) {
                    *choice = ColumnChoice::UseGlobal;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::components::settings::Override;

    fn globals() -> GlobalSettings {
        GlobalSettings {
            x_column: Some("t".into()),
            y_column: Some("v".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_fall_through_to_group_and_globals() {
        let g = globals();
        let s = FileSettings::new("a.csv", "#ff7f0e");
        let style = resolve_style(&s, &g, "#2ca02c");
        assert_eq!(
            style,
            ResolvedStyle {
                color: "#2ca02c".into(),
                linestyle: Some(LineStyle::Solid),
                linewidth: 1.5,
                alpha: 1.0,
                marker: None,
                markersize: None,
                zorder: None,
            }
        );
        assert_eq!(resolve_columns(&s, &g), Some(("t", "v")));
    }

    #[test]
    fn test_color_override_precedence() {
        let g = globals();
        let mut s = FileSettings::new("a.csv", "#ff7f0e");

        s.color.value = "#000000".into();
        assert_eq!(resolve_style(&s, &g, "#2ca02c").color, "#2ca02c");
        s.color.value = "#ffffff".into();
        assert_eq!(resolve_style(&s, &g, "#2ca02c").color, "#2ca02c");

        s.color.enabled = true;
        assert_eq!(resolve_style(&s, &g, "#2ca02c").color, "#ffffff");
        assert_eq!(resolve_style(&s, &g, "#d62728").color, "#ffffff");
    }

    #[test]
    fn test_invalid_group_color_uses_global() {
        let mut g = globals();
        g.color = "#123456".into();
        let s = FileSettings::new("a.csv", "oops");
        assert_eq!(resolve_style(&s, &g, "oops").color, "#123456");
    }

    #[test]
    fn test_linestyle_and_marker_resolution() {
        let mut g = globals();
        g.linestyle = Some(LineStyle::Dotted);
        let mut s = FileSettings::new("a.csv", "#ff7f0e");
        assert_eq!(resolve_style(&s, &g, "#000000").linestyle, Some(LineStyle::Dotted));

        s.linestyle = LineStyleChoice::None;
        assert_eq!(resolve_style(&s, &g, "#000000").linestyle, None);
        s.linestyle = LineStyleChoice::Style(LineStyle::DashDot);
        assert_eq!(resolve_style(&s, &g, "#000000").linestyle, Some(LineStyle::DashDot));

        s.marker = MarkerChoice::UseGlobal;
        assert_eq!(resolve_style(&s, &g, "#000000").marker, None);
        s.marker = MarkerChoice::Marker(Marker::Diamond);
        assert_eq!(resolve_style(&s, &g, "#000000").marker, Some(Marker::Diamond));
    }

    #[test]
    fn test_numeric_overrides() {
        let g = globals();
        let mut s = FileSettings::new("a.csv", "#ff7f0e");
        s.linewidth = Override { enabled: true, value: 4.0 };
        s.alpha = Override { enabled: false, value: 0.2 };
        s.markersize = Override { enabled: true, value: 12.0 };
        s.zorder = Override { enabled: true, value: 7 };
        let style = resolve_style(&s, &g, "#000000");
        assert_eq!(style.linewidth, 4.0);
        assert_eq!(style.alpha, 1.0);
        assert_eq!(style.markersize, Some(12.0));
        assert_eq!(style.zorder, Some(7));
    }

    #[test]
    fn test_column_overrides() {
        let g = globals();
        let mut s = FileSettings::new("a.csv", "#ff7f0e");
        s.y = ColumnChoice::Column("w".into());
        assert_eq!(resolve_columns(&s, &g), Some(("t", "w")));

        s.sync_columns(&["t", "v"]);
        assert_eq!(s.y, ColumnChoice::UseGlobal);
        assert_eq!(resolve_columns(&s, &GlobalSettings::default()), None);
    }

    #[test]
    fn test_sync_global_columns() {
        let mut g = GlobalSettings::default();
        g.sync_columns(&["t", "v", "w"]);
        assert_eq!(g.x_column.as_deref(), Some("t"));
        assert_eq!(g.y_column.as_deref(), Some("v"));

        g.y_column = Some("w".into());
        g.sync_columns(&["t", "v", "w"]);
        assert_eq!(g.y_column.as_deref(), Some("w"));

        g.sync_columns(&["only"]);
        assert_eq!(g.x_column.as_deref(), Some("only"));
        assert_eq!(g.y_column.as_deref(), Some("only"));
    }

    #[test]
    fn test_clamp() {
        let mut g = GlobalSettings {
            fig_width: 100.0,
            fig_height: f64::NAN,
            dpi: 10,
            linewidth: 0.0,
            alpha: 2.0,
            ..Default::default()
        };
        g.clamp();
        assert_eq!(g.fig_width, 20.0);
        assert_eq!(g.fig_height, 2.0);
        assert_eq!(g.dpi, 50);
        assert_eq!(g.linewidth, 0.5);
        assert_eq!(g.alpha, 1.0);
    }
}
