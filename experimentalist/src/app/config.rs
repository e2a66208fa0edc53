use std::path::PathBuf;

use app_core::string_error::ErrorStringExt;
use serde::Deserialize;
use svg_export::LegendAnchor;

use super::components::GlobalSettings;

/// Start-up defaults, read from `~/.experimentalist.toml`. Every key is
/// optional:
///
/// ```toml
/// fig_width = 8.0
/// fig_height = 5.0
/// dpi = 150
/// title = "Calibration"
/// x_label = "time / s"
/// y_label = "signal"
/// legend = "upper left"
/// skip_rows = 2
/// svg_width = 1200
/// svg_height = 800
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub fig_width: f64,
    pub fig_height: f64,
    pub dpi: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend: String,
    pub skip_rows: usize,
    /// Pixel size of exported SVGs. Both must be set to take effect,
    /// otherwise the figure size times dpi is used.
    pub svg_width: Option<u64>,
    pub svg_height: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let globals = GlobalSettings::default();
        Self {
            fig_width: globals.fig_width,
            fig_height: globals.fig_height,
            dpi: globals.dpi,
            title: globals.title,
            x_label: globals.x_label,
            y_label: globals.y_label,
            legend: globals.legend.label().to_string(),
            skip_rows: 0,
            svg_width: None,
            svg_height: None,
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = ".experimentalist.toml";

    pub fn from_config_file() -> Result<Self, String> {
        let Some(home) = dirs::home_dir() else {
            return Err("could not determine home directory to load config file".into());
        };
        let path = home.join(PathBuf::from(Self::FILE_NAME));
        let raw = std::fs::read_to_string(path).err_to_string("could not open config file")?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).err_to_string("could not parse config file")
    }

    /// Global plot settings seeded from this config, clamped into range.
    pub fn global_settings(&self) -> GlobalSettings {
        let legend = LegendAnchor::from_label(&self.legend).unwrap_or_else(|| {
            log::warn!("unknown legend location '{}', using 'best'", self.legend);
            LegendAnchor::Best
        });
        let mut globals = GlobalSettings {
            fig_width: self.fig_width,
            fig_height: self.fig_height,
            dpi: self.dpi,
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            legend,
            ..Default::default()
        };
        globals.clamp();
        globals
    }

    pub fn svg_size(&self) -> Option<(u64, u64)> {
        self.svg_width.zip(self.svg_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml_str("dpi = 150\nlegend = \"upper left\"\n").unwrap();
        assert_eq!(config.dpi, 150);
        assert_eq!(config.title, "My Plot");
        assert_eq!(config.svg_size(), None);

        let globals = config.global_settings();
        assert_eq!(globals.legend, LegendAnchor::UpperLeft);
        assert_eq!(globals.dpi, 150);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_toml_str("dpi = \"many\"").is_err());

        let config = Config::from_toml_str(
            "fig_width = 99.0\nlegend = \"somewhere\"\nsvg_width = 300\nsvg_height = 200",
        )
        .unwrap();
        let globals = config.global_settings();
        assert_eq!(globals.fig_width, 20.0);
        assert_eq!(globals.legend, LegendAnchor::Best);
        assert_eq!(config.svg_size(), Some((300, 200)));
    }

    #[test]
    fn test_default_matches_global_defaults() {
        assert_eq!(Config::default().global_settings(), GlobalSettings::default());
    }
}
