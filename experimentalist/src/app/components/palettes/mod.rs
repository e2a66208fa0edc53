mod logic;
mod ui;

/// matplotlib's "tab10" colour cycle.
pub const TAB10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub const DEFAULT_PALETTE_NAME: &str = "Default";

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<String>,
}

/// Named palettes in creation order, one of them active. New colour groups
/// take their colour from the active palette.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteBook {
    palettes: Vec<Palette>,
    active: usize,
}

impl Default for PaletteBook {
    fn default() -> Self {
        Self {
            palettes: vec![Palette {
                name: DEFAULT_PALETTE_NAME.to_string(),
                colors: TAB10.iter().map(|c| c.to_string()).collect(),
            }],
            active: 0,
        }
    }
}
