use crate::app::common::is_hex_color;

use super::{Palette, PaletteBook};

const NEW_COLOR: &str = "#000000";
const NEW_PALETTE_SEED: &str = "#1f77b4";

impl PaletteBook {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.palettes.iter().map(|p| p.name.as_str())
    }

    pub fn active_name(&self) -> &str {
        &self.active_palette().name
    }

    fn active_palette(&self) -> &Palette {
        // `active` always indexes an existing palette, palettes are never removed.
        &self.palettes[self.active]
    }

    /// Colours of the active palette, never empty.
    pub fn active_colors(&self) -> &[String] {
        &self.active_palette().colors
    }

    pub fn select(&mut self, name: &str) -> Result<(), String> {
        let idx = self
            .palettes
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| format!("no palette named '{name}'"))?;
        self.active = idx;
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, hex: &str) -> Result<(), String> {
        if !is_hex_color(hex) {
            return Err(format!("'{hex}' is not a hex colour"));
        }
        let active = self.active;
        let color = self.palettes[active]
            .colors
            .get_mut(index)
            .ok_or_else(|| format!("palette has no colour at position {index}"))?;
        hex.clone_into(color);
        Ok(())
    }

    pub fn push_color(&mut self) {
        let active = self.active;
        self.palettes[active].colors.push(NEW_COLOR.to_string());
    }

    /// Add a palette seeded with a single colour and make it the active one.
    pub fn create(&mut self, name: &str) -> Result<(), String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("palette name must not be empty".into());
        }
        if self.names().any(|existing| existing == name) {
            return Err(format!("a palette named '{name}' already exists"));
        }
        self.palettes.push(Palette {
            name: name.to_string(),
            colors: vec![NEW_PALETTE_SEED.to_string()],
        });
        self.active = self.palettes.len() - 1;
        log::debug!("created palette '{name}'");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::components::palettes::TAB10;

    #[test]
    fn test_default_palette_is_tab10() {
        let book = PaletteBook::default();
        assert_eq!(book.active_name(), "Default");
        assert_eq!(book.active_colors().len(), 10);
        assert_eq!(book.active_colors()[0], TAB10[0]);
        assert_eq!(book.active_colors()[1], "#ff7f0e");
    }

    #[test]
    fn test_create_and_select() {
        let mut book = PaletteBook::default();
        book.create("Mine").unwrap();
        assert_eq!(book.active_name(), "Mine");
        assert_eq!(book.active_colors(), ["#1f77b4".to_string()]);

        assert!(book.create("Mine").is_err());
        assert!(book.create("  ").is_err());

        book.select("Default").unwrap();
        assert_eq!(book.active_colors().len(), 10);
        assert!(book.select("Missing").is_err());
        assert_eq!(book.names().collect::<Vec<_>>(), vec!["Default", "Mine"]);
    }

    #[test]
    fn test_edit_active_palette() {
        let mut book = PaletteBook::default();
        book.create("Mine").unwrap();
        book.push_color();
        assert_eq!(book.active_colors()[1], "#000000");
        book.set_color(1, "#abcdef").unwrap();
        assert_eq!(book.active_colors()[1], "#abcdef");
        assert!(book.set_color(2, "#abcdef").is_err());
        assert!(book.set_color(0, "red").is_err());

        book.select("Default").unwrap();
        assert_eq!(book.active_colors()[1], "#ff7f0e");
    }
}
