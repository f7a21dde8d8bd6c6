//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn get_deployment_color(&self, replicas: i32, paused: bool) -> TableColor {
        if paused {
            self.warning
        } else if replicas == 0 {
            self.muted
        } else {
            self.success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.info, TableColor::Cyan);
    }

    #[test]
    fn test_get_deployment_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_deployment_color(3, false), TableColor::Green);
        assert_eq!(theme.get_deployment_color(3, true), TableColor::Yellow);
        assert_eq!(theme.get_deployment_color(0, false), TableColor::DarkGrey);
    }
}
