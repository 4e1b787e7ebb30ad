//! Colour theme for Binaura

use binaura_core::Band;
use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    pub bg: Color,
    /// Selected items, active elements
    pub highlight: Color,
    /// Gauges and bars
    pub accent: Color,
    pub warning: Color,
    pub danger: Color,
    pub delta: Color,
    pub theta: Color,
    pub alpha: Color,
}

impl Theme {
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    pub fn border_active(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Colour for a band, slow bands warm
    pub fn band_style(&self, band: Band) -> Style {
        let color = match band {
            Band::Delta => self.delta,
            Band::Theta => self.theta,
            Band::Alpha => self.alpha,
        };
        Style::default().fg(color)
    }

    /// Style for a level bar (0.0 - 1.0)
    pub fn level_style(&self, level: f32) -> Style {
        let color = if level > 0.9 {
            self.danger
        } else if level > 0.75 {
            self.warning
        } else {
            self.accent
        };
        Style::default().fg(color)
    }
}

/// Deep indigo night theme
pub const INDIGO: Theme = Theme {
    name: "indigo",
    fg: Color::Rgb(199, 210, 254),        // indigo-200
    fg_dim: Color::Rgb(107, 114, 128),    // gray-500
    bg: Color::Rgb(10, 10, 24),           // near black with indigo tint
    highlight: Color::Rgb(129, 140, 248), // indigo-400
    accent: Color::Rgb(99, 102, 241),     // indigo-500
    warning: Color::Rgb(250, 204, 21),
    danger: Color::Rgb(248, 113, 113),
    delta: Color::Rgb(167, 139, 250), // violet
    theta: Color::Rgb(96, 165, 250),  // blue
    alpha: Color::Rgb(52, 211, 153),  // green
};

impl Default for Theme {
    fn default() -> Self {
        INDIGO
    }
}
