//! UI widgets for Binaura

mod journeys;
mod session;
pub mod status_bar;
mod tone;

pub use journeys::JourneyListWidget;
pub use session::SessionWidget;
pub use status_bar::{MessageType, StatusBarWidget};
pub use tone::ToneWidget;

/// Horizontal fill bar, `fraction` clamped to 0.0 - 1.0
pub(crate) fn bar(width: usize, fraction: f32) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    let mut s = "█".repeat(filled);
    s.push_str(&"░".repeat(width - filled));
    s
}

/// Rendered buffer as text, one line per row
#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut text = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            text.push_str(buf[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar(4, 0.5), "██░░");
        assert_eq!(bar(4, 0.0), "░░░░");
        assert_eq!(bar(4, 2.0), "████");
        assert_eq!(bar(0, 0.5), "");
    }
}
