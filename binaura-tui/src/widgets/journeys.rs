//! Journey list widget

use crate::theme::Theme;
use binaura_core::JourneyPreset;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Built-in journeys with their key and length; the running one is marked
pub struct JourneyListWidget<'a> {
    journeys: &'a [JourneyPreset],
    active: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> JourneyListWidget<'a> {
    pub fn new(journeys: &'a [JourneyPreset], theme: &'a Theme) -> Self {
        Self {
            journeys,
            active: None,
            theme,
        }
    }

    pub fn active(mut self, name: Option<&'a str>) -> Self {
        self.active = name;
        self
    }

    fn format_minutes(journey: &JourneyPreset) -> String {
        format!("{:>3} min", journey.total_duration().as_secs() / 60)
    }
}

impl Widget for JourneyListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(" JOURNEYS ", self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 {
            return;
        }

        let lines: Vec<Line> = self
            .journeys
            .iter()
            .take(9)
            .enumerate()
            .map(|(i, journey)| {
                let running = self.active.is_some_and(|name| journey.matches(name));
                let (marker, name_style) = if running {
                    ("▶", self.theme.highlight())
                } else {
                    (" ", self.theme.normal())
                };
                Line::from(vec![
                    Span::styled(format!("{} j{} ", marker, i + 1), self.theme.dim()),
                    Span::styled(format!("{:<12}", journey.name), name_style),
                    Span::styled(Self::format_minutes(journey), self.theme.normal()),
                    Span::styled(format!("  {}", journey.description), self.theme.dim()),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::buffer_text;
    use binaura_core::builtin_journeys;

    #[test]
    fn test_lists_journeys_with_keys() {
        let journeys = builtin_journeys();
        let area = Rect::new(0, 0, 80, 6);
        let mut buf = Buffer::empty(area);
        JourneyListWidget::new(&journeys, &Theme::default())
            .active(Some("deep-sleep"))
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("j1 unwind"));
        assert!(text.contains("▶ j2 deep-sleep"));
        assert!(text.contains("j3 reprogram"));
    }

    #[test]
    fn test_format_minutes() {
        let journeys = builtin_journeys();
        assert_eq!(JourneyListWidget::format_minutes(&journeys[0]), " 25 min");
    }
}
