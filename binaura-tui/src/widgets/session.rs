//! Session widget - timer bar and running totals

use super::bar;
use crate::theme::Theme;
use binaura_core::{Clock, SessionClock};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::time::Duration;

pub struct SessionWidget<'a, C: Clock> {
    session: &'a SessionClock<C>,
    theme: &'a Theme,
}

impl<'a, C: Clock> SessionWidget<'a, C> {
    pub fn new(session: &'a SessionClock<C>, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    /// Total listening time as "1h 05m" / "12m"
    fn format_total(total: Duration) -> String {
        let minutes = total.as_secs() / 60;
        if minutes >= 60 {
            format!("{}h {:02}m", minutes / 60, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

impl<C: Clock> Widget for SessionWidget<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(" SESSION ", self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 20 || inner.height < 1 {
            return;
        }

        let length_min = self.session.length().as_secs() / 60;
        let progress = self.session.progress_percent() / 100.0;
        let bar_width = (inner.width as usize).saturating_sub(16).min(40);

        let timer = if self.session.is_running() {
            Span::styled(
                format!("{} left of {} min", self.session.remaining_label(), length_min),
                self.theme.normal(),
            )
        } else {
            Span::styled(format!("{} min, starts with playback", length_min), self.theme.dim())
        };

        let stats = self.session.stats();
        let lines = vec![
            Line::from(timer),
            Line::from(vec![
                Span::styled("      ", self.theme.dim()),
                Span::styled(bar(bar_width, progress), self.theme.level_style(0.0)),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} sessions, {} total",
                    stats.total_sessions,
                    Self::format_total(stats.total_time)
                ),
                self.theme.dim(),
            )),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
