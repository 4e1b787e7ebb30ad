//! Tone widget - what the engine is playing right now

use super::bar;
use crate::theme::Theme;
use binaura_core::{PlaybackMode, PlaybackStatus};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Widget for the current activity, beat frequency, volume and journey progress
pub struct ToneWidget<'a> {
    status: &'a PlaybackStatus,
    theme: &'a Theme,
}

impl<'a> ToneWidget<'a> {
    pub fn new(status: &'a PlaybackStatus, theme: &'a Theme) -> Self {
        Self { status, theme }
    }

    /// "6.0 Hz beat  L 200.0 Hz  R 206.0 Hz"
    fn format_beat(beat_hz: f32, carrier_hz: f32) -> String {
        format!(
            "{:.1} Hz beat  L {:.1} Hz  R {:.1} Hz",
            beat_hz,
            carrier_hz,
            carrier_hz + beat_hz
        )
    }

    fn mode_line(&self) -> Line<'static> {
        match &self.status.mode {
            PlaybackMode::Idle => Line::from(Span::styled("idle", self.theme.dim())),
            PlaybackMode::HeldFrequency { band, index } => Line::from(vec![
                Span::styled("HOLD ", self.theme.title()),
                Span::styled(format!("{} {}", band, index + 1), self.theme.band_style(*band)),
                Span::styled(format!("  {}", band.info().description), self.theme.dim()),
            ]),
            PlaybackMode::Journey { name } => Line::from(vec![
                Span::styled("JOURNEY ", self.theme.title()),
                Span::styled(name.clone(), self.theme.normal()),
            ]),
        }
    }
}

impl Widget for ToneWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.status.mode.is_active() {
            self.theme.border_active()
        } else {
            self.theme.border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" TONE ", self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 20 || inner.height < 1 {
            return;
        }

        let bar_width = (inner.width as usize).saturating_sub(16).min(40);

        let beat = match self.status.current_frequency_hz {
            Some(hz) => Span::styled(Self::format_beat(hz, self.status.carrier_hz), self.theme.normal()),
            None => Span::styled("silent", self.theme.dim()),
        };

        let volume = self.status.volume;
        let mut lines = vec![
            self.mode_line(),
            Line::from(beat),
            Line::from(vec![
                Span::styled("vol   ", self.theme.dim()),
                Span::styled(bar(bar_width, volume), self.theme.level_style(volume)),
                Span::styled(format!(" {:>3.0}%", volume * 100.0), self.theme.normal()),
            ]),
        ];

        if let (Some((stage, count)), Some(percent)) = (self.status.stage, self.status.progress_percent) {
            lines.push(Line::from(vec![
                Span::styled(format!("{}/{}   ", stage + 1, count), self.theme.dim()),
                Span::styled(bar(bar_width, percent / 100.0), self.theme.level_style(0.0)),
                Span::styled(format!(" {:>3.0}%", percent), self.theme.normal()),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
