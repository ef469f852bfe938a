use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bordered single-row gauge. The label sits in the border, the fill text
/// (e.g. `3/10`) is centered over the bar.
pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub fill_text: String,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, theme: &'a Theme) -> Self {
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            label: label.to_string(),
            ratio,
            fill_text: format!("{:.0}%", ratio * 100.0),
            theme,
        }
    }

    pub fn fill_text(mut self, text: impl Into<String>) -> Self {
        self.fill_text = text.into();
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let text_width = self.fill_text.chars().count() as u16;
        let label_x = inner.x + (inner.width.saturating_sub(text_width)) / 2;
        buf.set_stringn(
            label_x,
            inner.y,
            &self.fill_text,
            inner.width as usize,
            Style::default().fg(colors.fg()),
        );
    }
}
