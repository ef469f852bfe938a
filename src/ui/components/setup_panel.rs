use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use quizr::engine::selector::CountSpec;

use crate::app::{SetupRow, SetupState};
use crate::ui::theme::Theme;

pub struct SetupPanel<'a> {
    setup: &'a SetupState,
    theme: &'a Theme,
}

impl<'a> SetupPanel<'a> {
    pub fn new(setup: &'a SetupState, theme: &'a Theme) -> Self {
        Self { setup, theme }
    }

    fn row_style(&self, row: SetupRow) -> Style {
        let colors = &self.theme.colors;
        if self.setup.current_row() == row {
            Style::default()
                .fg(colors.accent())
                .bg(colors.selected_bg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        }
    }

    fn indicator(&self, row: SetupRow) -> &'static str {
        if self.setup.current_row() == row { ">" } else { " " }
    }
}

impl Widget for SetupPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" New Quiz ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(5),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Pick categories",
            Style::default().fg(colors.muted()),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        // Categories scroll so the cursor stays visible.
        let visible = layout[1].height as usize;
        let first = match self.setup.current_row() {
            SetupRow::Category(i) if i >= visible => i + 1 - visible,
            _ => 0,
        };
        let category_lines: Vec<Line> = self
            .setup
            .categories
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, choice)| {
                let row = SetupRow::Category(i);
                let check = if choice.selected { "[x]" } else { "[ ]" };
                let icon = if choice.icon.is_empty() {
                    String::new()
                } else {
                    format!("{} ", choice.icon)
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {} {check} {icon}{}", self.indicator(row), choice.name),
                        self.row_style(row),
                    ),
                    Span::styled(
                        format!("  ({})", choice.available),
                        Style::default().fg(colors.muted()),
                    ),
                ])
            })
            .collect();
        Paragraph::new(category_lines).render(layout[1], buf);

        let count_label = match self.setup.count() {
            CountSpec::Flagged => format!("flagged ({})", self.setup.flagged_available),
            other => other.to_string(),
        };
        let controls = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(" {} Questions:  < {count_label} >", self.indicator(SetupRow::Count)),
                self.row_style(SetupRow::Count),
            )),
            Line::from(Span::styled(
                format!(
                    " {} Difficulty: < {} >",
                    self.indicator(SetupRow::Difficulty),
                    self.setup.difficulty
                ),
                self.row_style(SetupRow::Difficulty),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(" {} [ Start quiz ]", self.indicator(SetupRow::Start)),
                self.row_style(SetupRow::Start),
            )),
        ];
        Paragraph::new(controls).render(layout[2], buf);

        if let Some(message) = &self.setup.message {
            Paragraph::new(Line::from(Span::styled(
                format!(" {message}"),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )))
            .wrap(Wrap { trim: true })
            .render(layout[3], buf);
        }
    }
}
