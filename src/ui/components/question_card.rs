use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use quizr::session::QuestionView;

use crate::ui::theme::Theme;

pub struct QuestionCard<'a> {
    view: &'a QuestionView,
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(view: &'a QuestionView, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            view,
            cursor,
            theme,
        }
    }

    fn option_line(&self, index: usize, text: &str) -> Line<'static> {
        let colors = &self.theme.colors;
        let marker = format!(" {}. ", index + 1);

        let Some(feedback) = &self.view.answer else {
            let style = if index == self.cursor {
                Style::default()
                    .fg(colors.accent())
                    .bg(colors.selected_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            return Line::from(Span::styled(format!("{marker}{text}"), style));
        };

        // After answering: the right option in green, a wrong pick in red.
        let (suffix, style) = if index == feedback.correct_index {
            (
                "  \u{2713}",
                Style::default()
                    .fg(colors.correct())
                    .add_modifier(Modifier::BOLD),
            )
        } else if index == feedback.selected_index {
            (
                "  \u{2717}",
                Style::default()
                    .fg(colors.incorrect())
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else {
            ("", Style::default().fg(colors.muted()))
        };
        Line::from(Span::styled(format!("{marker}{text}{suffix}"), style))
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.view;

        let icon = if view.category_icon.is_empty() {
            String::new()
        } else {
            format!("{} ", view.category_icon)
        };
        let mut title = vec![Span::styled(
            format!(" {icon}{} \u{b7} {} ", view.category, view.difficulty),
            Style::default().fg(colors.accent()),
        )];
        if view.flagged {
            title.push(Span::styled(
                "\u{2691} flagged ",
                Style::default()
                    .fg(colors.flag())
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let option_rows = view.options.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(option_rows + 1),
                Constraint::Length(4),
            ])
            .split(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(" {}", view.prompt),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
        ])
        .wrap(Wrap { trim: false })
        .render(layout[0], buf);

        let options: Vec<Line> = view
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| self.option_line(i, text))
            .collect();
        Paragraph::new(options).render(layout[1], buf);

        if let Some(feedback) = &view.answer {
            let (verdict, color) = if feedback.correct {
                ("Correct!", colors.correct())
            } else {
                ("Not quite.", colors.incorrect())
            };
            let mut lines = vec![Line::from(Span::styled(
                format!(" {verdict}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))];
            if let Some(explanation) = &feedback.explanation {
                lines.push(Line::from(Span::styled(
                    format!(" {explanation}"),
                    Style::default().fg(colors.muted()),
                )));
            }
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .render(layout[2], buf);
        }
    }
}
