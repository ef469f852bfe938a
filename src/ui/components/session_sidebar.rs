use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use quizr::session::Session;

use crate::ui::theme::Theme;

/// Running tally shown beside the question on wide terminals.
pub struct SessionSidebar<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> SessionSidebar<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for SessionSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let answered = session.answers().len();
        let correct = session.correct_count();
        let wrong = answered - correct;

        let label = Style::default().fg(colors.muted());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);
        let row = |name: &str, text: String, style: Style| {
            Line::from(vec![
                Span::styled(format!(" {name:<11}"), label),
                Span::styled(text, style),
            ])
        };

        let lines = vec![
            Line::from(""),
            row("Answered", format!("{answered}/{}", session.len()), value),
            row("Correct", correct.to_string(), value.fg(colors.correct())),
            row("Wrong", wrong.to_string(), value.fg(colors.incorrect())),
            row(
                "Flagged",
                session.flagged_positions().len().to_string(),
                value.fg(colors.flag()),
            ),
            row("Time", format!("{:.0}s", session.elapsed_secs()), value),
            Line::from(""),
            row("Difficulty", session.difficulty().to_string(), label),
            row("Count", session.count().to_string(), label),
        ];

        let block = Block::bordered()
            .title(" Session ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
