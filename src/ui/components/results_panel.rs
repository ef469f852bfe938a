use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use quizr::session::QuizResult;

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct ResultsPanel<'a> {
    result: &'a QuizResult,
    scroll: usize,
    theme: &'a Theme,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(result: &'a QuizResult, scroll: usize, theme: &'a Theme) -> Self {
        Self {
            result,
            scroll,
            theme,
        }
    }

    fn summary_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let r = self.result;
        let grade_color = if r.percentage >= 70.0 {
            colors.correct()
        } else if r.percentage >= 50.0 {
            colors.warning()
        } else {
            colors.incorrect()
        };
        let label = Style::default().fg(colors.muted());
        let value = Style::default().fg(colors.fg());

        vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Grade     ", label),
                Span::styled(
                    r.grade.clone(),
                    Style::default().fg(grade_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("   {:.1}%", r.percentage), value),
            ]),
            Line::from(vec![
                Span::styled("  Score     ", label),
                Span::styled(format!("{} / {} correct", r.correct, r.total), value),
                Span::styled(
                    format!("   ({} answered, {} wrong or skipped)", r.answered, r.incorrect),
                    label,
                ),
            ]),
            Line::from(vec![
                Span::styled("  Time      ", label),
                Span::styled(
                    format!("{:.1}s total, {:.1}s per question", r.elapsed_secs, r.average_secs),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("  Started   ", label),
                Span::styled(r.started_at.format("%Y-%m-%d %H:%M UTC").to_string(), value),
            ]),
        ]
    }

    fn flagged_lines(&self, height: usize) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        if self.result.flagged.is_empty() {
            return vec![Line::from(Span::styled(
                " No questions flagged this session.",
                Style::default().fg(colors.muted()),
            ))];
        }

        let mut lines = Vec::new();
        for item in self.result.flagged.iter().skip(self.scroll) {
            if lines.len() + 3 > height {
                break;
            }
            let answer_color = if item.correct {
                colors.correct()
            } else {
                colors.incorrect()
            };
            lines.push(Line::from(Span::styled(
                format!(" \u{2691} Q{}. {}", item.position + 1, item.prompt),
                Style::default().fg(colors.flag()),
            )));
            lines.push(Line::from(vec![
                Span::styled("     your answer: ", Style::default().fg(colors.muted())),
                Span::styled(item.answer_label().to_string(), Style::default().fg(answer_color)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("     correct:     ", Style::default().fg(colors.muted())),
                Span::styled(item.correct_option.clone(), Style::default().fg(colors.correct())),
            ]));
        }
        lines
    }
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Results ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let category_rows = self.result.categories.len() as u16 * 3;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(category_rows + 1),
                Constraint::Min(3),
            ])
            .split(inner);

        Paragraph::new(self.summary_lines()).render(layout[0], buf);

        let bars = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.result
                    .categories
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[1].inner(Margin::new(1, 0)));
        for (score, bar_area) in self.result.categories.iter().zip(bars.iter()) {
            let label = format!("{} {}/{}", score.name, score.correct, score.total);
            ProgressBar::new(&label, score.percentage / 100.0, self.theme)
                .fill_text(format!("{:.0}%", score.percentage))
                .render(*bar_area, buf);
        }

        let flagged_block = Block::bordered()
            .title(format!(" Flagged ({}) ", self.result.flagged.len()))
            .border_style(Style::default().fg(colors.border()));
        let flagged_inner = flagged_block.inner(layout[2]);
        flagged_block.render(layout[2], buf);
        Paragraph::new(self.flagged_lines(flagged_inner.height as usize))
            .wrap(Wrap { trim: false })
            .render(flagged_inner, buf);
    }
}
