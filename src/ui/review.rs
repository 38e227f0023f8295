use super::{centered_rect, error_line, help_line, muted_line};
use crate::models::ReviewQuestion;
use crate::review::{ReviewOverlay, ReviewPager};
use crate::utils::{format_score, format_time_ms};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn choice_line(text: &str, id: &str, selected: bool, correct: bool) -> Line<'static> {
    let (mark, color) = match (selected, correct) {
        (true, true) => ("✓", Color::Green),
        (true, false) => ("✗", Color::Red),
        (false, true) => ("○", Color::Yellow),
        (false, false) => (" ", Color::Gray),
    };
    let mut style = Style::default().fg(color);
    if selected || correct {
        style = style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(format!(" {} ", mark), style),
        Span::styled(format!("{}) {}", id, text), style),
    ])
}

/// Lines for the pager's current question, with its position and verdict.
pub(super) fn review_text(pager: &ReviewPager) -> Text<'static> {
    let Some(question) = pager.current() else {
        return Text::from(muted_line("Keine Auswertung verfügbar."));
    };

    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        format!(
            "Frage {}/{} · {}",
            pager.index() + 1,
            pager.len(),
            question.topic
        ),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(question.prompt.clone()));
    text.push_line(Line::from(""));
    for choice in &question.choices {
        text.push_line(choice_line(&choice.text, &choice.id, choice.selected, choice.correct));
    }
    text.push_line(Line::from(""));
    text.push_line(verdict_line(question));
    text
}

fn verdict_line(question: &ReviewQuestion) -> Line<'static> {
    if question.is_correct() {
        Line::from(Span::styled(
            "Richtig beantwortet",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "Nicht ganz richtig",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    }
}

pub fn draw_review_overlay(f: &mut Frame, overlay: &ReviewOverlay) {
    let area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, area);

    let title = match &overlay.result {
        Some(result) => format!(
            "Auswertung: {} · {} · {}",
            result.name,
            format_score(result),
            format_time_ms(result.time_ms)
        ),
        None => "Auswertung".to_string(),
    };

    let mut text = if overlay.is_loading {
        Text::from(muted_line("Auswertung wird geladen..."))
    } else if let Some(error) = &overlay.error_message {
        Text::from(error_line(error))
    } else {
        review_text(&overlay.pager)
    };
    text.push_line(Line::from(""));
    text.push_line(help_line(&[("←/→", "Blättern"), ("Esc", "Schließen")]));

    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(popup, area);
}
