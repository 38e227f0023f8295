use super::leaderboard::entry_text;
use super::review::review_text;
use super::{calculate_quiz_chunks, centered_rect, draw_help, error_line, help_line, key_style, muted_line};
use crate::models::QuizPhase;
use crate::session::QuizSession;
use crate::utils::{format_score, format_time_ms};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

pub fn draw_quiz(f: &mut Frame, session: &QuizSession) {
    let layout = calculate_quiz_chunks(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "Ethik-Quiz · Frage {} · {}",
                session.progress_label(),
                session.timer_display()
            ),
            key_style(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(session.progress_percent().min(100))
        .label(session.status_message());
    f.render_widget(gauge, layout.progress_area);

    let (title, body, keys): (&str, Text, &[(&str, &str)]) = match session.phase {
        QuizPhase::Loading => (
            "",
            Text::from(muted_line(if session.questions.is_empty() {
                "Quizfragen werden geladen..."
            } else {
                "Antworten werden ausgewertet..."
            })),
            &[("Ctrl+C", "Beenden")],
        ),
        QuizPhase::Error => (
            "Fehler",
            Text::from(error_line(session.error_message.as_deref().unwrap_or_default())),
            &[("r", "Erneut laden"), ("Esc", "Menü")],
        ),
        QuizPhase::Intro => (
            "Willkommen",
            intro_text(session),
            &[("Enter", "Quiz starten"), ("n", "Name ändern"), ("Esc", "Menü")],
        ),
        QuizPhase::Quiz => (
            "Frage",
            question_text(session),
            &[
                ("↑/↓", "Auswahl"),
                ("Space/1-9", "Markieren"),
                ("Enter/→", "Weiter"),
                ("←", "Zurück"),
                ("Esc", "Abbrechen"),
            ],
        ),
        QuizPhase::Confirm => (
            "Abschicken?",
            confirm_text(session),
            &[("Enter", "Absenden"), ("←", "Zurück"), ("Esc", "Abbrechen")],
        ),
        QuizPhase::Submitted => (
            "Ergebnis",
            Text::default(),
            &[
                ("←/→", "Auswertung"),
                ("r", "Neuer Versuch"),
                ("l", "Leaderboard"),
                ("Esc", "Menü"),
            ],
        ),
    };

    if session.phase == QuizPhase::Submitted {
        draw_submitted(f, session, layout.body_area);
    } else {
        let block = Block::default().borders(Borders::ALL).title(title);
        f.render_widget(
            Paragraph::new(body).wrap(Wrap { trim: true }).block(block),
            layout.body_area,
        );
    }

    draw_help(f, layout.help_area, keys);

    if session.name_prompt.is_some() {
        draw_name_prompt(f, session);
    }
}

fn intro_text(session: &QuizSession) -> Text<'static> {
    let mut text = Text::default();
    text.push_line(Line::from(format!(
        "{} Fragen zu Ethik und Philosophie. Die Zeit läuft ab dem Start.",
        session.total_question_count()
    )));
    text.push_line(Line::from(session.status_message()));
    text.push_line(Line::from(""));
    if session.player_name.is_empty() {
        text.push_line(muted_line("Bitte gib zuerst deinen Namen ein."));
    } else {
        text.push_line(Line::from(format!("Name: {}", session.player_name)));
    }
    if let Some(error) = &session.error_message {
        text.push_line(Line::from(""));
        text.push_line(error_line(error));
    }

    if let Some(metadata) = &session.metadata
        && !metadata.placeholders.is_empty()
    {
        text.push_line(Line::from(""));
        text.push_line(Line::from("Demnächst:"));
        for placeholder in &metadata.placeholders {
            text.push_line(muted_line(&format!("• {}", placeholder.label)));
        }
    }
    text
}

fn question_text(session: &QuizSession) -> Text<'static> {
    let Some(question) = session.current_question() else {
        return Text::from(muted_line("Keine Fragen verfügbar."));
    };

    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        question.topic.clone(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(question.prompt.clone()));
    if question.multi {
        text.push_line(muted_line("Mehrere Antworten möglich"));
    }
    text.push_line(Line::from(""));

    for (i, choice) in question.choices.iter().enumerate() {
        let selected = session.is_selected(&question.id, &choice.id);
        let mark = match (question.multi, selected) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(•)",
            (false, false) => "( )",
        };
        let mut style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        if i == session.choice_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        text.push_line(Line::from(Span::styled(
            format!("{} {}. {}", mark, i + 1, choice.text),
            style,
        )));
    }

    if let Some(error) = &session.error_message {
        text.push_line(Line::from(""));
        text.push_line(error_line(error));
    }
    text
}

fn confirm_text(session: &QuizSession) -> Text<'static> {
    let mut text = Text::default();
    text.push_line(Line::from(format!(
        "{} von {} Fragen beantwortet.",
        session.answered_count(),
        session.questions.len()
    )));
    text.push_line(Line::from(format!("Zeit: {}", session.timer_display())));
    text.push_line(Line::from(format!("Name: {}", session.player_name)));
    text.push_line(Line::from(""));
    text.push_line(Line::from("Antworten jetzt abschicken?"));
    if let Some(error) = &session.error_message {
        text.push_line(Line::from(""));
        text.push_line(error_line(error));
    }
    text
}

fn draw_submitted(f: &mut Frame, session: &QuizSession, area: ratatui::layout::Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let mut summary = Text::default();
    if let Some(result) = &session.result {
        summary.push_line(Line::from(Span::styled(
            format!("{} richtig", format_score(result)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        summary.push_line(Line::from(format!("Zeit: {}", format_time_ms(result.time_ms))));
        summary.push_line(Line::from(format!("Platz {}", result.rank)));
        summary.push_line(Line::from(""));
        summary.push_line(Line::from("Top 10:"));
        for entry in &session.leaderboard_preview {
            let own = entry.id == result.id;
            let style = if own {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            summary.push_line(Line::from(Span::styled(entry_text(entry), style)));
        }
    }
    f.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title("Ergebnis")),
        columns[0],
    );

    f.render_widget(
        Paragraph::new(review_text(&session.review))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Auswertung")),
        columns[1],
    );
}

fn draw_name_prompt(f: &mut Frame, session: &QuizSession) {
    let Some(prompt) = &session.name_prompt else {
        return;
    };
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);

    let mut text = Text::default();
    text.push_line(Line::from("Unter welchem Namen möchtest du spielen?"));
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        format!("> {}_", prompt.input),
        Style::default().fg(Color::Yellow),
    )));
    if let Some(error) = &prompt.error {
        text.push_line(error_line(error));
    }
    text.push_line(Line::from(""));
    text.push_line(help_line(&[("Enter", "Speichern"), ("Esc", "Abbrechen")]));

    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Name"));
    f.render_widget(popup, area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quiz abbrechen")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Zurück zum Menü? Der aktuelle Versuch geht verloren.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Ja (zum Menü)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" Nein (weiter spielen)  "),
        Span::styled("Ctrl+C", super::key_style()),
        Span::from(" Beenden"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
