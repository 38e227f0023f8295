use super::leaderboard::{entry_item, metadata_title};
use super::{
    calculate_list_chunks, centered_rect, draw_help, draw_review_overlay, draw_title, error_line,
    help_line, muted_line,
};
use crate::admin::{AdminConfirm, AdminView};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

pub fn draw_admin(f: &mut Frame, view: &AdminView) {
    let layout = calculate_list_chunks(f.area());

    if !view.is_unlocked {
        draw_title(f, layout.header_area, "Admin");
        let mut text = Text::default();
        text.push_line(Line::from("Passwort:"));
        text.push_line(Line::from(Span::styled(
            format!("> {}_", "*".repeat(view.password_input.chars().count())),
            Style::default().fg(Color::Yellow),
        )));
        if let Some(error) = &view.auth_error {
            text.push_line(Line::from(""));
            text.push_line(error_line(error));
        }
        f.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Anmelden")),
            layout.content_area,
        );
        draw_help(f, layout.footer_area, &[("Enter", "Entsperren"), ("Esc", "Menü")]);
        return;
    }

    draw_title(
        f,
        layout.header_area,
        &format!("Admin · {}", metadata_title(view.metadata.as_ref())),
    );

    let mut items: Vec<ListItem> = Vec::new();
    if let Some(error) = &view.error_message {
        items.push(ListItem::new(error_line(error)));
    }
    if view.clearing {
        items.push(ListItem::new(muted_line("Leaderboard wird geleert...")));
    }
    if view.is_loading {
        items.push(ListItem::new(muted_line("Daten werden geladen...")));
    } else if view.entries.is_empty() {
        items.push(ListItem::new(muted_line("Keine Einträge.")));
    }
    for (i, entry) in view.entries.iter().enumerate() {
        let mut item = entry_item(entry, false, i == view.selected);
        if view.removing_id.as_deref() == Some(entry.id.as_str()) {
            item = item.style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT));
        }
        items.push(item);
    }
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("Einträge")),
        layout.content_area,
    );

    draw_help(
        f,
        layout.footer_area,
        &[
            ("↑/↓", "Auswählen"),
            ("Enter", "Auswertung"),
            ("d", "Löschen"),
            ("c", "Alle löschen"),
            ("r", "Neu laden"),
            ("o", "Abmelden"),
            ("Esc", "Menü"),
        ],
    );

    if let Some(overlay) = &view.review {
        draw_review_overlay(f, overlay);
    }
    if let Some(confirm) = &view.confirm {
        draw_confirm(f, confirm);
    }
}

fn draw_confirm(f: &mut Frame, confirm: &AdminConfirm) {
    let area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, area);

    let question = match confirm {
        AdminConfirm::Clear => "Wirklich alle Einträge löschen?".to_string(),
        AdminConfirm::Remove { name, .. } => format!("Eintrag von {} löschen?", name),
    };
    let text = vec![
        Line::from(Span::styled(
            question,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        help_line(&[("y", "Ja"), ("n", "Nein")]),
    ];
    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Bestätigen"));
    f.render_widget(popup, area);
}
