use super::{calculate_list_chunks, draw_help, draw_review_overlay, draw_title, error_line, muted_line};
use crate::leaderboard::LeaderboardView;
use crate::models::{QuizMetadata, QuizResult};
use crate::utils::{format_created_at, format_score, format_time_ms, truncate_string};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

const NAME_WIDTH: usize = 24;

/// `  1. Anna                      8/8   01:00  01.03.2025 10:15`
pub(super) fn entry_text(entry: &QuizResult) -> String {
    format!(
        "{:>3}. {:<width$} {:>5}  {}  {}",
        entry.rank,
        truncate_string(&entry.name, NAME_WIDTH),
        format_score(entry),
        format_time_ms(entry.time_ms),
        format_created_at(&entry.created_at),
        width = NAME_WIDTH,
    )
}

pub(super) fn entry_item(entry: &QuizResult, highlighted: bool, selected: bool) -> ListItem<'static> {
    let mut style = Style::default();
    if highlighted {
        style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
    }
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let marker = if highlighted { "★" } else { " " };
    ListItem::new(format!("{} {}", marker, entry_text(entry))).style(style)
}

pub(super) fn metadata_title(metadata: Option<&QuizMetadata>) -> String {
    match metadata {
        Some(m) => format!("Leaderboard ({} Fragen live)", m.active_total),
        None => "Leaderboard".to_string(),
    }
}

pub fn draw_leaderboard(f: &mut Frame, view: &LeaderboardView) {
    let layout = calculate_list_chunks(f.area());

    draw_title(f, layout.header_area, &metadata_title(view.metadata.as_ref()));

    let block = Block::default().borders(Borders::ALL);
    if view.is_loading && view.entries.is_empty() {
        f.render_widget(
            Paragraph::new(muted_line("Leaderboard wird geladen...")).block(block),
            layout.content_area,
        );
    } else if view.entries.is_empty() {
        let mut lines = Vec::new();
        if let Some(error) = &view.error_message {
            lines.push(error_line(error));
        } else {
            lines.push(muted_line("Noch keine Einträge."));
        }
        f.render_widget(Paragraph::new(lines).block(block), layout.content_area);
    } else {
        let mut items: Vec<ListItem> = Vec::new();
        if let Some(error) = &view.error_message {
            items.push(ListItem::new(error_line(error)));
            items.push(ListItem::new(Line::from("")));
        }
        items.extend(
            view.entries
                .iter()
                .enumerate()
                .map(|(i, e)| entry_item(e, view.is_highlighted(e), i == view.selected)),
        );
        f.render_widget(List::new(items).block(block), layout.content_area);
    }

    draw_help(
        f,
        layout.footer_area,
        &[
            ("↑/↓", "Auswählen"),
            ("Enter", "Auswertung"),
            ("r", "Neu laden"),
            ("Esc", "Menü"),
        ],
    );

    if let Some(overlay) = &view.review {
        draw_review_overlay(f, overlay);
    }
}
