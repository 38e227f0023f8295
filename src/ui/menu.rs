use super::{draw_help, draw_title, muted_line};
use crate::app::MENU_ITEMS;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub fn draw_menu(f: &mut Frame, selected_index: usize, player_name: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(MENU_ITEMS.len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_title(f, chunks[0], "Ethik-Quiz");

    let items: Vec<ListItem> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if i == selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if i == selected_index { "> " } else { "  " };
            ListItem::new(format!("{}{}", marker, label)).style(style)
        })
        .collect();

    let menu = List::new(items).block(Block::default().borders(Borders::ALL).title("Menü"));
    f.render_widget(menu, chunks[1]);

    let player = match player_name {
        Some(name) => Line::from(format!("Angemeldet als: {}", name)),
        None => muted_line("Noch kein Name gespeichert"),
    };
    let status = Paragraph::new(player).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);

    draw_help(
        f,
        chunks[3],
        &[("↑/↓", "Navigieren"), ("Enter", "Auswählen"), ("Esc/Ctrl+C", "Beenden")],
    );
}
