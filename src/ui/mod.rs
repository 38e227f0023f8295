pub mod layout;
mod admin;
mod leaderboard;
mod menu;
mod quiz;
mod review;

use crate::app::App;
use crate::models::AppState;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub use admin::draw_admin;
pub use layout::{calculate_list_chunks, calculate_quiz_chunks, centered_rect};
pub use leaderboard::draw_leaderboard;
pub use menu::draw_menu;
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use review::draw_review_overlay;

pub fn draw(f: &mut Frame, app: &App) {
    match app.state {
        AppState::Menu => draw_menu(f, app.menu_index, app.stored_player_name().as_deref()),
        AppState::Quiz => {
            if let Some(session) = &app.quiz {
                draw_quiz(f, session);
            }
        }
        AppState::QuizQuitConfirm => draw_quit_confirmation(f),
        AppState::Leaderboard => {
            if let Some(view) = &app.leaderboard {
                draw_leaderboard(f, view);
            }
        }
        AppState::Admin => {
            if let Some(view) = &app.admin {
                draw_admin(f, view);
            }
        }
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// One line of `key label` pairs for the footer.
fn help_line(keys: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, label)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::from("  "));
        }
        spans.push(Span::styled(key.to_string(), key_style()));
        spans.push(Span::from(format!(" {}", label)));
    }
    Line::from(spans)
}

fn draw_help(f: &mut Frame, area: Rect, keys: &[(&str, &str)]) {
    let help = Paragraph::new(help_line(keys))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn draw_title(f: &mut Frame, area: Rect, title: &str) {
    let header = Paragraph::new(title.to_string())
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))
}

fn muted_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}
