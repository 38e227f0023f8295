use crate::gateway::GatewayHandle;
use crate::models::{AppState, GatewayRequest, GatewayResponse, QuizMetadata, QuizResult};
use crate::review::{ReviewOverlay, advance_overlay};
use crate::store::{self, KeyValueStore, LAST_RESULT_KEY};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info, warn};

pub const LEADERBOARD_LOAD_FAILED_MESSAGE: &str = "Leaderboard konnte nicht geladen werden.";

/// Read-only ranked list. Entries are shown in the order the backend returns.
#[derive(Debug)]
pub struct LeaderboardView {
    pub entries: Vec<QuizResult>,
    pub metadata: Option<QuizMetadata>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub highlight_id: Option<String>,
    pub selected: usize,
    pub review: Option<ReviewOverlay>,
    limit: Option<u32>,
    gateway: GatewayHandle,
    pending_load: Option<u64>,
}

impl LeaderboardView {
    pub fn new(gateway: GatewayHandle, store: &dyn KeyValueStore, limit: Option<u32>) -> Self {
        Self {
            entries: Vec::new(),
            metadata: None,
            is_loading: false,
            error_message: None,
            highlight_id: store::read_or_none(store, LAST_RESULT_KEY),
            selected: 0,
            review: None,
            limit,
            gateway,
            pending_load: None,
        }
    }

    pub fn load(&mut self) {
        self.is_loading = true;
        self.error_message = None;
        let limit = self.limit;
        self.pending_load = Some(
            self.gateway
                .send(|ticket| GatewayRequest::LoadLeaderboard { ticket, limit }),
        );
    }

    pub fn handle_response(&mut self, response: GatewayResponse) {
        match response {
            GatewayResponse::Leaderboard { ticket, result } if self.pending_load == Some(ticket) => {
                self.pending_load = None;
                self.is_loading = false;
                match result {
                    Ok(response) => {
                        info!(count = response.entries.len(), "Leaderboard loaded");
                        self.entries = response.entries;
                        self.metadata = Some(response.metadata);
                        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to load leaderboard");
                        self.error_message = Some(LEADERBOARD_LOAD_FAILED_MESSAGE.to_string());
                    }
                }
            }
            GatewayResponse::Review { ticket, result } => match self.review.as_mut() {
                Some(overlay) if overlay.ticket() == ticket => overlay.apply(result),
                _ => debug!(ticket, "leaderboard ignoring review response"),
            },
            other => debug!(ticket = other.ticket(), "leaderboard ignoring response"),
        }
    }

    pub fn is_highlighted(&self, entry: &QuizResult) -> bool {
        self.highlight_id.as_deref() == Some(entry.id.as_str())
    }

    pub fn selected_entry(&self) -> Option<&QuizResult> {
        self.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_review(&mut self, entry_id: &str) {
        self.review = Some(ReviewOverlay::open(&self.gateway, entry_id));
    }

    pub fn close_review(&mut self) {
        self.review = None;
    }

    pub fn next_review(&mut self) {
        advance_overlay(&mut self.review);
    }

    pub fn prev_review(&mut self) {
        if let Some(overlay) = self.review.as_mut() {
            overlay.pager.prev();
        }
    }

    pub fn teardown(&mut self) {
        self.pending_load = None;
        self.review = None;
    }
}

pub fn handle_leaderboard_input(view: &mut LeaderboardView, key: KeyEvent, app_state: &mut AppState) {
    if view.review.is_some() {
        match key.code {
            KeyCode::Left => view.prev_review(),
            KeyCode::Right | KeyCode::Enter => view.next_review(),
            KeyCode::Esc | KeyCode::Char('q') => view.close_review(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Up => view.select_prev(),
        KeyCode::Down => view.select_next(),
        KeyCode::Enter => {
            if let Some(id) = view.selected_entry().map(|e| e.id.clone()) {
                view.open_review(&id);
            }
        }
        KeyCode::Char('r') if !view.is_loading => view.load(),
        KeyCode::Esc | KeyCode::Char('q') => *app_state = AppState::Menu,
        _ => {}
    }
}
