use crate::gateway::GatewayHandle;
use crate::models::{AppState, GatewayRequest, GatewayResponse, QuizMetadata, QuizResult};
use crate::review::{ReviewOverlay, advance_overlay};
use crate::store::{self, ADMIN_UNLOCKED_KEY, KeyValueStore};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info, warn};

pub const ADMIN_LOAD_FAILED_MESSAGE: &str = "Daten konnten nicht geladen werden.";
pub const CLEAR_FAILED_MESSAGE: &str = "Löschen fehlgeschlagen.";
pub const DELETE_FAILED_MESSAGE: &str = "Eintrag konnte nicht gelöscht werden.";
pub const PASSWORD_WRONG_MESSAGE: &str = "Passwort ist falsch.";
pub const PASSWORD_EMPTY_MESSAGE: &str = "Bitte Passwort eingeben.";

const UNLOCKED_VALUE: &str = "1";

/// Destructive action waiting for an explicit yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminConfirm {
    Clear,
    Remove { id: String, name: String },
}

/// Leaderboard maintenance behind a client-side password. The password only
/// hides the controls; the backend authorizes the actual deletes.
#[derive(Debug)]
pub struct AdminView {
    pub is_unlocked: bool,
    pub password_input: String,
    pub auth_error: Option<String>,
    pub entries: Vec<QuizResult>,
    pub metadata: Option<QuizMetadata>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub clearing: bool,
    pub removing_id: Option<String>,
    pub confirm: Option<AdminConfirm>,
    pub selected: usize,
    pub review: Option<ReviewOverlay>,
    secret: String,
    gateway: GatewayHandle,
    pending_load: Option<u64>,
    pending_clear: Option<u64>,
    pending_delete: Option<u64>,
}

impl AdminView {
    pub fn new(gateway: GatewayHandle, store: &dyn KeyValueStore, secret: &str) -> Self {
        let is_unlocked =
            store::read_or_none(store, ADMIN_UNLOCKED_KEY).as_deref() == Some(UNLOCKED_VALUE);

        let mut view = Self {
            is_unlocked,
            password_input: String::new(),
            auth_error: None,
            entries: Vec::new(),
            metadata: None,
            is_loading: false,
            error_message: None,
            clearing: false,
            removing_id: None,
            confirm: None,
            selected: 0,
            review: None,
            secret: secret.to_string(),
            gateway,
            pending_load: None,
            pending_clear: None,
            pending_delete: None,
        };
        if view.is_unlocked {
            view.load();
        }
        view
    }

    pub fn unlock(&mut self, store: &dyn KeyValueStore) {
        if self.password_input.trim().is_empty() {
            self.auth_error = Some(PASSWORD_EMPTY_MESSAGE.to_string());
            return;
        }
        if self.password_input != self.secret {
            warn!("admin unlock rejected");
            self.auth_error = Some(PASSWORD_WRONG_MESSAGE.to_string());
            self.password_input.clear();
            return;
        }

        info!("Admin view unlocked");
        self.is_unlocked = true;
        self.password_input.clear();
        self.auth_error = None;
        store::write_or_log(store, ADMIN_UNLOCKED_KEY, UNLOCKED_VALUE);
        self.load();
    }

    pub fn logout(&mut self, store: &dyn KeyValueStore) {
        info!("Admin view locked");
        store::remove_or_log(store, ADMIN_UNLOCKED_KEY);
        self.is_unlocked = false;
        self.entries.clear();
        self.metadata = None;
        self.error_message = None;
        self.confirm = None;
        self.review = None;
        self.selected = 0;
        self.teardown();
    }

    pub fn load(&mut self) {
        if !self.is_unlocked {
            return;
        }
        self.is_loading = true;
        self.error_message = None;
        self.pending_load = Some(
            self.gateway
                .send(|ticket| GatewayRequest::LoadLeaderboard { ticket, limit: None }),
        );
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

    pub fn request_clear(&mut self) {
        if !self.clearing {
            self.confirm = Some(AdminConfirm::Clear);
        }
    }

    pub fn request_remove_selected(&mut self) {
        if self.removing_id.is_some() {
            return;
        }
        if let Some(entry) = self.selected_entry() {
            self.confirm = Some(AdminConfirm::Remove {
                id: entry.id.clone(),
                name: entry.name.clone(),
            });
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    pub fn confirm_pending(&mut self) {
        match self.confirm.take() {
            Some(AdminConfirm::Clear) => self.clear_leaderboard(),
            Some(AdminConfirm::Remove { id, .. }) => self.remove_entry(&id),
            None => {}
        }
    }

    pub fn clear_leaderboard(&mut self) {
        if !self.is_unlocked || self.clearing {
            return;
        }
        info!("Clearing leaderboard");
        self.clearing = true;
        self.error_message = None;
        self.pending_clear = Some(
            self.gateway
                .send(|ticket| GatewayRequest::ClearLeaderboard { ticket }),
        );
    }

    pub fn remove_entry(&mut self, id: &str) {
        if !self.is_unlocked || self.removing_id.is_some() {
            return;
        }
        info!(id, "Removing leaderboard entry");
        self.removing_id = Some(id.to_string());
        self.error_message = None;
        let id = id.to_string();
        self.pending_delete = Some(
            self.gateway
                .send(|ticket| GatewayRequest::DeleteEntry { ticket, id }),
        );
    }

    pub fn handle_response(&mut self, response: GatewayResponse) {
        match response {
            GatewayResponse::Leaderboard { ticket, result } if self.pending_load == Some(ticket) => {
                self.pending_load = None;
                self.is_loading = false;
                match result {
                    Ok(response) => {
                        self.entries = response.entries;
                        self.metadata = Some(response.metadata);
                        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
                    }
                    Err(e) => {
                        warn!(error = %e, "admin failed to load leaderboard");
                        self.error_message = Some(ADMIN_LOAD_FAILED_MESSAGE.to_string());
                    }
                }
            }
            GatewayResponse::EntryDeleted { ticket, id, result }
                if self.pending_delete == Some(ticket) =>
            {
                self.pending_delete = None;
                self.removing_id = None;
                match result {
                    Ok(()) => {
                        info!(id, "Leaderboard entry removed");
                        self.entries.retain(|e| e.id != id);
                        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
                    }
                    Err(e) => {
                        warn!(id, error = %e, "failed to remove leaderboard entry");
                        self.error_message = Some(DELETE_FAILED_MESSAGE.to_string());
                    }
                }
            }
            GatewayResponse::Cleared { ticket, result } if self.pending_clear == Some(ticket) => {
                self.pending_clear = None;
                self.clearing = false;
                match result {
                    Ok(()) => {
                        info!("Leaderboard cleared");
                        self.load();
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to clear leaderboard");
                        self.error_message = Some(CLEAR_FAILED_MESSAGE.to_string());
                    }
                }
            }
            GatewayResponse::Review { ticket, result } => match self.review.as_mut() {
                Some(overlay) if overlay.ticket() == ticket => overlay.apply(result),
                _ => debug!(ticket, "admin ignoring review response"),
            },
            other => debug!(ticket = other.ticket(), "admin ignoring response"),
        }
    }

    pub fn open_review(&mut self, entry_id: &str) {
        self.review = Some(ReviewOverlay::open(&self.gateway, entry_id));
    }

    pub fn close_review(&mut self) {
        self.review = None;
    }

    pub fn teardown(&mut self) {
        self.pending_load = None;
        self.pending_clear = None;
        self.pending_delete = None;
        self.is_loading = false;
        self.clearing = false;
        self.removing_id = None;
    }
}

pub fn handle_admin_input(
    view: &mut AdminView,
    key: KeyEvent,
    app_state: &mut AppState,
    store: &dyn KeyValueStore,
) {
    if !view.is_unlocked {
        match key.code {
            KeyCode::Enter => view.unlock(store),
            KeyCode::Backspace => {
                view.password_input.pop();
            }
            KeyCode::Char(c) => {
                view.password_input.push(c);
                view.auth_error = None;
            }
            KeyCode::Esc => *app_state = AppState::Menu,
            _ => {}
        }
        return;
    }

    if view.confirm.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('j') | KeyCode::Enter => view.confirm_pending(),
            KeyCode::Char('n') | KeyCode::Esc => view.cancel_confirm(),
            _ => {}
        }
        return;
    }

    if view.review.is_some() {
        match key.code {
            KeyCode::Left => {
                if let Some(overlay) = view.review.as_mut() {
                    overlay.pager.prev();
                }
            }
            KeyCode::Right | KeyCode::Enter => advance_overlay(&mut view.review),
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
        KeyCode::Char('d') | KeyCode::Delete => view.request_remove_selected(),
        KeyCode::Char('c') => view.request_clear(),
        KeyCode::Char('r') if !view.is_loading => view.load(),
        KeyCode::Char('o') => view.logout(store),
        KeyCode::Esc | KeyCode::Char('q') => *app_state = AppState::Menu,
        _ => {}
    }
}
