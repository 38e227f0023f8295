use crate::admin::{AdminView, handle_admin_input};
use crate::config::Config;
use crate::gateway::GatewayHandle;
use crate::leaderboard::{LeaderboardView, handle_leaderboard_input};
use crate::models::{AppState, GatewayResponse};
use crate::session::{QuizSession, handle_quiz_input};
use crate::store::{self, KeyValueStore, PLAYER_NAME_KEY};
use crate::timer::{Clock, TICK_INTERVAL, Tick, Ticker};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub const MENU_ITEMS: [&str; 4] = ["Quiz starten", "Leaderboard", "Admin", "Beenden"];

/// Top-level screen state. Each screen owns its view; leaving a screen tears
/// its view down so late responses and timers die with it.
pub struct App {
    pub state: AppState,
    pub menu_index: usize,
    pub quiz: Option<QuizSession>,
    pub leaderboard: Option<LeaderboardView>,
    pub admin: Option<AdminView>,
    store: Box<dyn KeyValueStore>,
    gateway: GatewayHandle,
    clock: Arc<dyn Clock>,
    ticker: Ticker,
    admin_password: String,
    leaderboard_limit: Option<u32>,
}

impl App {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        gateway: GatewayHandle,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            state: AppState::Menu,
            menu_index: 0,
            quiz: None,
            leaderboard: None,
            admin: None,
            store,
            gateway,
            clock,
            ticker: Ticker::new(),
            admin_password: config.admin_password.clone(),
            leaderboard_limit: config.leaderboard_limit,
        }
    }

    pub fn stored_player_name(&self) -> Option<String> {
        store::read_or_none(self.store.as_ref(), PLAYER_NAME_KEY).filter(|n| !n.trim().is_empty())
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        let previous = self.state;
        let store = self.store.as_ref();
        match self.state {
            AppState::Menu => return self.handle_menu_key(key),
            AppState::Quiz => {
                if let Some(session) = self.quiz.as_mut() {
                    handle_quiz_input(session, key, &mut self.state, store);
                }
            }
            AppState::QuizQuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('j') => self.state = AppState::Menu,
                KeyCode::Char('n') | KeyCode::Esc => self.state = AppState::Quiz,
                _ => {}
            },
            AppState::Leaderboard => {
                if let Some(view) = self.leaderboard.as_mut() {
                    handle_leaderboard_input(view, key, &mut self.state);
                }
            }
            AppState::Admin => {
                if let Some(view) = self.admin.as_mut() {
                    handle_admin_input(view, key, &mut self.state, store);
                }
            }
        }

        if self.state != previous {
            self.on_state_change(previous);
        }
        false
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => self.menu_index = self.menu_index.saturating_sub(1),
            KeyCode::Down => self.menu_index = (self.menu_index + 1).min(MENU_ITEMS.len() - 1),
            KeyCode::Enter => match self.menu_index {
                0 => self.open_quiz(),
                1 => self.open_leaderboard(),
                2 => self.open_admin(),
                _ => return true,
            },
            KeyCode::Esc | KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    pub fn open_quiz(&mut self) {
        let mut session =
            QuizSession::new(self.gateway.clone(), Arc::clone(&self.clock), self.store.as_ref());
        session.load_questions();
        self.quiz = Some(session);
        self.state = AppState::Quiz;
        info!("Opened quiz");
    }

    pub fn open_leaderboard(&mut self) {
        let mut view =
            LeaderboardView::new(self.gateway.clone(), self.store.as_ref(), self.leaderboard_limit);
        view.load();
        self.leaderboard = Some(view);
        self.state = AppState::Leaderboard;
        info!("Opened leaderboard");
    }

    pub fn open_admin(&mut self) {
        self.admin = Some(AdminView::new(
            self.gateway.clone(),
            self.store.as_ref(),
            &self.admin_password,
        ));
        self.state = AppState::Admin;
        info!("Opened admin view");
    }

    fn on_state_change(&mut self, previous: AppState) {
        debug!(?previous, current = ?self.state, "screen changed");
        let in_quiz = matches!(self.state, AppState::Quiz | AppState::QuizQuitConfirm);
        if !in_quiz && let Some(mut session) = self.quiz.take() {
            session.teardown();
            self.ticker.stop();
        }
        if self.state != AppState::Leaderboard && let Some(mut view) = self.leaderboard.take() {
            view.teardown();
        }
        if self.state != AppState::Admin && let Some(mut view) = self.admin.take() {
            view.teardown();
        }

        if self.state == AppState::Leaderboard && self.leaderboard.is_none() {
            self.open_leaderboard();
        }
    }

    pub fn handle_response(&mut self, response: GatewayResponse) {
        let ticket = response.ticket();
        let store = self.store.as_ref();
        match response {
            GatewayResponse::Questions { .. } | GatewayResponse::Submitted { .. } => {
                match self.quiz.as_mut() {
                    Some(session) => session.handle_response(response, store),
                    None => debug!(ticket, "no quiz session for response"),
                }
            }
            GatewayResponse::EntryDeleted { .. } | GatewayResponse::Cleared { .. } => {
                match self.admin.as_mut() {
                    Some(view) => view.handle_response(response),
                    None => debug!(ticket, "no admin view for response"),
                }
            }
            GatewayResponse::Leaderboard { .. } | GatewayResponse::Review { .. } => {
                if let Some(view) = self.leaderboard.as_mut() {
                    view.handle_response(response);
                } else if let Some(view) = self.admin.as_mut() {
                    view.handle_response(response);
                } else {
                    debug!(ticket, "no view for response");
                }
            }
        }
    }

    pub fn tick(&mut self) {
        if let Some(session) = self.quiz.as_mut() {
            session.timer.tick();
        }
    }

    /// Keep the ticker alive exactly while the quiz timer runs.
    pub fn sync_ticker(&mut self, tx: &UnboundedSender<Tick>) {
        let timer_running = self.quiz.as_ref().is_some_and(|q| q.timer.is_running());
        if timer_running && !self.ticker.is_running() {
            self.ticker.start(TICK_INTERVAL, tx.clone());
        } else if !timer_running && self.ticker.is_running() {
            self.ticker.stop();
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(session) = self.quiz.as_mut() {
            session.teardown();
        }
        self.ticker.stop();
    }
}
