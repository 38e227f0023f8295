pub mod admin;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod leaderboard;
pub mod logger;
pub mod models;
pub mod review;
pub mod session;
pub mod store;
pub mod timer;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod ui_tests;

// Re-exports for convenience
pub use admin::{AdminView, handle_admin_input};
pub use app::App;
pub use config::Config;
pub use db::SqliteStore;
pub use error::{ConfigError, Error, GatewayError, StoreError};
pub use gateway::{GatewayHandle, HttpGateway, QuizGateway, spawn_gateway_worker};
pub use leaderboard::{LeaderboardView, handle_leaderboard_input};
pub use models::{AppState, GatewayRequest, GatewayResponse, QuizPhase};
pub use review::{PageMove, ReviewOverlay, ReviewPager};
pub use session::{QuizSession, handle_quiz_input};
pub use store::{KeyValueStore, MemoryStore};
pub use timer::{Clock, QuizTimer, SystemClock, Ticker};
pub use ui::{draw_admin, draw_leaderboard, draw_menu, draw_quit_confirmation, draw_quiz};
