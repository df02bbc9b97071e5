pub mod achievements;
pub mod api;
pub mod app;
pub mod auth;
pub mod calendar;
pub mod client;
pub mod config;
pub mod errors;
pub mod gamification;
pub mod habits;
pub mod handlers;
pub mod logs;
pub mod models;
pub mod session;
pub mod signal;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use auth::{CredentialGateway, Navigator, PendingNavigation, Route};
pub use calendar::{CalendarDay, CalendarView, CellState, ToggleOutcome};
pub use client::HabitClient;
pub use config::ClientConfig;
pub use errors::ClientError;
pub use session::SessionStore;
pub use signal::{Signal, Subscription};
pub use state::AppState;
pub use storage::ClientStorage;
