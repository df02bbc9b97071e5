use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/habits", post(handlers::create_habit))
        .route("/habits/:id", get(handlers::calendar_page))
        .route("/habits/:id/delete", post(handlers::delete_habit))
        .route("/habits/:id/toggle/:date", post(handlers::toggle_day))
        .route("/achievements", get(handlers::achievements_page))
        .route("/achievements/check", post(handlers::check_achievements))
        .route("/api/session", get(handlers::session_snapshot))
        .with_state(state)
}
