use crate::auth::Route;
use crate::calendar::{end_of_week, ToggleOutcome};
use crate::errors::AppError;
use crate::models::{Category, Habit, Identity, UserStats, DEFAULT_GOAL_FREQUENCY};
use crate::state::AppState;
use crate::ui::{
    render_achievements, render_calendar, render_dashboard, render_login, render_register,
    AchievementsPage, CalendarPage, DashboardPage,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct HabitForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub goal_frequency: String,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub identity: Option<Identity>,
    pub stats: Option<UserStats>,
}

/// The signed-in identity, loading it once if only a credential is held.
async fn current_user(state: &AppState) -> Option<Identity> {
    if let Some(identity) = state.client.session().current_identity() {
        return Some(identity);
    }
    if state.client.auth().is_authenticated().await {
        state.client.session().refresh_identity().await
    } else {
        None
    }
}

fn to_login() -> Response {
    Redirect::to(Route::Login.path()).into_response()
}

pub async fn index(State(state): State<AppState>) -> Response {
    let Some(identity) = current_user(&state).await else {
        return to_login();
    };

    let mut message = state.take_flash().await;
    let habits = state.client.habits().list().await;
    let overall = state.client.stats().overall().await;
    let user_stats = state.client.gamification().load_stats().await;

    let snapshot = {
        let mut snapshot = state.dashboard.lock().await;
        match habits {
            Ok(habits) => snapshot.habits = habits,
            Err(err) => {
                warn!(error = %err, "failed to load habits");
                message.get_or_insert_with(|| err.user_message());
            }
        }
        match overall {
            Ok(overall) => snapshot.overall = Some(overall),
            Err(err) => warn!(error = %err, "failed to load overall stats"),
        }
        snapshot.clone()
    };

    Html(render_dashboard(&DashboardPage {
        identity: &identity,
        habits: &snapshot.habits,
        overall: snapshot.overall.as_ref(),
        user_stats: user_stats.as_ref(),
        message: message.as_deref(),
    }))
    .into_response()
}

pub async fn login_page(State(state): State<AppState>) -> Response {
    if current_user(&state).await.is_some() {
        return Redirect::to(Route::Dashboard.path()).into_response();
    }
    Html(render_login(None, state.take_flash().await.as_deref())).into_response()
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.client.auth().login(&form.username, &form.password).await {
        Ok(Some(_)) => Redirect::to(Route::Dashboard.path()).into_response(),
        Ok(None) => (
            StatusCode::BAD_GATEWAY,
            Html(render_login(Some("Logged in, but your account could not be loaded. Please try again."), None)),
        )
            .into_response(),
        Err(err) => {
            let status = AppError::from(err.clone()).status;
            (status, Html(render_login(Some(&err.user_message()), None))).into_response()
        }
    }
}

pub async fn register_page() -> Html<String> {
    Html(render_register(None))
}

pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    match state
        .client
        .auth()
        .register(&form.email, &form.username, &form.password)
        .await
    {
        Ok(identity) => {
            state
                .set_flash(format!("Account {} created. Log in to continue.", identity.username))
                .await;
            to_login()
        }
        Err(err) => {
            let status = AppError::from(err.clone()).status;
            (status, Html(render_register(Some(&err.user_message())))).into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.client.auth().logout().await;
    state.reset_views().await;
    let route = state.navigation.take().unwrap_or(Route::Login);
    Redirect::to(route.path())
}

pub async fn create_habit(State(state): State<AppState>, Form(form): Form<HabitForm>) -> Response {
    if current_user(&state).await.is_none() {
        return to_login();
    }

    let habit = habit_from_form(form);
    if let Err(err) = state.client.habits().create(&habit).await {
        state.set_flash(err.user_message()).await;
    }
    Redirect::to(Route::Dashboard.path()).into_response()
}

fn habit_from_form(form: HabitForm) -> Habit {
    let mut habit = Habit::new(form.name.trim());
    let description = form.description.trim();
    if !description.is_empty() {
        habit.description = Some(description.to_string());
    }
    habit.category = form.category.parse::<Category>().unwrap_or_default();
    let color = form.color.trim();
    if !color.is_empty() {
        habit.color = color.to_string();
    }
    habit.goal_frequency = form
        .goal_frequency
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|value| (1..=7).contains(value))
        .unwrap_or(DEFAULT_GOAL_FREQUENCY);
    habit
}

pub async fn delete_habit(State(state): State<AppState>, Path(habit_id): Path<i64>) -> Response {
    if current_user(&state).await.is_none() {
        return to_login();
    }

    match state.client.habits().delete(habit_id).await {
        Ok(()) => state.close_calendar(habit_id).await,
        Err(err) => state.set_flash(err.user_message()).await,
    }
    Redirect::to(Route::Dashboard.path()).into_response()
}

pub async fn calendar_page(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
) -> Result<Response, AppError> {
    if current_user(&state).await.is_none() {
        return Ok(to_login());
    }

    let view = state.calendar(habit_id).await;
    let mut message = state.take_flash().await;
    let habit = match state.client.habits().get(habit_id).await {
        Ok(habit) => {
            view.set_habit(habit.clone()).await;
            habit
        }
        Err(err) if err.is_transient() && err.status() != Some(404) => match view.habit().await {
            Some(habit) => {
                warn!(habit_id, error = %err, "failed to reload habit, showing last copy");
                message.get_or_insert_with(|| err.user_message());
                habit
            }
            None => return Err(err.into()),
        },
        Err(err) => {
            if err.status() == Some(404) {
                state.close_calendar(habit_id).await;
            }
            return Err(err.into());
        }
    };

    let today = Local::now().date_naive();
    if let Err(err) = view.load_window(end_of_week(today), today).await {
        message.get_or_insert_with(|| err.user_message());
    }

    let days = view.days().await;
    let habit_stats = view.habit_stats().await;
    Ok(Html(render_calendar(&CalendarPage {
        habit: &habit,
        days: &days,
        habit_stats: habit_stats.as_ref(),
        message: message.as_deref(),
    }))
    .into_response())
}

pub async fn toggle_day(
    State(state): State<AppState>,
    Path((habit_id, date)): Path<(i64, NaiveDate)>,
) -> Response {
    if current_user(&state).await.is_none() {
        return to_login();
    }

    let view = state.calendar(habit_id).await;
    if view.days().await.is_empty() {
        let today = Local::now().date_naive();
        if let Err(err) = view.load_window(end_of_week(today), today).await {
            state.set_flash(err.user_message()).await;
            return Redirect::to(&format!("/habits/{habit_id}")).into_response();
        }
    }

    let notice = match view.toggle(date).await {
        Ok(ToggleOutcome::Updated(_)) | Ok(ToggleOutcome::Detached) => None,
        Ok(ToggleOutcome::FutureDay) => Some("Future days cannot be marked yet.".to_string()),
        Ok(ToggleOutcome::InFlight) => Some("Still saving your previous change for that day.".to_string()),
        Ok(ToggleOutcome::OutsideWindow) => Some(format!("{date} is not on this calendar.")),
        Err(err) => Some(format!("Could not update {date}: {}", err.user_message())),
    };
    if let Some(notice) = notice {
        state.set_flash(notice).await;
    }
    Redirect::to(&format!("/habits/{habit_id}")).into_response()
}

pub async fn achievements_page(State(state): State<AppState>) -> Response {
    let Some(identity) = current_user(&state).await else {
        return to_login();
    };

    let mut message = state.take_flash().await;
    let catalog = state.client.achievements().catalog().await;
    let unlocked = state.client.achievements().unlocked().await;
    let snapshot = {
        let mut snapshot = state.achievements.lock().await;
        match catalog {
            Ok(catalog) => snapshot.catalog = catalog,
            Err(err) => {
                warn!(error = %err, "failed to load achievement catalog");
                message.get_or_insert_with(|| err.user_message());
            }
        }
        match unlocked {
            Ok(unlocked) => snapshot.unlocked = unlocked,
            Err(err) => {
                warn!(error = %err, "failed to load unlocked achievements");
                message.get_or_insert_with(|| err.user_message());
            }
        }
        snapshot.clone()
    };
    let stats = state.client.gamification().load_stats().await;

    Html(render_achievements(&AchievementsPage {
        identity: &identity,
        catalog: &snapshot.catalog,
        unlocked: &snapshot.unlocked,
        stats: stats.as_ref(),
        message: message.as_deref(),
    }))
    .into_response()
}

pub async fn check_achievements(State(state): State<AppState>) -> Response {
    if current_user(&state).await.is_none() {
        return to_login();
    }

    let notice = match state.client.achievements().check_and_unlock().await {
        Ok(outcome) if outcome.newly_unlocked.is_empty() => "No new achievements yet.".to_string(),
        Ok(outcome) => format!("Unlocked: {}", outcome.newly_unlocked.join(", ")),
        Err(err) => err.user_message(),
    };
    state.client.gamification().load_stats().await;
    state.set_flash(notice).await;
    Redirect::to("/achievements").into_response()
}

pub async fn session_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(SessionSnapshot {
        authenticated: state.client.auth().is_authenticated().await,
        identity: state.client.session().current_identity(),
        stats: state.client.gamification().current_stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_form_falls_back_to_defaults() {
        let habit = habit_from_form(HabitForm {
            name: "  Stretch ".into(),
            description: " ".into(),
            category: "fitness".into(),
            color: String::new(),
            goal_frequency: "12".into(),
        });
        assert_eq!(habit.name, "Stretch");
        assert_eq!(habit.description, None);
        assert_eq!(habit.category, Category::Fitness);
        assert_eq!(habit.color, crate::models::DEFAULT_HABIT_COLOR);
        assert_eq!(habit.goal_frequency, DEFAULT_GOAL_FREQUENCY);
    }

    #[test]
    fn habit_form_keeps_valid_values() {
        let habit = habit_from_form(HabitForm {
            name: "Journal".into(),
            description: "Five minutes".into(),
            category: "unknown".into(),
            color: "#ff6b4a".into(),
            goal_frequency: "3".into(),
        });
        assert_eq!(habit.description.as_deref(), Some("Five minutes"));
        assert_eq!(habit.category, Category::Other);
        assert_eq!(habit.color, "#ff6b4a");
        assert_eq!(habit.goal_frequency, 3);
    }
}
