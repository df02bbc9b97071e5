//! In-process stand-in for the habit REST API.
#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use habit_client::models::{Habit, HabitLog};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct MockData {
    pub users: Vec<MockUser>,
    pub habits: Vec<(i64, Habit)>,
    pub logs: Vec<HabitLog>,
    pub next_id: i64,
    pub points: u64,
    pub unlocked: Vec<i64>,
    pub me_status: Option<u16>,
    pub stats_status: Option<u16>,
    pub toggle_status: Option<u16>,
    pub habit_status: Option<u16>,
    pub achievements_status: Option<u16>,
    pub me_delay: Option<Duration>,
    pub toggle_delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct MockState {
    data: Mutex<MockData>,
    pub me_calls: AtomicUsize,
    pub toggle_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
}

impl MockState {
    pub fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap()
    }

    pub fn seed_user(&self, username: &str, password: &str) -> i64 {
        let mut data = self.data();
        data.next_id += 1;
        let id = data.next_id;
        data.users.push(MockUser {
            id,
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password: password.to_string(),
        });
        id
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(MockState::default());
    let app = router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/habits/", get(list_habits).post(create_habit))
        .route("/api/habits/:id", get(get_habit).put(update_habit).delete(delete_habit))
        .route("/api/logs/habit/:id", get(list_logs))
        .route("/api/logs/habit/:id/toggle/:date", post(toggle_log))
        .route("/api/logs/:id", put(update_log))
        .route("/api/stats/overall", get(overall_stats))
        .route("/api/stats/habit/:id", get(habit_stats))
        .route("/api/achievements/", get(catalog))
        .route("/api/achievements/user", get(unlocked))
        .route("/api/achievements/stats", get(user_stats))
        .route("/api/achievements/check", post(check))
        .route("/api/achievements/recover-streak", post(recover_streak))
        .with_state(state)
}

fn detail(status: u16, message: &str) -> Response {
    (
        StatusCode::from_u16(status).unwrap(),
        Json(json!({ "detail": message })),
    )
        .into_response()
}

fn identity_json(user: &MockUser) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "username": user.username,
        "is_active": true,
        "created_at": "2024-01-01T00:00:00",
    })
}

fn authed(state: &MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| detail(401, "Not authenticated"))?;
    state
        .data()
        .users
        .iter()
        .find(|user| format!("token-{}", user.username) == token)
        .cloned()
        .ok_or_else(|| detail(401, "Could not validate credentials"))
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    if state.data().users.iter().any(|user| user.username == username) {
        return detail(400, "Username already taken");
    }
    let id = state.seed_user(&username, body["password"].as_str().unwrap_or_default());
    let data = state.data();
    let user = data.users.iter().find(|user| user.id == id).unwrap();
    (StatusCode::CREATED, Json(identity_json(user))).into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let data = state.data();
    let matched = data.users.iter().find(|user| {
        Some(user.username.as_str()) == body["username"].as_str()
            && Some(user.password.as_str()) == body["password"].as_str()
    });
    match matched {
        Some(user) => Json(json!({
            "access_token": format!("token-{}", user.username),
            "token_type": "bearer",
        }))
        .into_response(),
        None => detail(401, "Incorrect username or password"),
    }
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    let delay = state.data().me_delay;
    if let Some(delay) = delay {
        sleep(delay).await;
    }
    if let Some(status) = state.data().me_status {
        return detail(status, "forced failure");
    }
    match authed(&state, &headers) {
        Ok(user) => Json(identity_json(&user)).into_response(),
        Err(response) => response,
    }
}

async fn list_habits(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let user = match authed(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let habits: Vec<Habit> = state
        .data()
        .habits
        .iter()
        .filter(|(owner, _)| *owner == user.id)
        .map(|(_, habit)| habit.clone())
        .collect();
    Json(habits).into_response()
}

async fn create_habit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(mut habit): Json<Habit>,
) -> Response {
    let user = match authed(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let mut data = state.data();
    data.next_id += 1;
    habit.id = Some(data.next_id);
    data.habits.push((user.id, habit.clone()));
    (StatusCode::CREATED, Json(habit)).into_response()
}

async fn get_habit(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    if let Some(status) = state.data().habit_status {
        return detail(status, "forced failure");
    }
    match state.data().habits.iter().find(|(_, habit)| habit.id == Some(id)) {
        Some((_, habit)) => Json(habit.clone()).into_response(),
        None => detail(404, "Habit not found"),
    }
}

async fn update_habit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    let Some((_, habit)) = data.habits.iter_mut().find(|(_, habit)| habit.id == Some(id)) else {
        return detail(404, "Habit not found");
    };
    if let Some(name) = body["name"].as_str() {
        habit.name = name.to_string();
    }
    if let Some(is_active) = body["is_active"].as_bool() {
        habit.is_active = is_active;
    }
    Json(habit.clone()).into_response()
}

async fn delete_habit(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    data.habits.retain(|(_, habit)| habit.id != Some(id));
    data.logs.retain(|log| log.habit_id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_logs(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let mut logs: Vec<HabitLog> = state
        .data()
        .logs
        .iter()
        .filter(|log| log.habit_id == id)
        .cloned()
        .collect();
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    Json(logs).into_response()
}

async fn toggle_log(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path((habit_id, date)): Path<(i64, NaiveDate)>,
) -> Response {
    state.toggle_calls.fetch_add(1, Ordering::SeqCst);
    let delay = state.data().toggle_delay;
    if let Some(delay) = delay {
        sleep(delay).await;
    }
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    if let Some(status) = data.toggle_status {
        return detail(status, "forced failure");
    }
    if let Some(log) = data
        .logs
        .iter_mut()
        .find(|log| log.habit_id == habit_id && log.date == date)
    {
        log.completed = !log.completed;
        return Json(log.clone()).into_response();
    }
    data.next_id += 1;
    let log = HabitLog {
        id: Some(data.next_id),
        habit_id,
        date,
        completed: true,
        notes: None,
        created_at: None,
    };
    data.logs.push(log.clone());
    Json(log).into_response()
}

async fn update_log(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    let Some(log) = data.logs.iter_mut().find(|log| log.id == Some(id)) else {
        return detail(404, "Log not found");
    };
    if let Some(completed) = body["completed"].as_bool() {
        log.completed = completed;
    }
    if let Some(notes) = body["notes"].as_str() {
        log.notes = Some(notes.to_string());
    }
    Json(log.clone()).into_response()
}

async fn overall_stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let data = state.data();
    let completions = data.logs.iter().filter(|log| log.completed).count();
    Json(json!({
        "total_habits": data.habits.len(),
        "active_habits": data.habits.iter().filter(|(_, habit)| habit.is_active).count(),
        "total_completions": completions,
        "average_completion_rate": 0.0,
        "best_streak": 0,
    }))
    .into_response()
}

async fn habit_stats(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let data = state.data();
    let Some((_, habit)) = data.habits.iter().find(|(_, habit)| habit.id == Some(id)) else {
        return detail(404, "Habit not found");
    };
    let completed: Vec<&HabitLog> = data
        .logs
        .iter()
        .filter(|log| log.habit_id == id && log.completed)
        .collect();
    Json(json!({
        "habit_id": id,
        "habit_name": habit.name,
        "total_logs": completed.len(),
        "current_streak": completed.len(),
        "longest_streak": completed.len(),
        "completion_rate": 0.0,
        "last_completed": completed.iter().map(|log| log.date).max(),
    }))
    .into_response()
}

fn catalog_json() -> Value {
    json!([
        {
            "id": 1,
            "name": "First Day",
            "description": "Complete your first habit",
            "achievement_type": "first_day",
            "category": null,
            "points_reward": 10,
            "icon": "star",
            "requirement_value": 1,
            "created_at": "2024-01-01T00:00:00"
        },
        {
            "id": 2,
            "name": "7 Day Streak",
            "description": "Keep a habit going for 7 days",
            "achievement_type": "streak_7",
            "category": null,
            "points_reward": 50,
            "icon": "fire",
            "requirement_value": 7,
            "created_at": "2024-01-01T00:00:00"
        }
    ])
}

async fn catalog(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    if let Some(status) = state.data().achievements_status {
        return detail(status, "forced failure");
    }
    Json(catalog_json()).into_response()
}

async fn unlocked(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    if let Some(status) = state.data().achievements_status {
        return detail(status, "forced failure");
    }
    let catalog = catalog_json();
    let entries: Vec<Value> = state
        .data()
        .unlocked
        .iter()
        .filter_map(|id| {
            let achievement = catalog
                .as_array()?
                .iter()
                .find(|entry| entry["id"].as_i64() == Some(*id))?;
            Some(json!({
                "id": id,
                "achievement": achievement,
                "unlocked_at": "2024-03-01T09:00:00",
                "progress": 100,
            }))
        })
        .collect();
    Json(entries).into_response()
}

async fn user_stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.stats_calls.fetch_add(1, Ordering::SeqCst);
    let user = match authed(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let data = state.data();
    if let Some(status) = data.stats_status {
        return detail(status, "forced failure");
    }
    Json(json!({
        "id": user.id,
        "username": user.username,
        "points": data.points,
        "level": data.points / 100 + 1,
        "total_achievements": data.unlocked.len(),
    }))
    .into_response()
}

async fn check(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    let mut newly_unlocked = Vec::new();
    if data.logs.iter().any(|log| log.completed) && !data.unlocked.contains(&1) {
        data.unlocked.push(1);
        data.points += 10;
        newly_unlocked.push("First Day");
    }
    Json(json!({
        "message": "Achievements checked",
        "newly_unlocked": newly_unlocked,
        "current_points": data.points,
        "current_level": data.points / 100 + 1,
    }))
    .into_response()
}

async fn recover_streak(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    let use_points = body["use_points"].as_bool().unwrap_or(false);
    if use_points && data.points < 50 {
        return detail(400, "Not enough points to recover streak");
    }
    if use_points {
        data.points -= 50;
    }
    data.next_id += 1;
    Json(json!({
        "id": data.next_id,
        "habit_id": body["habit_id"],
        "recovery_date": "2024-03-02",
        "points_spent": if use_points { 50 } else { 0 },
        "mission_completed": body["mission_completed"],
        "created_at": "2024-03-02T10:00:00",
    }))
    .into_response()
}
