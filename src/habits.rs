use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::{Habit, HabitUpdate};

#[derive(Debug, Clone)]
pub struct HabitsApi {
    api: ApiClient,
}

impl HabitsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Habit>, ClientError> {
        self.api.get("/api/habits/").await
    }

    pub async fn get(&self, id: i64) -> Result<Habit, ClientError> {
        self.api.get(&format!("/api/habits/{id}")).await
    }

    /// Rejects a blank name before sending anything.
    pub async fn create(&self, habit: &Habit) -> Result<Habit, ClientError> {
        if habit.name.trim().is_empty() {
            return Err(ClientError::validation("habit name is required"));
        }
        self.api.post("/api/habits/", habit).await
    }

    pub async fn update(&self, id: i64, update: &HabitUpdate) -> Result<Habit, ClientError> {
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ClientError::validation("habit name is required"));
        }
        self.api.put(&format!("/api/habits/{id}"), update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.api.delete(&format!("/api/habits/{id}")).await
    }
}
