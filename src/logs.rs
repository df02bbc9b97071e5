use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::{HabitLog, LogUpdate, NewLog};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct LogsApi {
    api: ApiClient,
}

impl LogsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Logs of one habit dated within the last `days` days, newest first.
    pub async fn list_for_habit(&self, habit_id: i64, days: usize) -> Result<Vec<HabitLog>, ClientError> {
        self.api
            .get_with_query(
                &format!("/api/logs/habit/{habit_id}"),
                &[("days", days.to_string())],
            )
            .await
    }

    pub async fn create(&self, habit_id: i64, log: &NewLog) -> Result<HabitLog, ClientError> {
        self.api.post(&format!("/api/logs/habit/{habit_id}"), log).await
    }

    pub async fn update(&self, log_id: i64, update: &LogUpdate) -> Result<HabitLog, ClientError> {
        self.api.put(&format!("/api/logs/{log_id}"), update).await
    }

    pub async fn update_notes(&self, log_id: i64, notes: impl Into<String>) -> Result<HabitLog, ClientError> {
        let update = LogUpdate {
            completed: None,
            notes: Some(notes.into()),
        };
        self.update(log_id, &update).await
    }

    pub async fn delete(&self, log_id: i64) -> Result<(), ClientError> {
        self.api.delete(&format!("/api/logs/{log_id}")).await
    }

    /// Asks the server to create or flip the log for `date`.
    ///
    /// The returned record is authoritative. Two toggles on the same date are whatever
    /// the server makes of them; nothing here assumes they cancel out.
    pub async fn toggle(&self, habit_id: i64, date: NaiveDate) -> Result<HabitLog, ClientError> {
        self.api
            .post_empty(&format!(
                "/api/logs/habit/{habit_id}/toggle/{}",
                date.format("%Y-%m-%d")
            ))
            .await
    }
}
