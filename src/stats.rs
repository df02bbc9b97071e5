use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::{HabitStats, OverallStats};

#[derive(Debug, Clone)]
pub struct StatsApi {
    api: ApiClient,
}

impl StatsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn overall(&self) -> Result<OverallStats, ClientError> {
        self.api.get("/api/stats/overall").await
    }

    pub async fn habit(&self, habit_id: i64) -> Result<HabitStats, ClientError> {
        self.api.get(&format!("/api/stats/habit/{habit_id}")).await
    }
}
