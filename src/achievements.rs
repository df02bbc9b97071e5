use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::{
    Achievement, CheckAchievementsOutcome, StreakRecovery, StreakRecoveryRequest, UserAchievement,
    UserStats,
};

#[derive(Debug, Clone)]
pub struct AchievementsApi {
    api: ApiClient,
}

impl AchievementsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn catalog(&self) -> Result<Vec<Achievement>, ClientError> {
        self.api.get("/api/achievements/").await
    }

    pub async fn unlocked(&self) -> Result<Vec<UserAchievement>, ClientError> {
        self.api.get("/api/achievements/user").await
    }

    pub async fn user_stats(&self) -> Result<UserStats, ClientError> {
        self.api.get("/api/achievements/stats").await
    }

    pub async fn check_and_unlock(&self) -> Result<CheckAchievementsOutcome, ClientError> {
        self.api
            .post("/api/achievements/check", &serde_json::json!({}))
            .await
    }

    pub async fn recover_streak(&self, request: &StreakRecoveryRequest) -> Result<StreakRecovery, ClientError> {
        self.api
            .post("/api/achievements/recover-streak", request)
            .await
    }
}

pub fn achievement_icon(icon: &str) -> &'static str {
    match icon {
        "star" => "⭐",
        "fire" => "🔥",
        "trophy" => "🏆",
        "calendar" => "📅",
        "crown" => "👑",
        "medal" => "🏅",
        _ => "🎯",
    }
}

pub fn level_title(level: u32) -> &'static str {
    match level {
        0..=4 => "Beginner",
        5..=9 => "Apprentice",
        10..=19 => "Expert",
        20..=29 => "Master",
        30..=49 => "Legend",
        _ => "Grand Master",
    }
}

const MOTIVATIONAL_PHRASES: [&str; 10] = [
    "Every day is a new opportunity",
    "Consistency is the key to success",
    "Your habits shape your future",
    "Keep going, you are doing great",
    "Discipline beats motivation",
    "Small steps, big results",
    "You are stronger than you think",
    "Progress is progress, no matter how small",
    "Today is the perfect day to improve",
    "Your only limit is you",
];

pub fn motivational_phrase(level: u32) -> &'static str {
    MOTIVATIONAL_PHRASES[level as usize % MOTIVATIONAL_PHRASES.len()]
}
