use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The authenticated user as returned by `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerCredential {
    pub access_token: String,
    pub token_type: String,
}

impl fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerCredential")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Fitness,
    Productivity,
    Mindfulness,
    Learning,
    Social,
    Creativity,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Health,
        Category::Fitness,
        Category::Productivity,
        Category::Mindfulness,
        Category::Learning,
        Category::Social,
        Category::Creativity,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Fitness => "fitness",
            Category::Productivity => "productivity",
            Category::Mindfulness => "mindfulness",
            Category::Learning => "learning",
            Category::Social => "social",
            Category::Creativity => "creativity",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown category '{value}'"))
    }
}

pub const DEFAULT_HABIT_COLOR: &str = "#10b981";
pub const DEFAULT_GOAL_FREQUENCY: u32 = 7;

/// A habit. `id` and `created_at` stay empty until the server assigns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_goal_frequency")]
    pub goal_frequency: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

impl Habit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            category: Category::default(),
            color: default_color(),
            goal_frequency: DEFAULT_GOAL_FREQUENCY,
            is_active: true,
            created_at: None,
        }
    }
}

fn default_color() -> String {
    DEFAULT_HABIT_COLOR.to_string()
}

fn default_goal_frequency() -> u32 {
    DEFAULT_GOAL_FREQUENCY
}

fn default_true() -> bool {
    true
}

/// Partial habit update; unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HabitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_frequency: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub habit_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLog {
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_habits: u32,
    pub active_habits: u32,
    pub total_completions: u32,
    pub average_completion_rate: f64,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub habit_id: i64,
    pub habit_name: String,
    pub total_logs: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: f64,
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    FirstDay,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_30")]
    Streak30,
    MonthComplete,
    HabitMaster,
    CategoryExpert,
    PointsMilestone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub achievement_type: AchievementType,
    #[serde(default)]
    pub category: Option<Category>,
    pub points_reward: u64,
    pub icon: String,
    pub requirement_value: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievement {
    pub id: i64,
    pub achievement: Achievement,
    pub unlocked_at: String,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub id: i64,
    pub username: String,
    pub points: u64,
    pub level: u32,
    pub total_achievements: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAchievementsOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub newly_unlocked: Vec<String>,
    pub current_points: u64,
    pub current_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRecoveryRequest {
    pub habit_id: i64,
    pub use_points: bool,
    pub mission_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecovery {
    pub id: i64,
    pub habit_id: i64,
    pub recovery_date: NaiveDate,
    pub points_spent: u64,
    pub mission_completed: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}
