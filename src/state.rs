use crate::auth::PendingNavigation;
use crate::calendar::CalendarView;
use crate::client::HabitClient;
use crate::models::{Achievement, Habit, OverallStats, UserAchievement};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

/// Last dashboard data that loaded successfully, shown again when a reload fails.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub habits: Vec<Habit>,
    pub overall: Option<OverallStats>,
}

#[derive(Debug, Clone, Default)]
pub struct AchievementsSnapshot {
    pub catalog: Vec<Achievement>,
    pub unlocked: Vec<UserAchievement>,
}

#[derive(Clone)]
pub struct AppState {
    pub client: HabitClient,
    pub navigation: Arc<PendingNavigation>,
    pub calendars: Arc<Mutex<HashMap<i64, Arc<CalendarView>>>>,
    pub dashboard: Arc<Mutex<DashboardSnapshot>>,
    pub achievements: Arc<Mutex<AchievementsSnapshot>>,
    pub flash: Arc<Mutex<Option<String>>>,
}

impl AppState {
    pub fn new(client: HabitClient, navigation: Arc<PendingNavigation>) -> Self {
        Self {
            client,
            navigation,
            calendars: Arc::new(Mutex::new(HashMap::new())),
            dashboard: Arc::new(Mutex::new(DashboardSnapshot::default())),
            achievements: Arc::new(Mutex::new(AchievementsSnapshot::default())),
            flash: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn calendar(&self, habit_id: i64) -> Arc<CalendarView> {
        let mut calendars = self.calendars.lock().await;
        Arc::clone(
            calendars
                .entry(habit_id)
                .or_insert_with(|| Arc::new(self.client.calendar(habit_id))),
        )
    }

    pub async fn close_calendar(&self, habit_id: i64) {
        self.calendars.lock().await.remove(&habit_id);
    }

    /// Drops every view-local copy, e.g. after logout.
    pub async fn reset_views(&self) {
        self.calendars.lock().await.clear();
        *self.dashboard.lock().await = DashboardSnapshot::default();
        *self.achievements.lock().await = AchievementsSnapshot::default();
        *self.flash.lock().await = None;
    }

    pub async fn set_flash(&self, message: impl Into<String>) {
        *self.flash.lock().await = Some(message.into());
    }

    pub async fn take_flash(&self) -> Option<String> {
        self.flash.lock().await.take()
    }
}
