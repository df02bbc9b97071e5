use crate::achievements::AchievementsApi;
use crate::api::ApiClient;
use crate::auth::{CredentialGateway, Navigator};
use crate::calendar::CalendarView;
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::gamification::Gamification;
use crate::habits::HabitsApi;
use crate::logs::LogsApi;
use crate::session::SessionStore;
use crate::stats::StatsApi;
use crate::storage::ClientStorage;
use std::sync::Arc;

/// Root of the client layer. Build one at startup and hand out clones; every clone
/// shares the same session store, storage and stats signal.
#[derive(Clone)]
pub struct HabitClient {
    session: Arc<SessionStore>,
    auth: CredentialGateway,
    habits: HabitsApi,
    logs: LogsApi,
    stats: StatsApi,
    achievements: AchievementsApi,
    gamification: Gamification,
}

impl HabitClient {
    pub async fn connect(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ClientError> {
        let storage = match &config.storage_path {
            Some(path) => ClientStorage::open(path.clone()).await,
            None => ClientStorage::in_memory(),
        };
        Self::with_storage(config, storage, navigator)
    }

    pub fn with_storage(
        config: &ClientConfig,
        storage: ClientStorage,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let api = ApiClient::new(config, storage)?;
        let session = Arc::new(SessionStore::new(api.clone()));
        let achievements = AchievementsApi::new(api.clone());

        Ok(Self {
            auth: CredentialGateway::new(Arc::clone(&session), navigator),
            session,
            habits: HabitsApi::new(api.clone()),
            logs: LogsApi::new(api.clone()),
            stats: StatsApi::new(api),
            gamification: Gamification::new(achievements.clone()),
            achievements,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth(&self) -> &CredentialGateway {
        &self.auth
    }

    pub fn habits(&self) -> &HabitsApi {
        &self.habits
    }

    pub fn logs(&self) -> &LogsApi {
        &self.logs
    }

    pub fn stats(&self) -> &StatsApi {
        &self.stats
    }

    pub fn achievements(&self) -> &AchievementsApi {
        &self.achievements
    }

    pub fn gamification(&self) -> &Gamification {
        &self.gamification
    }

    /// A fresh, unloaded calendar view for one habit.
    pub fn calendar(&self, habit_id: i64) -> CalendarView {
        CalendarView::new(habit_id, self.logs.clone(), self.stats.clone())
    }
}
