use crate::achievements::AchievementsApi;
use crate::models::UserStats;
use crate::signal::{Signal, Subscription};
use tracing::{debug, error};

pub const POINTS_PER_LEVEL: u64 = 100;

pub fn level_for_points(points: u64) -> u32 {
    u32::try_from(points / POINTS_PER_LEVEL).unwrap_or(u32::MAX - 1) + 1
}

pub fn calculate_progress(points: u64) -> f64 {
    (points % POINTS_PER_LEVEL) as f64 / POINTS_PER_LEVEL as f64 * 100.0
}

pub fn points_needed_for_next_level(points: u64) -> u64 {
    POINTS_PER_LEVEL - points % POINTS_PER_LEVEL
}

#[derive(Debug, Clone)]
pub struct Gamification {
    achievements: AchievementsApi,
    stats: Signal<Option<UserStats>>,
}

impl Gamification {
    pub fn new(achievements: AchievementsApi) -> Self {
        Self {
            achievements,
            stats: Signal::new(None),
        }
    }

    /// Fetches and republishes the user's stats. On failure the error is logged and
    /// the previously published stats stay in place.
    pub async fn load_stats(&self) -> Option<UserStats> {
        match self.achievements.user_stats().await {
            Ok(stats) => {
                self.stats.publish(Some(stats.clone()));
                Some(stats)
            }
            Err(err) => {
                error!(error = %err, "failed to load user stats");
                self.stats.get()
            }
        }
    }

    pub fn current_stats(&self) -> Option<UserStats> {
        self.stats.get()
    }

    pub fn subscribe(&self) -> Subscription<Option<UserStats>> {
        self.stats.subscribe()
    }

    /// Bumps the cached points locally until the next [`Self::load_stats`] replaces
    /// them. Does nothing before stats have been loaded.
    pub fn add_points_optimistic(&self, delta: u64) -> Option<UserStats> {
        let updated = self.stats.publish_with(|current| {
            let stats = current.as_ref()?;
            let points = stats.points.saturating_add(delta);
            Some(Some(UserStats {
                points,
                level: level_for_points(points),
                ..stats.clone()
            }))
        });
        let updated = updated.flatten();
        if let Some(stats) = &updated {
            debug!(points = stats.points, level = stats.level, "optimistic points applied");
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_stays_within_level_band() {
        for points in [0u64, 1, 42, 99, 100, 101, 250, 9_999, 1_000_000] {
            let progress = calculate_progress(points);
            assert!((0.0..100.0).contains(&progress), "points={points}");
        }
        assert_eq!(calculate_progress(250), 50.0);
        assert_eq!(calculate_progress(300), 0.0);
    }

    #[test]
    fn points_needed_complements_remainder() {
        for points in 0u64..1_000 {
            let needed = points_needed_for_next_level(points);
            if points % 100 == 0 {
                assert_eq!(needed, 100);
            } else {
                assert_eq!(needed + points % 100, 100);
            }
        }
    }

    #[test]
    fn level_math_handles_largest_totals() {
        assert_eq!(points_needed_for_next_level(u64::MAX), 100 - u64::MAX % 100);
        assert_eq!(points_needed_for_next_level(18_446_744_073_709_551_600), 100);
        assert!((0.0..100.0).contains(&calculate_progress(u64::MAX)));
        assert!(level_for_points(u64::MAX) >= level_for_points(u64::MAX - 100));
    }

    #[test]
    fn level_is_monotonic() {
        let mut previous = level_for_points(0);
        assert_eq!(previous, 1);
        for points in 1u64..2_000 {
            let level = level_for_points(points);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(1_999), 20);
    }

    fn offline_gamification() -> Gamification {
        let api = crate::api::ApiClient::new(
            &crate::config::ClientConfig::default(),
            crate::storage::ClientStorage::in_memory(),
        )
        .unwrap();
        Gamification::new(AchievementsApi::new(api))
    }

    #[test]
    fn optimistic_points_need_loaded_stats() {
        let gamification = offline_gamification();
        assert_eq!(gamification.add_points_optimistic(10), None);
        assert_eq!(gamification.current_stats(), None);
    }

    #[test]
    fn optimistic_points_recompute_level_and_notify() {
        let gamification = offline_gamification();
        gamification.stats.publish(Some(UserStats {
            id: 1,
            username: "alice".into(),
            points: 95,
            level: 1,
            total_achievements: 2,
        }));
        let mut sub = gamification.subscribe();
        assert_eq!(sub.try_next().flatten().map(|s| s.points), Some(95));

        let bumped = gamification.add_points_optimistic(10).unwrap();
        assert_eq!(bumped.points, 105);
        assert_eq!(bumped.level, 2);
        assert_eq!(bumped.total_achievements, 2);
        assert_eq!(sub.try_next().flatten(), Some(bumped));
    }
}
