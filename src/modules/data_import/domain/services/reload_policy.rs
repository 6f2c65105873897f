use std::time::Duration;

use crate::modules::data_import::domain::entities::{ImportJob, ImportResult};
use crate::shared::config::PollConfig;

/// Decides whether front-ends should refresh their views after an import
///
/// Views are refreshed wholesale. Dry runs persist nothing and never refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadPolicy {
    delay: Duration,
    reload_on_updates: bool,
}

impl ReloadPolicy {
    pub fn new(delay: Duration, reload_on_updates: bool) -> Self {
        Self {
            delay,
            reload_on_updates,
        }
    }

    pub fn from_config(config: &PollConfig) -> Self {
        Self::new(config.reload_delay, config.reload_on_updates)
    }

    /// Delay before the refresh, or `None` when no refresh is needed
    pub fn reload_after(&self, job: &ImportJob, result: &ImportResult) -> Option<Duration> {
        if job.dry_run() {
            return None;
        }

        let changed = result.records_created > 0
            || (self.reload_on_updates && result.records_updated > 0);

        changed.then_some(self.delay)
    }
}

impl Default for ReloadPolicy {
    fn default() -> Self {
        Self::from_config(&PollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::data_import::domain::value_objects::{ConflictStrategy, ProgressId};

    fn job(dry_run: bool) -> ImportJob {
        ImportJob::new(
            ProgressId::new("abc").unwrap(),
            dry_run,
            ConflictStrategy::UseTheirs,
        )
    }

    fn result(created: u64, updated: u64) -> ImportResult {
        ImportResult {
            records_created: created,
            records_updated: updated,
            ..Default::default()
        }
    }

    #[test]
    fn test_real_import_with_creations_reloads_after_three_seconds() {
        let policy = ReloadPolicy::default();
        assert_eq!(
            policy.reload_after(&job(false), &result(8, 2)),
            Some(Duration::from_millis(3000))
        );
    }

    #[test]
    fn test_dry_run_never_reloads() {
        let policy = ReloadPolicy::new(Duration::from_millis(3000), true);
        assert_eq!(policy.reload_after(&job(true), &result(8, 2)), None);
    }

    #[test]
    fn test_updates_only_depends_on_setting() {
        assert_eq!(
            ReloadPolicy::default().reload_after(&job(false), &result(0, 5)),
            None
        );
        assert_eq!(
            ReloadPolicy::new(Duration::from_millis(3000), true)
                .reload_after(&job(false), &result(0, 5)),
            Some(Duration::from_millis(3000))
        );
    }

    #[test]
    fn test_nothing_changed_no_reload() {
        assert_eq!(
            ReloadPolicy::default().reload_after(&job(false), &result(0, 0)),
            None
        );
    }
}
