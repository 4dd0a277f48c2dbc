//! SLA policy: per-priority response time limits.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Priority, SlaConfig};

/// Fallback time limit (minutes) when a priority has no policy entry.
pub const DEFAULT_TIME_LIMIT_MINS: i64 = 60;

/// The per-priority time-limit policy edited from the SLA settings view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlaPolicy {
    configs: Vec<SlaConfig>,
}

impl SlaPolicy {
    pub fn new(configs: Vec<SlaConfig>) -> Self {
        Self { configs }
    }

    /// Time limit in minutes for a priority, falling back to 60 when the
    /// policy has no entry for it.
    pub fn time_limit(&self, priority: Priority) -> i64 {
        self.configs
            .iter()
            .find(|c| c.priority == priority)
            .map(|c| c.time_limit)
            .unwrap_or(DEFAULT_TIME_LIMIT_MINS)
    }

    /// Deadline for a ticket of the given priority whose clock starts now.
    pub fn deadline_from(&self, now: DateTime<Utc>, priority: Priority) -> DateTime<Utc> {
        now + Duration::minutes(self.time_limit(priority))
    }

    /// Update the limit for a priority. Adds an entry if none exists.
    pub fn set_limit(&mut self, priority: Priority, minutes: i64) {
        match self.configs.iter_mut().find(|c| c.priority == priority) {
            Some(config) => config.time_limit = minutes,
            None => self.configs.push(SlaConfig {
                priority,
                time_limit: minutes,
            }),
        }
    }

    pub fn configs(&self) -> &[SlaConfig] {
        &self.configs
    }
}

impl Default for SlaPolicy {
    /// Default policy shipped with the demo seed.
    fn default() -> Self {
        Self::new(vec![
            SlaConfig {
                priority: Priority::Urgent,
                time_limit: 1440,
            },
            SlaConfig {
                priority: Priority::High,
                time_limit: 2880,
            },
            SlaConfig {
                priority: Priority::Low,
                time_limit: 4320,
            },
        ])
    }
}
