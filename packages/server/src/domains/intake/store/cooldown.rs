use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::domains::intake::models::ApplicantId;
use crate::kernel::BaseCooldownTracker;

pub const DEFAULT_COOLDOWN_HOURS: u32 = 12;

/// In-memory last-submission map
///
/// Records are never deleted; an old record simply stops blocking once the
/// window has passed.
pub struct MemoryCooldownTracker {
    window: Duration,
    last_submitted: DashMap<ApplicantId, DateTime<Utc>>,
}

impl MemoryCooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_submitted: DashMap::new(),
        }
    }

    pub fn with_hours(hours: u32) -> Self {
        Self::new(Duration::hours(i64::from(hours)))
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for MemoryCooldownTracker {
    fn default() -> Self {
        Self::with_hours(DEFAULT_COOLDOWN_HOURS)
    }
}

#[async_trait]
impl BaseCooldownTracker for MemoryCooldownTracker {
    async fn can_submit(&self, applicant: ApplicantId, now: DateTime<Utc>) -> bool {
        match self.last_submitted.get(&applicant) {
            Some(last) => now.signed_duration_since(*last) >= self.window,
            None => true,
        }
    }

    async fn record_submission(&self, applicant: ApplicantId, now: DateTime<Utc>) {
        self.last_submitted.insert(applicant, now);
    }
}
