use async_trait::async_trait;
use dashmap::DashMap;

use crate::domains::intake::models::{ApplicantId, Session};
use crate::kernel::BaseSessionStore;

/// In-memory session store
///
/// Lives as long as the process; everything is lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<ApplicantId, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of applicants with a stored session (idle ones included)
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl BaseSessionStore for MemorySessionStore {
    async fn get(&self, applicant: ApplicantId) -> Session {
        self.sessions
            .get(&applicant)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    async fn put(&self, applicant: ApplicantId, session: Session) {
        self.sessions.insert(applicant, session);
    }

    async fn clear(&self, applicant: ApplicantId) {
        // get_mut keeps the language; a missing entry has nothing to keep
        if let Some(mut session) = self.sessions.get_mut(&applicant) {
            session.clear();
        }
    }
}
