//! In-memory InterviewRepository for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use prepcall_core::Result;
use prepcall_core::interview::{InterviewRecord, InterviewRepository};

/// HashMap-backed repository with the same filtering and ordering
/// semantics as the Firestore implementation.
#[derive(Default)]
pub struct MemoryInterviewRepository {
    interviews: Mutex<HashMap<String, InterviewRecord>>,
}

impl MemoryInterviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InterviewRepository for MemoryInterviewRepository {
    async fn create(&self, interview: &InterviewRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut stored = interview.clone();
        stored.id = Some(id.clone());
        self.interviews.lock().unwrap().insert(id.clone(), stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InterviewRecord>> {
        Ok(self.interviews.lock().unwrap().get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<InterviewRecord>> {
        let interviews = self.interviews.lock().unwrap();
        let mut matching: Vec<_> = interviews
            .values()
            .filter(|interview| interview.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn find_latest(
        &self,
        excluding_user_id: &str,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>> {
        let interviews = self.interviews.lock().unwrap();
        let mut matching: Vec<_> = interviews
            .values()
            .filter(|interview| interview.finalized && interview.user_id != excluding_user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }
}
