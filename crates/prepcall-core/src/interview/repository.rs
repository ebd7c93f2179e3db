//! Interview repository trait.
//!
//! Defines the persistence-gateway interface for interview records,
//! decoupling the application's core logic from the specific document
//! store behind it.

use async_trait::async_trait;

use super::model::InterviewRecord;
use crate::error::Result;

/// Default cap for the latest-interviews feed.
pub const DEFAULT_LATEST_LIMIT: usize = 20;

/// An abstract repository for interview persistence.
///
/// Lookup operations distinguish three outcomes so callers can tell an
/// absent record from a failing store:
///
/// - `Ok(Some(record))` / non-empty `Vec`: found
/// - `Ok(None)` / empty `Vec`: no matching record
/// - `Err(_)`: the store could not be reached or rejected the operation
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    /// Appends a new document to the interview collection.
    ///
    /// # Returns
    ///
    /// The id assigned by the store.
    async fn create(&self, interview: &InterviewRecord) -> Result<String>;

    /// Finds one interview by document id.
    async fn find_by_id(&self, id: &str) -> Result<Option<InterviewRecord>>;

    /// All interviews owned by `user_id`, newest first.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<InterviewRecord>>;

    /// The latest finalized interviews not owned by `excluding_user_id`,
    /// newest first, capped at `limit`.
    async fn find_latest(
        &self,
        excluding_user_id: &str,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>>;
}
