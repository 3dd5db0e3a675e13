use crate::error::Result;
use crate::models::CompanionRecord;

/// Where the dashboard gets a learner's data from.
pub trait CompanionSource {
    /// Companions the user has held sessions with, most recent session first.
    fn get_user_sessions(&self, user_id: &str) -> Result<Vec<CompanionRecord>>;

    /// Companions the user has created, newest first.
    fn get_user_companions(&self, user_id: &str) -> Result<Vec<CompanionRecord>>;
}
