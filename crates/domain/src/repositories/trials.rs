use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

#[async_trait]
#[automock]
pub trait TrialRepository {
    async fn find_trial_start(&self, user_id: Uuid) -> Result<Option<DateTime<Utc>>>;

    /// Inserts a trial-start row unless one already exists for the user and
    /// returns the persisted timestamp. When two first-ever checks race, the
    /// store's primary key decides the winner and both callers observe the
    /// winning timestamp.
    async fn insert_trial_start_if_absent(
        &self,
        user_id: Uuid,
        trial_start: DateTime<Utc>,
    ) -> Result<DateTime<Utc>>;
}
