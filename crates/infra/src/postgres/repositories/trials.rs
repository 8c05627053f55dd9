use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::trials::InsertTrialEntity, repositories::trials::TrialRepository,
    schema::user_trials,
};

pub struct TrialPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TrialPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TrialRepository for TrialPostgres {
    async fn find_trial_start(&self, user_id: Uuid) -> Result<Option<DateTime<Utc>>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let trial_start = user_trials::table
            .filter(user_trials::user_id.eq(user_id))
            .select(user_trials::trial_start)
            .first::<DateTime<Utc>>(&mut conn)
            .optional()?;

        Ok(trial_start)
    }

    async fn insert_trial_start_if_absent(
        &self,
        user_id: Uuid,
        trial_start: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let insert_trial_entity = InsertTrialEntity {
            user_id,
            trial_start,
        };

        // The primary key on user_id arbitrates concurrent first checks: the
        // losing insert is a no-op and the winner's timestamp is re-read.
        insert_into(user_trials::table)
            .values(&insert_trial_entity)
            .on_conflict(user_trials::user_id)
            .do_nothing()
            .execute(&mut conn)?;

        let persisted = user_trials::table
            .filter(user_trials::user_id.eq(user_id))
            .select(user_trials::trial_start)
            .first::<DateTime<Utc>>(&mut conn)?;

        Ok(persisted)
    }
}
