use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::user_trials;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = user_trials)]
#[diesel(primary_key(user_id))]
pub struct TrialEntity {
    pub user_id: Uuid,
    pub trial_start: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_trials)]
pub struct InsertTrialEntity {
    pub user_id: Uuid,
    pub trial_start: DateTime<Utc>,
}
