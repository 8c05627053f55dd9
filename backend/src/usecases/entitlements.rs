use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{
    repositories::{subscriptions::SubscriptionRepository, trials::TrialRepository},
    value_objects::entitlements::{EntitlementView, TrialWindow},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// One knob set replaces the three divergent gating variants that grew in the
/// product over time: the standard day-based trial, the accelerated
/// minute-based test trial, and the kill-switch that disables gating outright.
#[derive(Debug, Clone, Copy)]
pub struct GatingConfig {
    pub window: TrialWindow,
    pub disabled: bool,
}

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("invalid user identifier")]
    InvalidInput,
    #[error("entitlement store unavailable")]
    BackingStoreUnavailable(anyhow::Error),
}

impl EntitlementError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            EntitlementError::InvalidInput => StatusCode::BAD_REQUEST,
            // Callers must read this as "unknown, retry", never as "expired";
            // a transient store outage must not lock paying users out.
            EntitlementError::BackingStoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, EntitlementError>;

/// Answers "may this user use gated features right now?".
pub struct EntitlementUseCase<T, S>
where
    T: TrialRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    trial_repo: Arc<T>,
    subscription_repo: Arc<S>,
    gating: GatingConfig,
}

impl<T, S> EntitlementUseCase<T, S>
where
    T: TrialRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(trial_repo: Arc<T>, subscription_repo: Arc<S>, gating: GatingConfig) -> Self {
        Self {
            trial_repo,
            subscription_repo,
            gating,
        }
    }

    /// Returns the user's trial-start timestamp, opening the window on the
    /// first ever check. Idempotent: later calls observe the stored value.
    pub async fn get_or_create_trial_start(&self, user_id: Uuid) -> UseCaseResult<DateTime<Utc>> {
        if user_id.is_nil() {
            let err = EntitlementError::InvalidInput;
            warn!(
                status = err.status_code().as_u16(),
                "entitlements: trial check with nil user id"
            );
            return Err(err);
        }

        let existing = self
            .trial_repo
            .find_trial_start(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "entitlements: trial store read failed"
                );
                EntitlementError::BackingStoreUnavailable(err)
            })?;

        if let Some(trial_start) = existing {
            debug!(%user_id, trial_start = %trial_start, "entitlements: trial window already open");
            return Ok(trial_start);
        }

        let persisted = self
            .trial_repo
            .insert_trial_start_if_absent(user_id, Utc::now())
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "entitlements: trial store insert failed"
                );
                EntitlementError::BackingStoreUnavailable(err)
            })?;

        info!(
            %user_id,
            trial_start = %persisted,
            "entitlements: trial window opened"
        );

        Ok(persisted)
    }

    /// Active subscription wins over any trial state; otherwise the trial
    /// window decides. With gating disabled no store is consulted at all.
    pub async fn current_entitlement(&self, user_id: Uuid) -> UseCaseResult<EntitlementView> {
        if self.gating.disabled {
            debug!(%user_id, "entitlements: gating disabled, granting full access");
            return Ok(EntitlementView::ungated());
        }

        if user_id.is_nil() {
            let err = EntitlementError::InvalidInput;
            warn!(
                status = err.status_code().as_u16(),
                "entitlements: evaluation with nil user id"
            );
            return Err(err);
        }

        let subscription = self
            .subscription_repo
            .find_latest_active_by_user(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "entitlements: subscription lookup failed"
                );
                EntitlementError::BackingStoreUnavailable(err)
            })?;

        if let Some(subscription) = subscription {
            debug!(
                %user_id,
                subscription_id = %subscription.id,
                plan = %subscription.plan,
                "entitlements: active subscription found"
            );
            return Ok(EntitlementView::pro());
        }

        let trial_start = self.get_or_create_trial_start(user_id).await?;
        let status = self.gating.window.remaining(trial_start, Utc::now());

        debug!(
            %user_id,
            left = status.left,
            unit = %self.gating.window.unit,
            expired = status.expired,
            "entitlements: trial window evaluated"
        );

        Ok(EntitlementView::trialing(
            self.gating.window,
            trial_start,
            status,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Duration;
    use domain::{
        entities::subscriptions::SubscriptionEntity,
        repositories::{
            subscriptions::MockSubscriptionRepository, trials::MockTrialRepository,
        },
        value_objects::enums::{
            plans::Plan, subscription_statuses::SubscriptionStatus,
        },
    };
    use mockall::predicate::eq;

    fn standard_gating() -> GatingConfig {
        GatingConfig {
            window: TrialWindow::standard(),
            disabled: false,
        }
    }

    fn accelerated_gating() -> GatingConfig {
        GatingConfig {
            window: TrialWindow::accelerated(),
            disabled: false,
        }
    }

    fn active_subscription(user_id: Uuid) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            plan: Plan::Yearly.to_string(),
            status: SubscriptionStatus::Active.to_string(),
            paypal_order_id: "5O190127TN364715T".to_string(),
            paid_at: now - Duration::hours(1),
            receipt_url: None,
            created_at: now - Duration::hours(1),
        }
    }

    fn usecase(
        trial_repo: MockTrialRepository,
        subscription_repo: MockSubscriptionRepository,
        gating: GatingConfig,
    ) -> EntitlementUseCase<MockTrialRepository, MockSubscriptionRepository> {
        EntitlementUseCase::new(Arc::new(trial_repo), Arc::new(subscription_repo), gating)
    }

    #[tokio::test]
    async fn repeated_trial_checks_return_the_stored_timestamp() {
        let user_id = Uuid::new_v4();
        let stored = Utc::now() - Duration::days(2);

        let mut trial_repo = MockTrialRepository::new();
        trial_repo
            .expect_find_trial_start()
            .with(eq(user_id))
            .times(2)
            .returning(move |_| Box::pin(async move { Ok(Some(stored)) }));
        // No insert expectation: a second write would panic the mock.

        let usecase = usecase(trial_repo, MockSubscriptionRepository::new(), standard_gating());

        let first = usecase.get_or_create_trial_start(user_id).await.unwrap();
        let second = usecase.get_or_create_trial_start(user_id).await.unwrap();

        assert_eq!(first, stored);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn first_check_persists_a_trial_start() {
        let user_id = Uuid::new_v4();

        let mut trial_repo = MockTrialRepository::new();
        trial_repo
            .expect_find_trial_start()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(None) }));
        trial_repo
            .expect_insert_trial_start_if_absent()
            .withf(move |id, _| *id == user_id)
            .returning(|_, trial_start| Box::pin(async move { Ok(trial_start) }));

        let usecase = usecase(trial_repo, MockSubscriptionRepository::new(), standard_gating());

        let trial_start = usecase.get_or_create_trial_start(user_id).await.unwrap();
        assert!(trial_start <= Utc::now());
    }

    #[tokio::test]
    async fn race_loser_adopts_the_winning_timestamp() {
        let user_id = Uuid::new_v4();
        let winner = Utc::now() - Duration::minutes(1);

        let mut trial_repo = MockTrialRepository::new();
        trial_repo
            .expect_find_trial_start()
            .returning(|_| Box::pin(async { Ok(None) }));
        trial_repo
            .expect_insert_trial_start_if_absent()
            .returning(move |_, _| Box::pin(async move { Ok(winner) }));

        let usecase = usecase(trial_repo, MockSubscriptionRepository::new(), standard_gating());

        let trial_start = usecase.get_or_create_trial_start(user_id).await.unwrap();
        assert_eq!(trial_start, winner);
    }

    #[tokio::test]
    async fn store_outage_reads_as_unavailable_not_expired() {
        let user_id = Uuid::new_v4();

        let mut trial_repo = MockTrialRepository::new();
        trial_repo
            .expect_find_trial_start()
            .returning(|_| Box::pin(async { Err(anyhow!("connection refused")) }));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_latest_active_by_user()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = usecase(trial_repo, subscription_repo, standard_gating());

        let err = usecase.current_entitlement(user_id).await.unwrap_err();
        assert!(matches!(err, EntitlementError::BackingStoreUnavailable(_)));
        assert_eq!(err.status_code().as_u16(), 503);
    }

    #[tokio::test]
    async fn nil_user_id_is_rejected_before_any_store_access() {
        let usecase = usecase(
            MockTrialRepository::new(),
            MockSubscriptionRepository::new(),
            standard_gating(),
        );

        let err = usecase.current_entitlement(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, EntitlementError::InvalidInput));
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn active_subscription_wins_regardless_of_trial_state() {
        let user_id = Uuid::new_v4();

        let mut subscription_repo = MockSubscriptionRepository::new();
        let subscription = active_subscription(user_id);
        subscription_repo
            .expect_find_latest_active_by_user()
            .with(eq(user_id))
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
        // The trial repo must never be consulted for a pro user.
        let trial_repo = MockTrialRepository::new();

        let usecase = usecase(trial_repo, subscription_repo, standard_gating());

        let view = usecase.current_entitlement(user_id).await.unwrap();
        assert!(view.is_pro);
        assert!(!view.expired);
        assert_eq!(view.days_left, None);
    }

    #[tokio::test]
    async fn expired_trial_without_subscription_is_expired() {
        let user_id = Uuid::new_v4();
        let trial_start = Utc::now() - Duration::days(5) - Duration::seconds(1);

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_latest_active_by_user()
            .returning(|_| Box::pin(async { Ok(None) }));

        let mut trial_repo = MockTrialRepository::new();
        trial_repo
            .expect_find_trial_start()
            .returning(move |_| Box::pin(async move { Ok(Some(trial_start)) }));

        let usecase = usecase(trial_repo, subscription_repo, standard_gating());

        let view = usecase.current_entitlement(user_id).await.unwrap();
        assert!(!view.is_pro);
        assert_eq!(view.days_left, Some(0));
        assert!(view.expired);
        assert_eq!(view.trial_start, Some(trial_start));
    }

    #[tokio::test]
    async fn fresh_trial_reports_remaining_days() {
        let user_id = Uuid::new_v4();
        let trial_start = Utc::now() - Duration::days(2);

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_latest_active_by_user()
            .returning(|_| Box::pin(async { Ok(None) }));

        let mut trial_repo = MockTrialRepository::new();
        trial_repo
            .expect_find_trial_start()
            .returning(move |_| Box::pin(async move { Ok(Some(trial_start)) }));

        let usecase = usecase(trial_repo, subscription_repo, standard_gating());

        let view = usecase.current_entitlement(user_id).await.unwrap();
        assert!(!view.is_pro);
        assert_eq!(view.days_left, Some(3));
        assert_eq!(view.minutes_left, None);
        assert!(!view.expired);
    }

    #[tokio::test]
    async fn accelerated_config_counts_minutes() {
        let user_id = Uuid::new_v4();

        for (elapsed_minutes, expected_left, expected_expired) in
            [(7i64, 8i64, false), (16, 0, true)]
        {
            let trial_start = Utc::now() - Duration::minutes(elapsed_minutes);

            let mut subscription_repo = MockSubscriptionRepository::new();
            subscription_repo
                .expect_find_latest_active_by_user()
                .returning(|_| Box::pin(async { Ok(None) }));

            let mut trial_repo = MockTrialRepository::new();
            trial_repo
                .expect_find_trial_start()
                .returning(move |_| Box::pin(async move { Ok(Some(trial_start)) }));

            let usecase = usecase(trial_repo, subscription_repo, accelerated_gating());

            let view = usecase.current_entitlement(user_id).await.unwrap();
            assert_eq!(view.minutes_left, Some(expected_left));
            assert_eq!(view.days_left, None);
            assert_eq!(view.expired, expected_expired);
        }
    }

    #[tokio::test]
    async fn clock_skew_grants_the_full_window() {
        let user_id = Uuid::new_v4();
        // Trial start in the future, as written by a machine with a fast clock.
        let trial_start = Utc::now() + Duration::hours(6);

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_latest_active_by_user()
            .returning(|_| Box::pin(async { Ok(None) }));

        let mut trial_repo = MockTrialRepository::new();
        trial_repo
            .expect_find_trial_start()
            .returning(move |_| Box::pin(async move { Ok(Some(trial_start)) }));

        let usecase = usecase(trial_repo, subscription_repo, standard_gating());

        let view = usecase.current_entitlement(user_id).await.unwrap();
        assert_eq!(view.days_left, Some(TrialWindow::DEFAULT_LENGTH_DAYS));
        assert!(!view.expired);
    }

    #[tokio::test]
    async fn disabled_gating_grants_access_without_store_lookups() {
        // Mocks carry no expectations, so any repository call would panic.
        let usecase = usecase(
            MockTrialRepository::new(),
            MockSubscriptionRepository::new(),
            GatingConfig {
                window: TrialWindow::standard(),
                disabled: true,
            },
        );

        // Including a user id the store has never seen.
        let view = usecase.current_entitlement(Uuid::new_v4()).await.unwrap();
        assert!(view.is_pro);
        assert!(!view.expired);

        // The nil check is skipped too: with gating off nothing is evaluated.
        let view = usecase.current_entitlement(Uuid::nil()).await.unwrap();
        assert!(view.is_pro);
    }
}
