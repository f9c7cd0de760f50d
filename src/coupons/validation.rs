//! Coupon Validity Gate

use jiff::Timestamp;
use thiserror::Error;
use tracing::{Span, debug};

use crate::coupons::{
    Coupon, CouponStatus, normalize_code,
    store::{CouponStore, CouponStoreError},
};

/// Reasons a coupon code can't be used.
#[derive(Debug, Error)]
pub enum CouponError {
    /// No coupon matches the code.
    #[error("coupon not found")]
    NotFound,

    /// The coupon exists but its status disallows use.
    #[error("coupon is not active")]
    Inactive,

    /// The validity window hasn't opened yet.
    #[error("coupon is not valid before {0}")]
    NotYetStarted(Timestamp),

    /// The validity window has closed.
    #[error("coupon expired at {0}")]
    Expired(Timestamp),

    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] CouponStoreError),
}

/// Validate a coupon code against the current time.
///
/// # Errors
///
/// See [`validate_coupon_at`].
pub fn validate_coupon<S>(store: &S, code: &str) -> Result<Coupon<'static>, CouponError>
where
    S: CouponStore + ?Sized,
{
    validate_coupon_at(store, code, Timestamp::now())
}

/// Validate a coupon code as of `now`.
///
/// The code is trimmed and upper-cased before lookup. On success the coupon is
/// returned with its full rule list.
///
/// # Errors
///
/// - [`CouponError::NotFound`]: no coupon is stored under the code.
/// - [`CouponError::Inactive`]: the coupon's status is not active.
/// - [`CouponError::NotYetStarted`]: `now` is before the coupon's start.
/// - [`CouponError::Expired`]: `now` is after the coupon's end.
/// - [`CouponError::Store`]: the store could not be read.
#[tracing::instrument(
    name = "coupons.validate",
    skip(store, code),
    fields(code = tracing::field::Empty, now = %now),
    err(level = "debug")
)]
pub fn validate_coupon_at<S>(
    store: &S,
    code: &str,
    now: Timestamp,
) -> Result<Coupon<'static>, CouponError>
where
    S: CouponStore + ?Sized,
{
    let code = normalize_code(code);

    Span::current().record("code", tracing::field::display(&code));

    let coupon = store.find_by_code(&code)?.ok_or(CouponError::NotFound)?;

    if coupon.status() != CouponStatus::Active {
        return Err(CouponError::Inactive);
    }

    if let Some(starts_at) = coupon.starts_at().filter(|starts_at| *starts_at > now) {
        return Err(CouponError::NotYetStarted(starts_at));
    }

    if let Some(ends_at) = coupon.ends_at().filter(|ends_at| *ends_at < now) {
        return Err(CouponError::Expired(ends_at));
    }

    debug!(rules = coupon.rules().len(), "coupon is valid");

    Ok(coupon)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use decimal_percentage::Percentage;
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use crate::{
        coupons::{CouponRule, store::MockCouponStore},
        discounts::DiscountKind,
    };

    use super::*;

    fn percent_coupon() -> Coupon<'static> {
        Coupon::new("SAVE10", DiscountKind::Percent(Percentage::from(0.1)))
            .with_rule(CouponRule::cart_total())
    }

    fn store_with(coupon: Coupon<'static>) -> MockCouponStore {
        let mut store = MockCouponStore::new();

        store
            .expect_find_by_code()
            .withf(|code| code == "SAVE10")
            .returning(move |_| Ok(Some(coupon.clone())));

        store
    }

    fn now() -> TestResult<Timestamp> {
        Ok("2026-10-18T12:00:00Z".parse()?)
    }

    /// Records the level of every event it sees.
    #[derive(Debug, Clone, Default)]
    struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for LevelRecorder {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if let Ok(mut levels) = self.0.lock() {
                levels.push(*event.metadata().level());
            }
        }
    }

    #[test]
    fn lookup_uses_normalized_code() -> TestResult {
        let store = store_with(percent_coupon());

        let coupon = validate_coupon_at(&store, "  save10 ", now()?)?;

        assert_eq!(coupon.code(), "SAVE10");
        assert_eq!(coupon.rules().len(), 1);

        Ok(())
    }

    #[test]
    fn missing_coupon_is_not_found() -> TestResult {
        let mut store = MockCouponStore::new();
        store.expect_find_by_code().returning(|_| Ok(None));

        let result = validate_coupon_at(&store, "NOPE", now()?);

        assert!(matches!(result, Err(CouponError::NotFound)));

        Ok(())
    }

    #[test]
    fn rejected_codes_are_not_logged_as_errors() -> TestResult {
        let mut store = MockCouponStore::new();
        store.expect_find_by_code().returning(|_| Ok(None));

        let now = now()?;
        let recorder = LevelRecorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());

        let result = tracing::subscriber::with_default(subscriber, || {
            validate_coupon_at(&store, "NOPE", now)
        });

        let levels = recorder.0.lock().map_err(|err| err.to_string())?.clone();

        assert!(matches!(result, Err(CouponError::NotFound)));
        assert!(levels.contains(&Level::DEBUG), "rejection should be recorded");
        assert!(!levels.contains(&Level::ERROR), "rejection logged at error level");

        Ok(())
    }

    #[test]
    fn inactive_and_archived_coupons_are_rejected() -> TestResult {
        for status in [CouponStatus::Inactive, CouponStatus::Archived] {
            let store = store_with(percent_coupon().with_status(status));

            let result = validate_coupon_at(&store, "SAVE10", now()?);

            assert!(
                matches!(result, Err(CouponError::Inactive)),
                "expected {status:?} coupon to be rejected"
            );
        }

        Ok(())
    }

    #[test]
    fn future_start_is_not_yet_started() -> TestResult {
        let starts_at = now()?.checked_add(SignedDuration::from_hours(1))?;
        let store = store_with(percent_coupon().with_window(Some(starts_at), None));

        let result = validate_coupon_at(&store, "SAVE10", now()?);

        assert!(matches!(result, Err(CouponError::NotYetStarted(at)) if at == starts_at));

        Ok(())
    }

    #[test]
    fn past_end_is_expired() -> TestResult {
        let ends_at = now()?.checked_sub(SignedDuration::from_secs(1))?;
        let store = store_with(percent_coupon().with_window(None, Some(ends_at)));

        let result = validate_coupon_at(&store, "SAVE10", now()?);

        assert!(matches!(result, Err(CouponError::Expired(at)) if at == ends_at));

        Ok(())
    }

    #[test]
    fn window_bounds_are_inclusive() -> TestResult {
        let now = now()?;
        let store = store_with(percent_coupon().with_window(Some(now), Some(now)));

        assert!(validate_coupon_at(&store, "SAVE10", now).is_ok());

        Ok(())
    }

    #[test]
    fn store_failures_propagate() -> TestResult {
        let mut store = MockCouponStore::new();
        store
            .expect_find_by_code()
            .returning(|_| Err(CouponStoreError::Unavailable("offline".to_string())));

        let result = validate_coupon_at(&store, "SAVE10", now()?);

        assert!(matches!(result, Err(CouponError::Store(_))));

        Ok(())
    }

    #[test]
    fn current_time_validation_accepts_open_window() -> TestResult {
        let store = store_with(percent_coupon());

        assert_eq!(validate_coupon(&store, "save10")?.code(), "SAVE10");

        Ok(())
    }
}
