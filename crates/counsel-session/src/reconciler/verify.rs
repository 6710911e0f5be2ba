//! `get_current_user`: deduplicated remote verification.

use super::{InFlight, Inner, RecentVerification, SessionReconciler};
use crate::{FailureKind, VerificationOutcome};

use counsel_core::Identity;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, info, warn};

impl SessionReconciler {
    /// Verify the session against `GET /auth/me`.
    ///
    /// Never fails: resolves to the fresh identity, the cached identity
    /// (tolerated failure), or `None`. Callers arriving while a verification
    /// is running await that same verification. The verification runs on its
    /// own task, so it completes even if every caller stops waiting.
    pub async fn get_current_user(&self) -> Option<Identity> {
        if let Some(identity) = self.inner.recent_verification() {
            debug!("Reusing recent verification");
            return Some(identity);
        }

        let result = {
            // The epoch is captured under both locks so a logout that lands
            // before the task first runs still invalidates it
            let state = self.inner.lock_state();
            let mut slot = self.inner.lock_in_flight();
            match slot.as_ref() {
                Some(flight) => {
                    debug!("Joining in-flight verification #{}", flight.id);
                    flight.result.clone()
                }
                None => {
                    let id = self.inner.next_flight_id.fetch_add(1, Ordering::Relaxed);
                    let result = spawn_verification(Arc::clone(&self.inner), id, state.epoch);
                    *slot = Some(InFlight {
                        id,
                        result: result.clone(),
                    });
                    result
                }
            }
        };

        result.await
    }
}

/// Start verification `id` for session `epoch` on its own task and return a
/// shareable handle.
fn spawn_verification(
    inner: Arc<Inner>,
    id: u64,
    epoch: u64,
) -> Shared<BoxFuture<'static, Option<Identity>>> {
    debug!("Starting verification #{id} (epoch {epoch})");

    let handle = tokio::spawn(async move {
        let _settle = SettleGuard {
            inner: Arc::clone(&inner),
            id,
        };
        inner.verify(epoch).await
    });

    handle
        .map(|joined| {
            joined.unwrap_or_else(|e| {
                warn!("Verification task failed: {e}");
                None
            })
        })
        .boxed()
        .shared()
}

/// Clears the in-flight slot when its verification settles (or panics).
struct SettleGuard {
    inner: Arc<Inner>,
    id: u64,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        let mut slot = self.inner.lock_in_flight();
        if slot.as_ref().is_some_and(|flight| flight.id == self.id) {
            *slot = None;
        }
    }
}

impl Inner {
    fn recent_verification(&self) -> Option<Identity> {
        if self.policy.verify_cache.is_zero() {
            return None;
        }

        let now = self.clock.now_millis();
        let window = self.policy.verify_cache.as_millis();
        let state = self.lock_state();

        state
            .recent
            .as_ref()
            .filter(|recent| u128::from(now.saturating_sub(recent.at_millis)) < window)
            .map(|recent| recent.identity.clone())
    }

    async fn verify(&self, epoch: u64) -> Option<Identity> {
        let failure = match self.api.me().await {
            Ok(envelope) if !envelope.is_error() => match envelope.identity() {
                Some(identity) => return self.accept_fresh(identity.normalized(), epoch),
                None => FailureKind::NoUser,
            },
            Ok(envelope) => {
                debug!(
                    "/auth/me reported an error: {}",
                    envelope.message.as_deref().unwrap_or("-")
                );
                FailureKind::NoUser
            }
            Err(e) => {
                debug!("/auth/me failed: {e}");
                FailureKind::classify(&e, &self.policy.auth_error_markers)
            }
        };

        self.handle_failure(failure, epoch)
    }

    fn accept_fresh(&self, identity: Identity, epoch: u64) -> Option<Identity> {
        let now = self.clock.now_millis();
        let mut state = self.lock_state();

        if state.epoch != epoch {
            info!("Discarding verification result from a superseded session");
            return None;
        }

        self.cache.store(&identity);
        state.tracker.record_success(now);
        state.recent = (!self.policy.verify_cache.is_zero()).then(|| RecentVerification {
            at_millis: now,
            identity: identity.clone(),
        });

        info!(
            "Session verified ({}): user {}",
            VerificationOutcome::AcceptFresh,
            identity.id().unwrap_or("-")
        );
        Some(identity)
    }

    fn handle_failure(&self, failure: FailureKind, epoch: u64) -> Option<Identity> {
        let now = self.clock.now_millis();
        let mut state = self.lock_state();

        if state.epoch != epoch {
            debug!("Ignoring {failure} failure from a superseded session");
            return None;
        }

        let cached = self.cache.read().map(|cached| cached.identity);
        let recently = state
            .tracker
            .recently_authenticated(now, self.policy.grace_period);
        let outcome = state
            .tracker
            .record_failure(now, cached.is_some(), &self.policy);

        warn!(
            "Verification failed ({failure}): {outcome} (failures {}/{}, recent: {recently}, cached: {})",
            state.tracker.consecutive_failures(),
            self.policy.max_consecutive_failures,
            cached.is_some()
        );

        match outcome {
            VerificationOutcome::TrustCache => cached,
            VerificationOutcome::AcceptFresh | VerificationOutcome::Reject => None,
        }
    }
}
