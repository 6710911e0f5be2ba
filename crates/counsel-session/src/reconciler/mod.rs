//! The session reconciler: one instance per application context.

pub(crate) mod email_verification;
pub(crate) mod login;
pub(crate) mod magic_link;
pub(crate) mod otp;
pub(crate) mod registration;
pub(crate) mod verify;

use crate::{
    ANONYMOUS_KEY, ApiResult, AuthApi, AuthTransport, CacheSource, CachedIdentity, Clock,
    FailureTracker, HttpTransport, IdentityCache, KeyValueStore, SessionPolicy, SystemClock,
    TokenStore,
};

use counsel_core::{Identity, Role};

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use log::{info, warn};
use serde::Serialize;

/// Answers "who is authenticated?" from the local cache and `/auth/me`.
///
/// Cheap to clone; clones share state. `get_current_user` never fails, and
/// concurrent calls share a single remote verification.
#[derive(Clone)]
pub struct SessionReconciler {
    inner: Arc<Inner>,
}

struct Inner {
    api: AuthApi,
    store: Arc<dyn KeyValueStore>,
    tokens: TokenStore,
    cache: IdentityCache,
    clock: Arc<dyn Clock>,
    policy: SessionPolicy,
    state: Mutex<SessionState>,
    in_flight: Mutex<Option<InFlight>>,
    next_flight_id: AtomicU64,
}

/// Mutable session bookkeeping. Cache writes happen while this is locked so
/// a verification cannot interleave with login or logout.
#[derive(Default)]
struct SessionState {
    tracker: FailureTracker,
    /// Bumped by login and logout; verifications started under an older
    /// epoch never write the cache
    epoch: u64,
    recent: Option<RecentVerification>,
}

struct RecentVerification {
    at_millis: u64,
    identity: Identity,
}

struct InFlight {
    id: u64,
    result: Shared<BoxFuture<'static, Option<Identity>>>,
}

/// Snapshot of the local session state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    pub anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CacheSource>,
    pub has_access_token: bool,
    pub consecutive_failures: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success_millis: Option<u64>,
}

impl SessionReconciler {
    pub fn new(
        transport: Arc<dyn AuthTransport>,
        store: Arc<dyn KeyValueStore>,
        policy: SessionPolicy,
    ) -> Self {
        Self::with_clock(transport, store, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        transport: Arc<dyn AuthTransport>,
        store: Arc<dyn KeyValueStore>,
        policy: SessionPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api: AuthApi::new(transport),
                tokens: TokenStore::new(Arc::clone(&store)),
                cache: IdentityCache::new(Arc::clone(&store)),
                store,
                clock,
                policy,
                state: Mutex::new(SessionState::default()),
                in_flight: Mutex::new(None),
                next_flight_id: AtomicU64::new(1),
            }),
        }
    }

    /// Reconciler talking HTTP to `base_url`, with tokens kept in `store`.
    pub fn http(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn KeyValueStore>,
        policy: SessionPolicy,
    ) -> ApiResult<Self> {
        let transport = HttpTransport::new(base_url, timeout, TokenStore::new(Arc::clone(&store)))?;
        Ok(Self::new(Arc::new(transport), store, policy))
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.inner.policy
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// End the session.
    ///
    /// The remote call is best effort. Every cache tier, the tokens, the
    /// failure counters and the guest flag are cleared whatever it returns,
    /// and any verification still in flight is disowned.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.api.logout().await {
            warn!("Remote logout failed (local session cleared anyway): {e}");
        }

        self.inner.clear_session();
        info!("Logged out");
    }

    /// Local-only lookup through the cache fallback chain.
    pub fn get_cached_user(&self) -> Option<Identity> {
        self.cached_identity().map(|cached| cached.identity)
    }

    /// Like [`get_cached_user`](Self::get_cached_user), with the tier it came from.
    pub fn cached_identity(&self) -> Option<CachedIdentity> {
        self.inner.cache.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_cached_user().is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.get_cached_user()
            .is_some_and(|identity| identity.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_lawyer(&self) -> bool {
        self.has_role(Role::Lawyer)
    }

    pub fn is_client(&self) -> bool {
        self.has_role(Role::Client)
    }

    pub fn is_email_verified(&self) -> bool {
        self.get_cached_user()
            .is_some_and(|identity| identity.is_email_verified())
    }

    /// True when the cached identity belongs to a guest session.
    pub fn is_anonymous(&self) -> bool {
        match self.inner.store.get(ANONYMOUS_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Failed to read {ANONYMOUS_KEY}: {e}");
                false
            }
        }
    }

    pub fn status(&self) -> SessionStatus {
        let cached = self.cached_identity();
        let (consecutive_failures, last_success_millis) = {
            let state = self.inner.lock_state();
            (
                state.tracker.consecutive_failures(),
                state.tracker.last_success_millis(),
            )
        };

        SessionStatus {
            authenticated: cached.is_some(),
            anonymous: self.is_anonymous(),
            user_id: cached
                .as_ref()
                .and_then(|c| c.identity.id().map(String::from)),
            source: cached.map(|c| c.source),
            has_access_token: self.inner.tokens.access_token().is_some(),
            consecutive_failures,
            last_success_millis,
        }
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a freshly authenticated identity (login, OTP, magic link).
    fn establish(&self, identity: &Identity) {
        let now = self.clock.now_millis();
        let mut state = self.lock_state();

        state.epoch = state.epoch.wrapping_add(1);
        self.cache.store(identity);
        state.tracker.record_success(now);
        state.recent = None;
        *self.lock_in_flight() = None;
    }

    fn clear_session(&self) {
        let mut state = self.lock_state();

        state.epoch = state.epoch.wrapping_add(1);
        state.tracker.reset();
        state.recent = None;
        self.cache.clear();
        self.tokens.clear();
        if let Err(e) = self.store.remove(ANONYMOUS_KEY) {
            warn!("Failed to remove {ANONYMOUS_KEY}: {e}");
        }
        *self.lock_in_flight() = None;
    }
}
