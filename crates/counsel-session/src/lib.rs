//! Client-side session reconciliation for the Counsel practice-management API.
//!
//! [`SessionReconciler`] answers "who is currently authenticated?" from a tiered
//! local cache, re-verifies against `GET /auth/me`, and tolerates transient
//! verification failures for a grace period instead of logging the user out.

pub mod api;
pub mod cache;
pub mod clock;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod store;
pub mod tokens;
pub mod verification;

pub use api::{ApiError, ApiResult, AuthApi, AuthTransport, HttpTransport};
pub use cache::{
    CacheSource, CacheTier, CachedIdentity, IdentityCache, MemoryTier, PrimaryTier,
    SecondaryTier, TierRead,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result as SessionResult, SessionError};
pub use models::{
    AuthEnvelope, Availability, AvailabilityField, EmailVerificationResult, LoginCredentials,
    LoginOutcome, LoginResult, MagicLinkResponse, OtpChallenge, OtpPurpose, OtpResponse,
    OtpStatus, OtpVerification, PasswordBreachWarning, RegisterData, Requires, SecurityWarning,
    VerificationEmailRequestResult, VerifyOtpRequest,
};
pub use reconciler::{SessionReconciler, SessionStatus};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};
pub use tokens::TokenStore;
pub use verification::{
    FailureKind, FailureTracker, SessionPolicy, VerificationOutcome, is_auth_like,
};

pub use counsel_core::{Identity, Plan, Role, has_feature, is_plan_at_least, plan_level};

#[cfg(test)]
mod tests;

/// Primary store key holding the JSON-serialized identity.
pub const USER_KEY: &str = "user";
/// Secondary store key written by the UI state layer (`{ "state": { "user": ... } }`).
pub const AUTH_STORAGE_KEY: &str = "auth-storage";
/// `"true"` while the cached identity belongs to a guest session.
pub const ANONYMOUS_KEY: &str = "isAnonymous";
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const TOKEN_EXPIRES_AT_KEY: &str = "tokenExpiresAt";
