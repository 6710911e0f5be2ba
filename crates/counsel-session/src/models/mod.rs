pub(crate) mod credentials;
pub(crate) mod email_verification;
pub(crate) mod envelope;
pub(crate) mod magic_link;
pub(crate) mod otp;
pub(crate) mod registration;

pub use credentials::{LoginCredentials, LoginOutcome, LoginResult, OtpChallenge};
pub use email_verification::{EmailVerificationResult, VerificationEmailRequestResult};
pub use envelope::{AuthEnvelope, PasswordBreachWarning, Requires, SecurityWarning};
pub use magic_link::MagicLinkResponse;
pub use otp::{OtpPurpose, OtpResponse, OtpStatus, OtpVerification, VerifyOtpRequest};
pub use registration::{Availability, AvailabilityField, RegisterData};
