//! OTP, magic link, email verification and registration flows against wiremock

use counsel_session::{
    AvailabilityField, KeyValueStore, MemoryStore, OtpPurpose, RegisterData, SessionError,
    SessionPolicy, SessionReconciler, USER_KEY, VerifyOtpRequest,
};

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

fn setup(server: &MockServer) -> (SessionReconciler, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let reconciler = SessionReconciler::http(
        &server.uri(),
        Duration::from_secs(5),
        store.clone(),
        SessionPolicy::default(),
    )
    .unwrap();
    (reconciler, store)
}

fn user() -> Value {
    json!({ "_id": "1", "email": "a@example.com", "role": "client", "tenant": { "id": "T9" } })
}

fn otp_request(purpose: OtpPurpose, token: Option<&str>) -> VerifyOtpRequest {
    VerifyOtpRequest {
        email: "a@example.com".to_string(),
        otp: "123456".to_string(),
        purpose,
        login_session_token: token.map(String::from),
    }
}

// =========================================================================
// OTP
// =========================================================================

#[tokio::test]
async fn test_send_otp_posts_email_and_purpose() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/send-otp"))
        .and(body_partial_json(json!({ "email": "a@example.com", "purpose": "login" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "تم الإرسال",
            "messageEn": "Sent",
            "expiresIn": 300
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let response = reconciler
        .send_otp("a@example.com", OtpPurpose::default())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.expires_in, Some(300));
    assert_eq!(response.message_en.as_deref(), Some("Sent"));
}

#[tokio::test]
async fn test_verify_login_otp_without_session_token_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let err = reconciler
        .verify_otp(&otp_request(OtpPurpose::Login, None))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Validation {
            field: "login_session_token",
            ..
        }
    ));
}

#[tokio::test]
async fn test_verify_otp_establishes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .and(body_partial_json(json!({
            "otp": "123456",
            "purpose": "login",
            "loginSessionToken": "lst-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "user": user(),
            "access_token": "otp-access",
            "emailVerification": { "isVerified": false, "requiresVerification": true }
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let verification = reconciler
        .verify_otp(&otp_request(OtpPurpose::Login, Some("lst-1")))
        .await
        .unwrap();

    assert_eq!(verification.user.firm_id(), Some("T9"));
    assert!(verification.email_verification.is_some());
    assert!(reconciler.is_authenticated());
    assert_eq!(
        reconciler.tokens().access_token().as_deref(),
        Some("otp-access")
    );
}

#[tokio::test]
async fn test_wrong_otp_is_authentication_failed_and_nothing_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "message": "Invalid OTP",
            "attemptsLeft": 2
        })))
        .mount(&server)
        .await;
    let (reconciler, store) = setup(&server);

    let err = reconciler
        .verify_otp(&otp_request(OtpPurpose::Registration, None))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::AuthenticationFailed { .. }));
    assert_eq!(err.message(), "Invalid OTP");
    assert!(store.get(USER_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_unprocessable_otp_request_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": true,
            "message": "OTP must be 6 digits"
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let err = reconciler
        .verify_otp(&otp_request(OtpPurpose::Registration, None))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Validation { field: "otp", .. }));
    assert_eq!(err.message(), "OTP must be 6 digits");
}

#[tokio::test]
async fn test_otp_status_reads_nested_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/otp-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "attemptsRemaining": 4, "resetTime": "2026-01-01T00:00:00Z" }
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let status = reconciler.check_otp_status().await.unwrap();

    assert_eq!(status.attempts_remaining, 4);
    assert_eq!(status.reset_time.as_deref(), Some("2026-01-01T00:00:00Z"));
}

// =========================================================================
// Magic link
// =========================================================================

#[tokio::test]
async fn test_magic_link_round_trip_establishes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/magic-link/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Check your inbox",
            "expiresIn": 900
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/magic-link/verify"))
        .and(body_partial_json(json!({ "token": "ml-token" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user() })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let sent = reconciler.send_magic_link("a@example.com").await.unwrap();
    let identity = reconciler.verify_magic_link("ml-token").await.unwrap();

    assert_eq!(sent.expires_in, Some(900));
    assert_eq!(identity.id(), Some("1"));
    assert!(reconciler.is_client());
}

#[tokio::test]
async fn test_empty_magic_link_token_is_validation_error() {
    let server = MockServer::start().await;
    let (reconciler, _) = setup(&server);

    let err = reconciler.verify_magic_link("  ").await.unwrap_err();

    assert!(matches!(err, SessionError::Validation { field: "token", .. }));
}

// =========================================================================
// Email verification
// =========================================================================

#[tokio::test]
async fn test_verify_email_marks_cached_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "message": "Verified",
            "user": { "id": "1", "isEmailVerified": true, "emailVerifiedAt": "2026-10-01T10:00:00Z" }
        })))
        .mount(&server)
        .await;
    let (reconciler, store) = setup(&server);
    store.set(USER_KEY, &user().to_string()).unwrap();

    let result = reconciler.verify_email("ev-token").await.unwrap();

    assert!(result.success);
    assert!(reconciler.is_email_verified());
    let cached = reconciler.get_cached_user().unwrap();
    assert_eq!(
        cached.get("emailVerifiedAt"),
        Some(&json!("2026-10-01T10:00:00Z"))
    );
}

#[tokio::test]
async fn test_send_verification_email_reports_explicit_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/resend-verification"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "success": false,
            "message": "Already verified"
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let result = reconciler.send_verification_email().await.unwrap();

    assert!(!result.success);
    assert_eq!(result.message, "Already verified");
}

#[tokio::test]
async fn test_request_verification_email_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/request-verification-email"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "message": "انتظر",
            "messageEn": "Wait",
            "waitSeconds": 45,
            "waitMinutes": 1
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let result = reconciler.request_verification_email("a@example.com").await;

    assert!(!result.success);
    assert!(result.is_rate_limited());
    assert_eq!(result.wait_seconds, Some(45));
    assert_eq!(result.message_en.as_deref(), Some("Wait"));
}

#[tokio::test]
async fn test_request_verification_email_hides_other_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/request-verification-email"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "No such user" })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let result = reconciler.request_verification_email("ghost@example.com").await;

    assert!(result.success);
    assert!(result.code.is_none());
    assert_ne!(result.message, "No such user");
}

// =========================================================================
// Registration
// =========================================================================

fn register_data() -> RegisterData {
    RegisterData {
        email: "new@example.com".to_string(),
        password: "s3cret!".to_string(),
        first_name: "New".to_string(),
        last_name: "User".to_string(),
        ..RegisterData::default()
    }
}

#[tokio::test]
async fn test_register_posts_camel_case_body_and_does_not_sign_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_partial_json(json!({
            "email": "new@example.com",
            "firstName": "New",
            "isSeller": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "error": false })))
        .expect(1)
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    reconciler.register(&register_data()).await.unwrap();

    assert!(!reconciler.is_authenticated());
}

#[tokio::test]
async fn test_register_error_envelope_is_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "Email taken"
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let err = reconciler.register(&register_data()).await.unwrap_err();

    assert_eq!(err.message(), "Email taken");
}

#[tokio::test]
async fn test_check_availability() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/check-availability"))
        .and(body_partial_json(json!({ "field": "username", "value": "taken" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "available": false,
            "message": "Username is taken"
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let availability = reconciler
        .check_availability(AvailabilityField::Username, "taken")
        .await
        .unwrap();

    assert!(!availability.available);
    assert_eq!(availability.message.as_deref(), Some("Username is taken"));
}

#[tokio::test]
async fn test_check_availability_rejects_empty_value() {
    let server = MockServer::start().await;
    let (reconciler, _) = setup(&server);

    let err = reconciler
        .check_availability(AvailabilityField::Email, "")
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Validation { field: "value", .. }));
}

#[tokio::test]
async fn test_malformed_availability_request_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/check-availability"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "message": "Invalid phone format"
        })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let err = reconciler
        .check_availability(AvailabilityField::Phone, "12")
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Validation { field: "value", .. }));
    assert_eq!(err.message(), "Invalid phone format");
}

#[tokio::test]
async fn test_rate_limited_availability_request_stays_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/check-availability"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "message": "Slow down" })))
        .mount(&server)
        .await;
    let (reconciler, _) = setup(&server);

    let err = reconciler
        .check_availability(AvailabilityField::Email, "a@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::AuthenticationFailed { .. }));
    assert_eq!(err.status(), Some(429));
}
