use super::*;
use crate::error::Operation;
use crate::request::MockHttpClient;
use crate::schedule::owner_agenda;
use crate::session::{AuthPhase, restore_session};
use crate::storage::{KEY_AUTH_TOKEN, KEY_CACHED_USER, MemoryStore};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::rc::Rc;

const BASE: &str = "http://api.test";

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    http: Rc<MockHttpClient>,
    store: MemoryStore,
    client: ApiClient<Rc<MockHttpClient>, MemoryStore>,
}

impl TestContext {
    fn new() -> Self {
        let http = Rc::new(MockHttpClient::new());
        let store = MemoryStore::new();
        let client = ApiClient::new(
            http.clone(),
            store.clone(),
            ClientConfig::new(BASE, true),
        );
        Self {
            http,
            store,
            client,
        }
    }

    fn signed_in() -> Self {
        let ctx = Self::new();
        ctx.store.set(KEY_AUTH_TOKEN, "tok-1");
        ctx
    }

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    fn request_count(&self) -> usize {
        self.http.requests.borrow().len()
    }
}

fn owner_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "role": "pet_owner"
    })
}

// =========================================================
// Request construction
// =========================================================

#[tokio::test]
async fn missing_token_fails_without_request() {
    let ctx = TestContext::new();

    let err = ctx.client.list_pets(None).await.unwrap_err();

    assert_eq!(err, ApiError::MissingToken);
    assert_eq!(ctx.request_count(), 0);
}

#[tokio::test]
async fn authenticated_request_carries_headers() {
    let ctx = TestContext::signed_in();
    ctx.http.mock_response(
        HttpMethod::Get,
        &TestContext::url("/api/pets?owner_id=u1"),
        200,
        json!([]),
    );

    let pets = ctx.client.list_pets(Some("u1")).await.unwrap();
    assert!(pets.is_empty());

    let req = ctx.http.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer tok-1"));
    assert!(req.header(HEADER_REQUEST_ID).is_some());
    // GET 没有 body，也不带 Content-Type
    assert_eq!(req.header(HEADER_CONTENT_TYPE), None);
    assert_eq!(req.body, None);
}

#[tokio::test]
async fn legacy_token_is_migrated_and_used() {
    let ctx = TestContext::new();
    ctx.store.set("petOwnerToken", "legacy");
    ctx.http
        .mock_response(HttpMethod::Get, &TestContext::url("/api/stats"), 200, json!({}));

    let stats = ctx.client.stats().await.unwrap();

    assert_eq!(stats, Stats::default());
    assert_eq!(
        ctx.http.last_request().unwrap().header(HEADER_AUTHORIZATION),
        Some("Bearer legacy")
    );
    assert_eq!(ctx.store.get(KEY_AUTH_TOKEN).as_deref(), Some("legacy"));
    assert!(!ctx.store.contains("petOwnerToken"));
}

#[tokio::test]
async fn error_status_keeps_server_message() {
    let ctx = TestContext::new();
    ctx.http.mock_response(
        HttpMethod::Post,
        &TestContext::url("/api/auth/login"),
        401,
        json!({ "message": "Invalid credentials" }),
    );

    let err = ctx.client.sign_in("ada@example.com", "nope").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(Operation::SignIn), "Invalid credentials");
    assert!(!ctx.store.contains(KEY_AUTH_TOKEN));
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let ctx = TestContext::signed_in();
    ctx.http
        .mock_raw(HttpMethod::Delete, &TestContext::url("/api/pets/p1"), 204, "");

    ctx.client.delete_pet("p1").await.unwrap();

    assert_eq!(ctx.http.last_request().unwrap().method, HttpMethod::Delete);
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let ctx = TestContext::signed_in();

    let err = ctx.client.list_appointments(AppointmentFilter::default()).await.unwrap_err();

    assert!(err.is_unreachable());
    assert_eq!(ctx.request_count(), 1);
}

// =========================================================
// Auth flows
// =========================================================

#[tokio::test]
async fn sign_in_stores_token_and_user() {
    let ctx = TestContext::new();
    ctx.http.mock_response(
        HttpMethod::Post,
        &TestContext::url("/api/auth/login"),
        200,
        json!({ "token": "tok-9", "user": owner_json() }),
    );

    let user = ctx.client.sign_in(" ada@example.com ", "secret").await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(ctx.store.get(KEY_AUTH_TOKEN).as_deref(), Some("tok-9"));
    assert_eq!(session::cached_user(&ctx.store), Some(user));

    let req = ctx.http.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), None);
    assert_eq!(req.header(HEADER_CONTENT_TYPE), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["email"], "ada@example.com");
}

fn owner_sign_up() -> SignUpRequest {
    SignUpRequest {
        email: "ada@example.com".into(),
        password: "secret".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        phone: None,
        role: Role::PetOwner,
    }
}

#[tokio::test]
async fn sign_up_with_token_starts_session() {
    let ctx = TestContext::new();
    ctx.http.mock_response(
        HttpMethod::Post,
        &TestContext::url("/api/auth/register"),
        201,
        json!({ "token": "tok-new", "user": owner_json() }),
    );

    let outcome = ctx.client.sign_up(&owner_sign_up()).await.unwrap();

    assert!(outcome.is_signed_in());
    assert_eq!(ctx.store.get(KEY_AUTH_TOKEN).as_deref(), Some("tok-new"));
    assert_eq!(session::cached_user(&ctx.store).as_ref(), Some(outcome.user()));
}

#[tokio::test]
async fn sign_up_without_token_requires_login() {
    let ctx = TestContext::new();
    ctx.http.mock_response(
        HttpMethod::Post,
        &TestContext::url("/api/auth/register"),
        201,
        json!({ "user": owner_json() }),
    );

    let outcome = ctx.client.sign_up(&owner_sign_up()).await.unwrap();

    assert_eq!(outcome, SignUpOutcome::LoginRequired(outcome.user().clone()));
    assert_eq!(outcome.user().role, Role::PetOwner);
    assert!(!ctx.store.contains(KEY_AUTH_TOKEN));
    assert!(!ctx.store.contains(KEY_CACHED_USER));

    // 没有会话：受保护请求在本地被拦下，重新加载后仍是匿名
    let sent = ctx.request_count();
    let err = ctx.client.list_pets(Some("u1")).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
    assert_eq!(ctx.request_count(), sent);

    let restored = restore_session(&ctx.client).await;
    assert_eq!(restored.phase, AuthPhase::Anonymous);
    assert!(!restored.offline);
}

#[tokio::test]
async fn sign_out_removes_all_session_keys() {
    let ctx = TestContext::signed_in();
    for key in ["mockUser", "token", "petOwnerToken", "doctor", "petOwner"] {
        ctx.store.set(key, "x");
    }
    ctx.store.set("apiBaseUrl", "http://keep.test");

    ctx.client.sign_out();

    for key in ["authToken", "mockUser", "token", "petOwnerToken", "doctor", "petOwner"] {
        assert!(!ctx.store.contains(key), "{} should be removed", key);
    }
    assert!(ctx.store.contains("apiBaseUrl"));
}

#[tokio::test]
async fn restore_without_token_is_anonymous() {
    let ctx = TestContext::new();
    ctx.store.set(KEY_CACHED_USER, &owner_json().to_string());

    let restored = restore_session(&ctx.client).await;

    assert_eq!(restored.phase, AuthPhase::Anonymous);
    assert!(!restored.offline);
    assert!(!ctx.store.contains(KEY_CACHED_USER));
    assert_eq!(ctx.request_count(), 0);
}

#[tokio::test]
async fn restore_with_rejected_token_discards_it() {
    let ctx = TestContext::signed_in();
    ctx.http.mock_response(
        HttpMethod::Get,
        &TestContext::url("/api/auth/me"),
        401,
        json!({ "message": "jwt expired" }),
    );

    let restored = restore_session(&ctx.client).await;

    assert_eq!(restored.phase, AuthPhase::Anonymous);
    assert!(!ctx.store.contains(KEY_AUTH_TOKEN));
}

#[tokio::test]
async fn restore_offline_uses_cached_user() {
    let ctx = TestContext::signed_in();
    ctx.store.set(KEY_CACHED_USER, &owner_json().to_string());

    let restored = restore_session(&ctx.client).await;

    assert!(restored.offline);
    assert_eq!(restored.phase.role(), Some(Role::PetOwner));
    // 离线时保留 token，后端恢复后仍可使用
    assert!(ctx.store.contains(KEY_AUTH_TOKEN));
}

#[tokio::test]
async fn restore_success_refreshes_cache() {
    let ctx = TestContext::signed_in();
    let mut fresh = owner_json();
    fresh["first_name"] = json!("Augusta");
    ctx.http
        .mock_response(HttpMethod::Get, &TestContext::url("/api/auth/me"), 200, fresh);

    let restored = restore_session(&ctx.client).await;

    assert!(restored.phase.is_authenticated());
    assert_eq!(
        session::cached_user(&ctx.store).map(|u| u.first_name),
        Some("Augusta".to_string())
    );
}

// =========================================================
// Appointment flows
// =========================================================

#[tokio::test]
async fn cancel_sets_status_and_leaves_upcoming() {
    let ctx = TestContext::signed_in();
    let now = Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap();
    let booked = json!({
        "_id": "a1", "pet_id": "p1", "doctor_id": "d1",
        "appointment_date": "2025-03-05T10:00:00Z", "status": "scheduled"
    });
    let mut cancelled = booked.clone();
    cancelled["status"] = json!("cancelled");
    ctx.http.mock_response(
        HttpMethod::Put,
        &TestContext::url("/api/appointments/a1"),
        200,
        cancelled,
    );

    let before: Appointment = serde_json::from_value(booked).unwrap();
    assert_eq!(owner_agenda(std::slice::from_ref(&before), now).upcoming.len(), 1);

    let after = ctx.client.cancel_appointment("a1").await.unwrap();

    let req = ctx.http.last_request().unwrap();
    assert_eq!(req.body.as_deref(), Some(r#"{"status":"cancelled"}"#));
    assert_eq!(after.status, AppointmentStatus::Cancelled);

    let agenda = owner_agenda(&[after], now);
    assert!(agenda.upcoming.is_empty());
    assert_eq!(agenda.past.len(), 1);
}

#[tokio::test]
async fn booking_posts_utc_instant() {
    let ctx = TestContext::signed_in();
    let when = Utc.with_ymd_and_hms(2025, 3, 5, 14, 30, 0).unwrap();
    ctx.http.mock_response(
        HttpMethod::Post,
        &TestContext::url("/api/appointments"),
        201,
        json!({
            "_id": "a2", "pet_id": "p1", "doctor_id": "d1",
            "appointment_date": "2025-03-05T14:30:00Z", "status": "scheduled"
        }),
    );

    let created = ctx
        .client
        .create_appointment(&NewAppointment {
            pet_id: "p1".into(),
            doctor_id: "d1".into(),
            appointment_date: when,
            description: "Vaccination".into(),
            status: AppointmentStatus::Scheduled,
        })
        .await
        .unwrap();

    assert_eq!(created.appointment_date, when);
    let req = ctx.http.last_request().unwrap();
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["appointment_date"], "2025-03-05T14:30:00Z");
    assert_eq!(body["status"], "scheduled");
}

#[tokio::test]
async fn details_are_posted_to_nested_path() {
    let ctx = TestContext::signed_in();
    ctx.http.mock_response(
        HttpMethod::Post,
        &TestContext::url("/api/appointments/a1/details"),
        200,
        json!({ "_id": "x1", "appointment_id": "a1", "diagnosis": "Otitis" }),
    );

    let saved = ctx
        .client
        .save_appointment_details("a1", DetailsInput::from_text("Otitis", "", ""))
        .await
        .unwrap();

    assert_eq!(saved.diagnosis.as_deref(), Some("Otitis"));
    assert_eq!(saved.treatment, None);
}
