//! HTTP flow tests over the in-memory store

use std::str::FromStr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use domain_identity::{Argon2Hasher, UserRole};
use domain_lifecycle::{AdminBootstrap, InMemoryStore, SequentialNumberGenerator};
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{ClaimFixtures, DateFixtures, PlanFixtures, StringFixtures, UserFixtures};

struct TestApp {
    server: TestServer,
    admin_token: String,
}

async fn spawn_app() -> TestApp {
    let config = ApiConfig {
        jwt_secret: "api-test-secret".to_string(),
        ..ApiConfig::default()
    };
    let state = AppState::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(Argon2Hasher::with_params(1024, 1, 1).unwrap()),
        Arc::new(SequentialNumberGenerator::new()),
        config,
    );
    state
        .accounts
        .ensure_admin(&AdminBootstrap::default())
        .await
        .unwrap();

    let server = TestServer::new(create_router(state)).unwrap();
    let admin = AdminBootstrap::default();
    let admin_token = login(&server, &admin.username, &admin.password).await;
    TestApp {
        server,
        admin_token,
    }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/token")
        .form(&[("username", username), ("password", password)])
        .await;
    response.assert_status_ok();
    response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Registers a customer and returns its token
async fn register_customer(app: &TestApp, handle: &str) -> String {
    app.server
        .post("/register")
        .json(&UserFixtures::customer(handle))
        .await
        .assert_status(StatusCode::CREATED);
    login(&app.server, handle, StringFixtures::password()).await
}

/// Registers a user through the admin and returns its token
async fn register_staff(app: &TestApp, handle: &str, role: UserRole) -> String {
    app.server
        .post("/register")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .json(&UserFixtures::with_role(handle, role))
        .await
        .assert_status(StatusCode::CREATED);
    login(&app.server, handle, StringFixtures::password()).await
}

async fn create_plan(app: &TestApp) -> String {
    let response = app
        .server
        .post("/plans")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .json(&PlanFixtures::standard())
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn issue_policy(app: &TestApp, token: &str, plan_id: &str) -> String {
    let response = app
        .server
        .post("/policies")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&json!({
            "plan_id": plan_id,
            "start_date": DateFixtures::policy_start(),
            "payment_frequency": "monthly",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn activate(app: &TestApp, policy_id: &str) -> TestResponse {
    app.server
        .patch(&format!("/policies/{}/activate", policy_id))
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .await
}

fn error_type(response: &TestResponse) -> String {
    response.json::<Value>()["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_banner_and_health_are_public() {
    let app = spawn_app().await;

    let root = app.server.get("/").await;
    root.assert_status_ok();
    assert_eq!(root.json::<Value>()["status"], "operational");

    let health = app.server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["status"], "healthy");

    app.server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = spawn_app().await;
    let token = register_customer(&app, "carol").await;

    let me = app
        .server
        .get("/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    me.assert_status_ok();
    let body = me.json::<Value>();
    assert_eq!(body["username"], "carol");
    assert_eq!(body["role"], "customer");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_self_registration_cannot_claim_admin() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/register")
        .json(&UserFixtures::with_role("mallory", UserRole::Admin))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    register_customer(&app, "dave").await;

    let response = app
        .server
        .post("/token")
        .form(&[("username", "dave"), ("password", "not-the-password")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(error_type(&response), "unauthorized");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = spawn_app().await;

    app.server
        .get("/policies")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/claims")
        .add_header(header::AUTHORIZATION, bearer("garbage"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_plan_catalog_reads_are_public_and_writes_are_admin_only() {
    let app = spawn_app().await;
    let plan_id = create_plan(&app).await;
    let customer = register_customer(&app, "erin").await;

    let plans = app.server.get("/plans").await;
    plans.assert_status_ok();
    assert_eq!(plans.json::<Vec<Value>>().len(), 1);

    let plan = app.server.get(&format!("/plans/{}", plan_id)).await;
    plan.assert_status_ok();
    assert_eq!(decimal(&plan.json::<Value>()["copay_percentage"]), dec!(20));

    app.server
        .get(&format!("/plans/{}", uuid_like_unknown()))
        .await
        .assert_status_not_found();

    app.server
        .post("/plans")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .json(&PlanFixtures::standard())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

fn uuid_like_unknown() -> &'static str {
    "00000000-0000-4000-8000-000000000000"
}

#[tokio::test]
async fn test_claim_on_pending_policy_is_rejected() {
    let app = spawn_app().await;
    let plan_id = create_plan(&app).await;
    let customer = register_customer(&app, "fay").await;
    let policy_id = issue_policy(&app, &customer, &plan_id).await;

    let response = app
        .server
        .post("/claims")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .json(&json!({
            "policy_id": policy_id,
            "service_date": DateFixtures::service_date(),
            "provider_name": "City Clinic",
            "claimed_amount": "250.00",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(error_type(&response), "invalid_transition");
}

#[tokio::test]
async fn test_claim_lifecycle_over_http() {
    let app = spawn_app().await;
    let plan_id = create_plan(&app).await;
    let customer = register_customer(&app, "gina").await;
    let agent = register_staff(&app, "quinn", UserRole::Agent).await;
    let policy_id = issue_policy(&app, &customer, &plan_id).await;

    let activated = activate(&app, &policy_id).await;
    activated.assert_status_ok();
    assert_eq!(activated.json::<Value>()["status"], "active");
    activate(&app, &policy_id)
        .await
        .assert_status(StatusCode::CONFLICT);

    let submitted = app
        .server
        .post("/claims")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .json(&ClaimFixtures::office_visit(
            policy_id.parse().unwrap(),
            dec!(500),
        ))
        .await;
    submitted.assert_status(StatusCode::CREATED);
    let claim = submitted.json::<Value>();
    assert_eq!(claim["status"], "submitted");
    assert!(claim["entitlement"].is_null());
    let claim_id = claim["id"].as_str().unwrap().to_string();

    app.server
        .patch(&format!("/claims/{}", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .json(&ClaimFixtures::approve(None))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let reviewed = app
        .server
        .patch(&format!("/claims/{}", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&agent))
        .json(&ClaimFixtures::approve(None))
        .await;
    reviewed.assert_status_ok();
    let claim = reviewed.json::<Value>();
    assert_eq!(claim["status"], "approved");
    assert_eq!(decimal(&claim["entitlement"]["patient_share"]), dec!(100));
    assert_eq!(decimal(&claim["entitlement"]["insurer_share"]), dec!(400));

    let visible = app
        .server
        .get(&format!("/claims/{}", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .await;
    visible.assert_status_ok();

    let stranger = register_customer(&app, "hank").await;
    app.server
        .get(&format!("/claims/{}", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&stranger))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let stranger_claims = app
        .server
        .get("/claims")
        .add_header(header::AUTHORIZATION, bearer(&stranger))
        .await;
    assert!(stranger_claims.json::<Vec<Value>>().is_empty());

    let approved = app
        .server
        .get("/claims")
        .add_query_param("status", "approved")
        .add_header(header::AUTHORIZATION, bearer(&agent))
        .await;
    assert_eq!(approved.json::<Vec<Value>>().len(), 1);
}

#[tokio::test]
async fn test_non_positive_claim_amount_is_unprocessable() {
    let app = spawn_app().await;
    let plan_id = create_plan(&app).await;
    let customer = register_customer(&app, "ivy").await;
    let policy_id = issue_policy(&app, &customer, &plan_id).await;
    activate(&app, &policy_id).await.assert_status_ok();

    let response = app
        .server
        .post("/claims")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .json(&ClaimFixtures::office_visit(policy_id.parse().unwrap(), dec!(0)))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_type(&response), "invalid_amount");
}

#[tokio::test]
async fn test_payments_and_reports() {
    let app = spawn_app().await;
    let plan_id = create_plan(&app).await;
    let customer = register_customer(&app, "jack").await;
    let policy_id = issue_policy(&app, &customer, &plan_id).await;

    let payment = app
        .server
        .post("/payments")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .json(&json!({
            "policy_id": policy_id,
            "amount": "200.00",
            "method": "credit_card",
        }))
        .await;
    payment.assert_status(StatusCode::CREATED);
    assert_eq!(payment.json::<Value>()["status"], "completed");

    let listed = app
        .server
        .get("/payments")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .await;
    assert_eq!(listed.json::<Vec<Value>>().len(), 1);

    let personal = app
        .server
        .get("/dashboard/stats")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .await;
    personal.assert_status_ok();
    assert_eq!(personal.json::<Value>()["total_payments"], 1);

    let system = app
        .server
        .get("/dashboard/stats")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .await;
    system.assert_status_ok();
    assert_eq!(system.json::<Value>()["total_users"], 2);

    let revenue = app
        .server
        .get("/reports/revenue-summary")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .await;
    revenue.assert_status_ok();
    assert_eq!(decimal(&revenue.json::<Value>()["total_revenue"]), dec!(200));

    app.server
        .get("/reports/claims-summary")
        .add_query_param("start_date", "2030-01-02")
        .add_query_param("end_date", "2030-01-01")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let own_claims = app
        .server
        .get("/reports/claims-summary")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .await;
    own_claims.assert_status_ok();
    assert_eq!(own_claims.json::<Value>()["total_claims"], 0);

    app.server
        .get("/reports/revenue-summary")
        .add_header(header::AUTHORIZATION, bearer(&customer))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivated_user_loses_access() {
    let app = spawn_app().await;
    let token = register_customer(&app, "kim").await;

    let me = app
        .server
        .get("/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json::<Value>();
    let user_id = me["id"].as_str().unwrap();

    let users = app
        .server
        .get("/admin/users")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .await;
    assert_eq!(users.json::<Vec<Value>>().len(), 2);

    let deactivated = app
        .server
        .patch(&format!("/admin/users/{}/deactivate", user_id))
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token))
        .await;
    deactivated.assert_status_ok();
    assert_eq!(deactivated.json::<Value>()["is_active"], false);

    app.server
        .get("/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
