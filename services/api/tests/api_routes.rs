//! Router tests against the in-memory backend

use api::{AppState, cors::OriginPolicy, create_router};
use auth::{CredentialHasher, HashingConfig, JwtConfig, JwtService};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const PASSWORD: &str = "correct-horse-battery";

fn test_state() -> AppState {
    let hasher = CredentialHasher::new(HashingConfig::insecure_fast()).unwrap();
    let jwt = JwtService::new(JwtConfig {
        secret: "router-test-secret-that-is-long-enough".to_string(),
        token_expiry: 7 * 24 * 60 * 60,
    });
    let origins = OriginPolicy::new(vec!["http://localhost:5173".to_string()], ".vercel.app");

    AppState::in_memory(hasher, jwt, origins).unwrap()
}

fn test_app() -> Router {
    create_router(test_state())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn register(app: &Router, email: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"displayName": "Ana", "email": email, "password": PASSWORD})),
    )
    .await
}

/// Register and log in, returning the token and user id
async fn sign_in(app: &Router, email: &str) -> (String, String) {
    let (status, _) = register(app, email).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": email, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn add_expense(app: &Router, token: &str, body: Value) -> Value {
    let (status, expense) = send(app, Method::POST, "/expenses", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{expense}");
    expense
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(&test_app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "memory");
}

#[tokio::test]
async fn test_unknown_route_has_a_json_message() {
    let app = test_app();
    for uri in ["/nope", "/expenses/extra/segments"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "message": "Route not found" }));
    }
}

#[tokio::test]
async fn test_register_returns_user_without_hash() {
    let app = test_app();
    let (status, body) = register(&app, "ana@example.com").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["displayName"], "Ana");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["message"].is_string());
    assert!(!body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = test_app();
    register(&app, "ana@example.com").await;

    let (status, body) = register(&app, "ana@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already registered");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = test_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"displayName": "Ana", "email": "not-an-email", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_token_resolves_to_the_same_user() {
    let app = test_app();
    let (token, user_id) = sign_in(&app, "ana@example.com").await;

    let (status, body) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id);
    assert_eq!(body["email"], "ana@example.com");
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = test_app();
    register(&app, "ana@example.com").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "ana@example.com", "password": "not-the-password"})),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": PASSWORD})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (status, _) = send(
        &test_app(),
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = test_app();

    for uri in ["/auth/me", "/expenses", "/budgets/2025-06", "/budgets/2025-06/status"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert!(body["message"].is_string());

        let (status, _) = send(&app, Method::GET, uri, Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    let request = Request::builder()
        .uri("/expenses")
        .header(header::AUTHORIZATION, "Basic YW5hOnNlY3JldA==")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let state = test_state();
    let app = create_router(state.clone());
    let (_, user_id) = sign_in(&app, "ana@example.com").await;

    let issued = state
        .auth
        .jwt()
        .issue_at(
            Uuid::parse_str(&user_id).unwrap(),
            Utc::now() - Duration::days(8),
        )
        .unwrap();

    let (status, _) = send(&app, Method::GET, "/auth/me", Some(&issued.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_another_secret_is_rejected() {
    let app = test_app();
    let (_, user_id) = sign_in(&app, "ana@example.com").await;

    let foreign = JwtService::new(JwtConfig {
        secret: "some-other-secret-that-is-long-enough".to_string(),
        token_expiry: 3600,
    })
    .issue(Uuid::parse_str(&user_id).unwrap())
    .unwrap();

    let (status, _) = send(&app, Method::GET, "/auth/me", Some(&foreign.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_expenses() {
    let app = test_app();
    let (token, user_id) = sign_in(&app, "ana@example.com").await;

    let created = add_expense(&app, &token, json!({"title": "Coffee", "amount": "4.5"})).await;
    assert_eq!(created["ownerId"], user_id);
    assert_eq!(created["category"], "General");
    assert_eq!(created["amount"], 4.5);

    add_expense(
        &app,
        &token,
        json!({"title": "Rent", "amount": 900, "category": "Housing", "date": "2020-01-01"}),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/expenses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|expense| expense["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Coffee", "Rent"]);
}

#[tokio::test]
async fn test_create_expense_validation() {
    let app = test_app();
    let (token, _) = sign_in(&app, "ana@example.com").await;

    for body in [
        json!({"amount": 10}),
        json!({"title": "Lunch"}),
        json!({"title": "Lunch", "amount": "ten"}),
        json!({"title": "Lunch", "amount": 10, "date": "someday"}),
    ] {
        let (status, response) =
            send(&app, Method::POST, "/expenses", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(response["message"].is_string());
    }

    let (_, list) = send(&app, Method::GET, "/expenses", Some(&token), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_expenses_are_isolated_between_users() {
    let app = test_app();
    let (ana, _) = sign_in(&app, "ana@example.com").await;
    let (ben, _) = sign_in(&app, "ben@example.com").await;

    let expense = add_expense(&app, &ana, json!({"title": "Books", "amount": 30})).await;
    let id = expense["id"].as_str().unwrap();

    let (_, ben_list) = send(&app, Method::GET, "/expenses", Some(&ben), None).await;
    assert_eq!(ben_list, json!([]));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/expenses/{}", id),
        Some(&ben),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, ana_list) = send(&app, Method::GET, "/expenses", Some(&ana), None).await;
    assert_eq!(ana_list.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/expenses/{}", id),
        Some(&ana),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, ana_list) = send(&app, Method::GET, "/expenses", Some(&ana), None).await;
    assert_eq!(ana_list, json!([]));
}

#[tokio::test]
async fn test_delete_unknown_or_malformed_id_is_not_found() {
    let app = test_app();
    let (token, _) = sign_in(&app, "ana@example.com").await;

    for uri in [format!("/expenses/{}", Uuid::new_v4()), "/expenses/not-a-uuid".to_string()] {
        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "Expense not found");
    }
}

#[tokio::test]
async fn test_budget_upsert_keeps_one_record() {
    let app = test_app();
    let (token, _) = sign_in(&app, "ana@example.com").await;

    let (status, body) = send(&app, Method::GET, "/budgets/2025-06", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (_, first) = send(
        &app,
        Method::POST,
        "/budgets",
        Some(&token),
        Some(json!({"month": "2025-06", "amount": 500})),
    )
    .await;
    let (status, second) = send(
        &app,
        Method::POST,
        "/budgets",
        Some(&token),
        Some(json!({"month": "2025-06", "amount": 800})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);

    let (_, stored) = send(&app, Method::GET, "/budgets/2025-06", Some(&token), None).await;
    assert_eq!(stored["id"], first["id"]);
    assert_eq!(stored["amount"], 800.0);
    assert_eq!(stored["month"], "2025-06");
}

#[tokio::test]
async fn test_budget_validation() {
    let app = test_app();
    let (token, _) = sign_in(&app, "ana@example.com").await;

    let (status, _) = send(&app, Method::GET, "/budgets/June", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for body in [
        json!({"month": "2025-06", "amount": -5}),
        json!({"month": "2025-13", "amount": 5}),
        json!({"amount": 5}),
    ] {
        let (status, _) =
            send(&app, Method::POST, "/budgets", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn test_budgets_are_isolated_between_users() {
    let app = test_app();
    let (ana, _) = sign_in(&app, "ana@example.com").await;
    let (ben, _) = sign_in(&app, "ben@example.com").await;

    send(
        &app,
        Method::POST,
        "/budgets",
        Some(&ana),
        Some(json!({"month": "2025-06", "amount": 500})),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/budgets/2025-06", Some(&ben), None).await;
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_budget_status_for_month() {
    let app = test_app();
    let (token, _) = sign_in(&app, "ana@example.com").await;

    let (_, body) = send(&app, Method::GET, "/budgets/2025-06/status", Some(&token), None).await;
    assert_eq!(body["status"], "no_budget");
    assert_eq!(body["remaining"], Value::Null);

    send(
        &app,
        Method::POST,
        "/budgets",
        Some(&token),
        Some(json!({"month": "2025-06", "amount": 1000})),
    )
    .await;
    add_expense(&app, &token, json!({"title": "Rent", "amount": 600, "date": "2025-06-01"})).await;
    add_expense(&app, &token, json!({"title": "Food", "amount": 200, "date": "2025-06-30T23:00:00Z"})).await;
    add_expense(&app, &token, json!({"title": "Old", "amount": 999, "date": "2025-05-31"})).await;

    let (status, body) =
        send(&app, Method::GET, "/budgets/2025-06/status", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["month"], "2025-06");
    assert_eq!(body["budget"], 1000.0);
    assert_eq!(body["totalSpent"], 800.0);
    assert_eq!(body["remaining"], 200.0);
    assert_eq!(body["usagePercent"], 80);
    assert_eq!(body["barPercent"], 80);
    assert_eq!(body["status"], "warn");
}

#[tokio::test]
async fn test_cors_allows_listed_and_trusted_origins() {
    let app = test_app();

    for origin in ["http://localhost:5173", "https://preview.vercel.app"] {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{origin}");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            origin,
            "{origin}"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}

#[tokio::test]
async fn test_cors_blocks_unknown_origins() {
    let app = test_app();
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/expenses")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(preflight).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_requests_without_origin_are_not_filtered() {
    let (status, _) = send(&test_app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
