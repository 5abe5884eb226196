//! Router-level tests. Services are replaced by a hand-written auth stub and
//! mockall mocks; no database or Redis is involved.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use accompany_service_lib::service::{MockAccompanyService, MockReplyService};
use auth_service_lib::{AuthService, Claims, SignUp, TokenResponse};
use common::{AppError, AppResult};
use domain::{
    Accompany, AccompanyStatus, Continent, Destination, Gender, User, UserRole,
};
use gateway_lib::{create_router, AppState, GatewayConfig};
use user_service_lib::service::MockUserService;

const USER_TOKEN: &str = "verified-user-token";
const GUEST_TOKEN: &str = "unverified-user-token";

/// Accepts two fixed tokens; everything else is unauthorized.
struct StubAuthService {
    user_id: Uuid,
}

#[async_trait]
impl AuthService for StubAuthService {
    async fn sign_up(&self, request: SignUp) -> AppResult<User> {
        Ok(User {
            id: Uuid::new_v4(),
            email: request.email,
            password_hash: "hashed".to_string(),
            nickname: request.nickname,
            introduction: None,
            profile_image_url: None,
            birth: request.birth,
            gender: request.gender,
            role: UserRole::NonUser,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn sign_in(&self, _email: String, _password: String) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: USER_TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
        })
    }

    async fn validate_email(&self, _email: String, _code: String) -> AppResult<TokenResponse> {
        Err(AppError::invalid_argument("Invalid or expired verification code"))
    }

    async fn request_password_change(&self, _email: String) -> AppResult<()> {
        Ok(())
    }

    async fn change_password(
        &self,
        _email: String,
        _code: String,
        _new_password: String,
    ) -> AppResult<()> {
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let role = match token {
            USER_TOKEN => UserRole::User,
            GUEST_TOKEN => UserRole::NonUser,
            _ => return Err(AppError::Unauthorized),
        };
        Ok(Claims {
            sub: self.user_id,
            email: "traveler@withaeng.com".to_string(),
            role: role.to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }

    async fn refresh_token(&self, _claims: &Claims) -> AppResult<TokenResponse> {
        self.sign_in(String::new(), String::new()).await
    }
}

struct TestApp {
    user_id: Uuid,
    posts: MockAccompanyService,
}

impl TestApp {
    fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            posts: MockAccompanyService::new(),
        }
    }

    fn router(self) -> Router {
        let state = AppState::new(
            Arc::new(StubAuthService {
                user_id: self.user_id,
            }),
            Arc::new(MockUserService::new()),
            Arc::new(self.posts),
            Arc::new(MockReplyService::new()),
            GatewayConfig::default(),
        );
        create_router(state)
    }
}

fn post_fixture(owner: Uuid) -> Accompany {
    Accompany {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Lisbon in May".to_string(),
        content: "Two more people for a shared flat".to_string(),
        status: AccompanyStatus::Recruiting,
        destination: Destination {
            continent: Continent::Europe,
            country: Some("Portugal".to_string()),
            city: Some("Lisbon".to_string()),
        },
        start_trip_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        end_trip_date: NaiveDate::from_ymd_opt(2026, 5, 8).unwrap(),
        banner_image_url: None,
        headcount: 3,
        view_count: 0,
        like_count: 0,
        tags: vec!["surf".to_string()],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn post_body() -> Value {
    json!({
        "title": "Lisbon in May",
        "content": "Two more people for a shared flat",
        "continent": "EUROPE",
        "country": "Portugal",
        "city": "Lisbon",
        "start_trip_date": "2026-05-01",
        "end_trip_date": "2026-05-08",
        "headcount": 3,
        "tags": ["surf"]
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// =============================================================================
// Translator integration
// =============================================================================

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (status, body) = send(TestApp::new().router(), get("/nowhere", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"], Value::Null);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_unsupported_method_is_reported() {
    let request = json_request(Method::DELETE, "/health", None, "");
    let (status, body) = send(TestApp::new().router(), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(error_code(&body), "METHOD_NOT_SUPPORTED");
}

#[tokio::test]
async fn test_health_reports_unconfigured_components() {
    let (status, body) = send(TestApp::new().router(), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("healthy"));
    assert_eq!(body["data"]["cache"]["status"], json!("disabled"));
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(TestApp::new().router(), get("/accompanies", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_path_id_is_type_mismatch() {
    let (status, body) = send(
        TestApp::new().router(),
        get("/accompanies/not-a-uuid", Some(USER_TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "METHOD_ARGUMENT_TYPE_MISMATCH");
}

#[tokio::test]
async fn test_malformed_query_is_invalid_input() {
    let (status, body) = send(
        TestApp::new().router(),
        get("/accompanies?from=yesterday", Some(USER_TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let request = json_request(Method::POST, "/auth/sign-in", None, "{\"email\": ");
    let (status, body) = send(TestApp::new().router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "JSON_PARSE_ERROR");
}

#[tokio::test]
async fn test_unknown_enum_value_names_the_field() {
    let payload = json!({
        "email": "traveler@withaeng.com",
        "password": "long-enough-password",
        "nickname": "wanderer",
        "birth": "1995-04-01",
        "gender": "OTHER"
    });
    let request = json_request(Method::POST, "/auth/sign-up", None, &payload.to_string());
    let (status, body) = send(TestApp::new().router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_JSON_FIELD");
    assert_eq!(
        body["error"]["message"],
        json!("Invalid value for field 'gender'")
    );
}

#[tokio::test]
async fn test_validation_failure_is_invalid_argument() {
    let payload = json!({
        "email": "traveler@withaeng.com",
        "password": "short",
        "nickname": "wanderer",
        "birth": "1995-04-01",
        "gender": "FEMALE"
    });
    let request = json_request(Method::POST, "/auth/sign-up", None, &payload.to_string());
    let (status, body) = send(TestApp::new().router(), request).await;

    assert!(status.is_client_error());
    assert_eq!(error_code(&body), "INVALID_ARGUMENT");
    assert_eq!(
        body["error"]["message"],
        json!("Password must be at least 8 characters")
    );
}

#[tokio::test]
async fn test_invalid_argument_from_service_is_client_error() {
    let mut app = TestApp::new();
    app.posts
        .expect_list()
        .returning(|_, _| Err(AppError::invalid_argument("'from' must not be after 'to'")));

    let (status, body) = send(
        app.router(),
        get("/accompanies?from=2026-06-01&to=2026-05-01", Some(USER_TOKEN)),
    )
    .await;

    assert!(status.is_client_error());
    assert_eq!(error_code(&body), "INVALID_ARGUMENT");
    assert_eq!(body["error"]["message"], json!("'from' must not be after 'to'"));
}

// =============================================================================
// Endpoints
// =============================================================================

#[tokio::test]
async fn test_sign_up_returns_created_envelope() {
    let payload = json!({
        "email": "traveler@withaeng.com",
        "password": "long-enough-password",
        "nickname": "wanderer",
        "birth": "1995-04-01",
        "gender": "FEMALE"
    });
    let request = json_request(Method::POST, "/auth/sign-up", None, &payload.to_string());
    let (status, body) = send(TestApp::new().router(), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["data"]["role"], json!("NON_USER"));
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_unverified_account_cannot_create_post() {
    let mut app = TestApp::new();
    app.posts.expect_create().never();

    let request = json_request(
        Method::POST,
        "/accompanies",
        Some(GUEST_TOKEN),
        &post_body().to_string(),
    );
    let (status, body) = send(app.router(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "ACCESS_DENIED");
}

#[tokio::test]
async fn test_verified_account_creates_post() {
    let mut app = TestApp::new();
    let owner = app.user_id;
    app.posts
        .expect_create()
        .withf(move |user_id, draft| *user_id == owner && draft.headcount == 3)
        .times(1)
        .returning(move |user_id, _| Ok(post_fixture(user_id)));

    let request = json_request(
        Method::POST,
        "/accompanies",
        Some(USER_TOKEN),
        &post_body().to_string(),
    );
    let (status, body) = send(app.router(), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("RECRUITING"));
    assert_eq!(body["data"]["destination"]["continent"], json!("EUROPE"));
}

#[tokio::test]
async fn test_unverified_account_can_read_posts() {
    let mut app = TestApp::new();
    let post = post_fixture(Uuid::new_v4());
    let id = post.id;
    app.posts
        .expect_detail()
        .returning(move |_| Ok(post.clone()));

    let (status, body) = send(
        app.router(),
        get(&format!("/accompanies/{}", id), Some(GUEST_TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(id.to_string()));
}

#[tokio::test]
async fn test_sign_up_gender_round_trips() {
    let payload = json!({
        "email": "second@withaeng.com",
        "password": "long-enough-password",
        "nickname": "hiker",
        "birth": "1990-01-15",
        "gender": "MALE"
    });
    let request = json_request(Method::POST, "/auth/sign-up", None, &payload.to_string());
    let (_, body) = send(TestApp::new().router(), request).await;

    assert_eq!(body["data"]["gender"], json!(Gender::Male.as_str()));
}
