use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use chrono::Utc;
use mcq_database::Database;
use mcq_database::entities::{Role, user};
use mcq_domain::config::ApiConfig;
use mcq_kernel::security::{AdminUser, CurrentUser, TokenService};
use mcq_kernel::server::ApiState;
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;

fn user(id: i32, role: Role) -> user::Model {
    user::Model {
        id,
        full_name: Some("Grace Hopper".into()),
        phone_number: None,
        date_of_birth: None,
        email: format!("user{id}@example.com"),
        hashed_password: "$2b$04$invalid".into(),
        role,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

fn app(rows: Vec<user::Model>) -> (Router, TokenService) {
    let mut db = MockDatabase::new(DatabaseBackend::MySql);
    for row in rows {
        db = db.append_query_results([vec![row]]);
    }
    let db = db.append_query_results([Vec::<user::Model>::new()]);

    let config = ApiConfig::default();
    let state = ApiState::builder()
        .config(config)
        .db(Database::from_connection(db.into_connection()))
        .build()
        .unwrap();
    let tokens = state.tokens.clone();

    let router = Router::new()
        .route("/me", get(|CurrentUser(u): CurrentUser| async move { u.email }))
        .route("/admin", get(|AdminUser(u): AdminUser| async move { u.email }))
        .with_state(state);
    (router, tokens)
}

async fn call(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Option<String>, String) {
    let mut request = Request::get(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, challenge, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _) = app(vec![]);
    let (status, challenge, body) = call(app, "/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some("Bearer"));
    assert!(body.contains("Not authenticated"));
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (app, _) = app(vec![]);
    let (status, _, body) = call(app, "/me", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid authentication credentials"));
}

#[tokio::test]
async fn valid_token_resolves_user() {
    let owner = user(3, Role::User);
    let (app, tokens) = app(vec![owner.clone()]);
    let token = tokens.issue(&owner).unwrap();

    let (status, _, body) = call(app, "/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "user3@example.com");
}

#[tokio::test]
async fn deleted_user_is_unauthorized() {
    let ghost = user(9, Role::User);
    let (app, tokens) = app(vec![]);
    let token = tokens.issue(&ghost).unwrap();

    let (status, _, body) = call(app, "/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("User not found"));
}

#[tokio::test]
async fn admin_route_rejects_plain_users() {
    let plain = user(4, Role::User);
    let (app, tokens) = app(vec![plain.clone()]);
    let token = tokens.issue(&plain).unwrap();

    let (status, challenge, body) = call(app, "/admin", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(challenge.is_none());
    assert!(body.contains("Insufficient permissions. Admin role required."));
}

#[tokio::test]
async fn admin_route_accepts_admins() {
    let admin = user(1, Role::Admin);
    let (app, tokens) = app(vec![admin.clone()]);
    let token = tokens.issue(&admin).unwrap();

    let (status, _, body) = call(app, "/admin", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "user1@example.com");
}
