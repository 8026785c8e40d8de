use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use mcq_database::Database;
use mcq_database::entities::{Role, user};
use mcq_domain::config::ApiConfig;
use mcq_kernel::security::{PasswordHasher, TokenService};
use mcq_kernel::server::ApiState;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt;

fn config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.security.bcrypt_cost = 4;
    config.security.admin_secret = "open-sesame".into();
    config
}

fn user(id: i32, role: Role, hashed_password: &str) -> user::Model {
    user::Model {
        id,
        full_name: Some(format!("User {id}")),
        phone_number: None,
        date_of_birth: None,
        email: format!("user{id}@example.com"),
        hashed_password: hashed_password.to_owned(),
        role,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

/// Each inner vec answers one `SELECT`, in order.
fn app(queries: Vec<Vec<user::Model>>, execs: usize) -> Router {
    let config = config();
    let mut mock = MockDatabase::new(DatabaseBackend::MySql);
    for rows in queries {
        mock = mock.append_query_results([rows]);
    }
    for id in 0..execs {
        mock = mock.append_exec_results([MockExecResult {
            last_insert_id: u64::try_from(id + 1).unwrap(),
            rows_affected: 1,
        }]);
    }
    let database = Database::from_connection(mock.into_connection());

    let slice = mcq_identity::init(&config, &database).unwrap();
    let state = ApiState::builder().config(config).db(database).register_slice(slice).build().unwrap();
    let (router, _) = mcq_identity::router().split_for_parts();
    router.with_state(state)
}

fn token_for(user: &user::Model) -> String {
    TokenService::new(&config().security.jwt).unwrap().issue(user).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let challenge =
        response.headers().get(header::WWW_AUTHENTICATE).map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, challenge, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn login_request(form: &'static str) -> Request<Body> {
    Request::post("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

#[tokio::test]
async fn register_creates_a_user() {
    let created = user(1, Role::User, "hash");
    let app = app(vec![vec![], vec![created]], 1);

    let body = json!({"email": "user1@example.com", "password": "secret123", "full_name": "User 1"});
    let (status, _, body) = send(app, json_request("POST", "/auth/register", None, &body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["email"], "user1@example.com");
    assert_eq!(body["role"], "USER");
    assert!(body.get("hashed_password").is_none());
}

#[tokio::test]
async fn register_rejects_taken_email() {
    let app = app(vec![vec![user(1, Role::User, "hash")]], 0);

    let body = json!({"email": "user1@example.com", "password": "secret123"});
    let (status, _, body) = send(app, json_request("POST", "/auth/register", None, &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");
}

#[tokio::test]
async fn register_validates_before_touching_the_database() {
    let app = app(vec![], 0);

    let body = json!({"email": "not-an-email", "password": "secret123"});
    let (status, _, body) = send(app, json_request("POST", "/auth/register", None, &body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "email is not a valid email address");
}

#[tokio::test]
async fn login_issues_a_bearer_token() {
    let hashed = PasswordHasher::new(4).hash("secret123").await.unwrap();
    let app = app(vec![vec![user(2, Role::User, &hashed)]], 0);

    let form = "grant_type=password&username=user2%40example.com&password=secret123&scope=";
    let (status, _, body) = send(app, login_request(form)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let claims = TokenService::new(&config().security.jwt)
        .unwrap()
        .verify(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, "2");
    assert_eq!(claims.role, "USER");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let hashed = PasswordHasher::new(4).hash("secret123").await.unwrap();
    let app = app(vec![vec![user(2, Role::User, &hashed)]], 0);

    let (status, challenge, body) =
        send(app, login_request("username=user2%40example.com&password=nope")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some("Bearer"));
    assert_eq!(body["detail"], "Incorrect email or password");
}

#[tokio::test]
async fn me_returns_the_caller() {
    let caller = user(3, Role::User, "hash");
    let token = token_for(&caller);
    let app = app(vec![vec![caller]], 0);

    let (status, _, body) = send(app, get_request("/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "user3@example.com");
}

#[tokio::test]
async fn admin_registration_requires_the_secret() {
    let app = app(vec![], 0);

    let body = json!({
        "full_name": "Root",
        "email": "root@example.com",
        "password": "secret123",
        "admin_secret": "guess"
    });
    let (status, _, body) = send(app, json_request("POST", "/auth/admin/register", None, &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Admin registration failed. Check email availability and admin secret."
    );
}

#[tokio::test]
async fn admin_registration_with_secret_creates_an_admin() {
    let created = user(10, Role::Admin, "hash");
    let app = app(vec![vec![], vec![created]], 1);

    let body = json!({
        "full_name": "Root",
        "email": "user10@example.com",
        "password": "secret123",
        "admin_secret": "open-sesame"
    });
    let (status, _, body) = send(app, json_request("POST", "/auth/admin/register", None, &body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "ADMIN");
}

#[tokio::test]
async fn users_cannot_read_each_other() {
    let caller = user(4, Role::User, "hash");
    let token = token_for(&caller);
    let app = app(vec![vec![caller]], 0);

    let (status, _, body) = send(app, get_request("/auth/users/5", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not authorized to access this user's data");
}

#[tokio::test]
async fn admins_get_404_for_unknown_users() {
    let admin = user(1, Role::Admin, "hash");
    let token = token_for(&admin);
    let app = app(vec![vec![admin], vec![]], 0);

    let (status, _, body) = send(app, get_request("/auth/users/99", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn update_rejects_a_phone_number_owned_by_someone_else() {
    let caller = user(6, Role::User, "hash");
    let mut other = user(7, Role::User, "hash");
    other.phone_number = Some("5551234567".into());
    let token = token_for(&caller);
    let app = app(vec![vec![caller.clone()], vec![caller], vec![other]], 0);

    let body = json!({"full_name": "Six", "phone_number": "5551234567", "date_of_birth": "1999-01-31"});
    let (status, _, body) =
        send(app, json_request("PATCH", "/auth/users/6", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Phone number already registered");
}

#[tokio::test]
async fn update_writes_the_profile() {
    let caller = user(6, Role::User, "hash");
    let mut updated = caller.clone();
    updated.full_name = Some("Six Sixer".into());
    updated.phone_number = Some("5551234567".into());
    updated.date_of_birth = "1999-01-31T00:00:00Z".parse().ok();
    let token = token_for(&caller);
    let app = app(vec![vec![caller.clone()], vec![caller], vec![], vec![updated]], 1);

    let body = json!({"full_name": "Six Sixer", "phone_number": "5551234567", "date_of_birth": "1999-01-31"});
    let (status, _, body) =
        send(app, json_request("PATCH", "/auth/users/6", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Six Sixer");
    assert_eq!(body["phone_number"], "5551234567");
    assert_eq!(body["date_of_birth"], "1999-01-31");
}

#[tokio::test]
async fn only_admins_create_users() {
    let caller = user(8, Role::User, "hash");
    let token = token_for(&caller);
    let app = app(vec![vec![caller]], 0);

    let body = json!({"email": "new@example.com", "password": "secret123", "full_name": "New User"});
    let (status, _, _) =
        send(app, json_request("POST", "/auth/admin/create-user", Some(&token), &body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn degraded_database_answers_503() {
    let config = config();
    let database = Database::unavailable("", "unreachable");
    let slice = mcq_identity::init(&config, &database).unwrap();
    let state = ApiState::builder().config(config).db(database).register_slice(slice).build().unwrap();
    let (router, _) = mcq_identity::router().split_for_parts();

    let body = json!({"email": "a@example.com", "password": "secret123"});
    let (status, _, body) =
        send(router.with_state(state), json_request("POST", "/auth/register", None, &body)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Database unavailable");
}
