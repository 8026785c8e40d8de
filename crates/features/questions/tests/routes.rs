use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use mcq_database::Database;
use mcq_database::entities::{Role, question, test_paper, user};
use mcq_domain::config::ApiConfig;
use mcq_kernel::security::TokenService;
use mcq_kernel::server::ApiState;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt;

fn caller(id: i32, role: Role) -> user::Model {
    user::Model {
        id,
        full_name: None,
        phone_number: None,
        date_of_birth: None,
        email: format!("user{id}@example.com"),
        hashed_password: "hash".into(),
        role,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

fn paper(id: i32) -> test_paper::Model {
    test_paper::Model {
        id,
        name: format!("Paper {id}"),
        duration_minutes: 60,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

fn question(id: i32, test_paper_id: i32, options: Value, correct_option_index: i32) -> question::Model {
    question::Model {
        id,
        question_text: format!("Question {id}"),
        max_score: 1.0,
        options,
        correct_option_index,
        test_paper_id,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

fn mock_for(user: &user::Model) -> MockDatabase {
    MockDatabase::new(DatabaseBackend::MySql).append_query_results([vec![user.clone()]])
}

fn app(mock: MockDatabase) -> Router {
    let config = ApiConfig::default();
    let database = Database::from_connection(mock.into_connection());
    let slice = mcq_questions::init(&config, &database);
    let state = ApiState::builder().config(config).db(database).register_slice(slice).build().unwrap();
    let (router, _) = mcq_questions::router().split_for_parts();
    router.with_state(state)
}

fn request(method: &str, uri: &str, user: &user::Model, body: Option<Value>) -> Request<Body> {
    let token = TokenService::new(&ApiConfig::default().security.jwt).unwrap().issue(user).unwrap();
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn create_body() -> Value {
    json!({
        "text": "Capital of France?",
        "test_paper_id": 1,
        "options": [
            {"text": "Berlin", "is_correct": false},
            {"text": "Paris", "is_correct": true},
            {"text": "Rome", "is_correct": false}
        ]
    })
}

#[tokio::test]
async fn admin_creates_a_question() {
    let admin = caller(1, Role::Admin);
    let stored = question(9, 1, json!([{"text": "Berlin"}, {"text": "Paris"}, {"text": "Rome"}]), 1);
    let mock = mock_for(&admin)
        .append_query_results([vec![paper(1)]])
        .append_exec_results([MockExecResult { last_insert_id: 9, rows_affected: 1 }])
        .append_query_results([vec![stored]]);

    let (status, body) = send(app(mock), request("POST", "/questions", &admin, Some(create_body()))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 9);
    assert_eq!(body["options"][1], json!({"id": 2, "text": "Paris"}));
    assert_eq!(body["correct_option_id"], 2);
    assert_eq!(body["max_score"], 1.0);
}

#[tokio::test]
async fn create_checks_the_paper_exists() {
    let admin = caller(1, Role::Admin);
    let mock = mock_for(&admin).append_query_results([Vec::<test_paper::Model>::new()]);

    let (status, body) = send(app(mock), request("POST", "/questions", &admin, Some(create_body()))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Test paper not found");
}

#[tokio::test]
async fn create_needs_enough_options() {
    let admin = caller(1, Role::Admin);
    let body = json!({
        "text": "Lonely?",
        "test_paper_id": 1,
        "options": [{"text": "Yes", "is_correct": true}]
    });

    let (status, body) = send(app(mock_for(&admin)), request("POST", "/questions", &admin, Some(body))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "at least 2 options are required");
}

#[tokio::test]
async fn users_list_questions_of_a_paper() {
    let user = caller(2, Role::User);
    let legacy = question(3, 4, Value::String(r#"["yes","no"]"#.into()), 0);
    let mock = mock_for(&user).append_query_results([vec![legacy]]);

    let (status, body) = send(app(mock), request("GET", "/questions?test_paper_id=4", &user, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["test_paper_id"], 4);
    assert_eq!(body[0]["options"], json!([{"id": 1, "text": "yes"}, {"id": 2, "text": "no"}]));
    assert_eq!(body[0]["correct_option_id"], 1);
}

#[tokio::test]
async fn unknown_question_is_404() {
    let user = caller(2, Role::User);
    let mock = mock_for(&user).append_query_results([Vec::<question::Model>::new()]);

    let (status, body) = send(app(mock), request("GET", "/questions/77", &user, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Question not found");
}

#[tokio::test]
async fn update_moves_the_answer_key() {
    let admin = caller(1, Role::Admin);
    let options = json!([{"text": "a"}, {"text": "b"}, {"text": "c"}]);
    let mut updated = question(5, 1, options.clone(), 2);
    updated.max_score = 3.0;
    let mock = mock_for(&admin)
        .append_query_results([vec![question(5, 1, options, 0)]])
        .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
        .append_query_results([vec![updated]]);

    let body = json!({"correct_option_index": 2, "max_score": 3.0});
    let (status, body) = send(app(mock), request("PUT", "/questions/5", &admin, Some(body))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct_option_id"], 3);
    assert_eq!(body["max_score"], 3.0);
}

#[tokio::test]
async fn update_rejects_an_index_past_the_stored_options() {
    let admin = caller(1, Role::Admin);
    let mock = mock_for(&admin).append_query_results([vec![question(5, 1, json!(["a", "b"]), 0)]]);

    let body = json!({"correct_option_index": 2});
    let (status, body) = send(app(mock), request("PUT", "/questions/5", &admin, Some(body))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "correct_option_index is out of range");
}

#[tokio::test]
async fn only_admins_delete() {
    let user = caller(2, Role::User);
    let (status, _) = send(app(mock_for(&user)), request("DELETE", "/questions/5", &user, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = caller(1, Role::Admin);
    let mock = mock_for(&admin).append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }]);
    let (status, _) = send(app(mock), request("DELETE", "/questions/5", &admin, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
