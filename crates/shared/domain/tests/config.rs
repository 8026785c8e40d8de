use mcq_domain::config::{ApiConfig, DatabaseConfig, QuizConfig, SecurityConfig, ServerConfig};
use mcq_domain::constants::{API_PREFIX, AUTH_TAG, ENV_PREFIX, ROLE_ADMIN, ROLE_USER, TOKEN_TYPE};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.address.to_string(), "127.0.0.1");
    assert_eq!(server.port, 8000);
    assert!(server.ssl.is_none());
    assert!(server.allows_any_origin());

    let db = DatabaseConfig::default();
    assert!(db.url.starts_with("mysql://"));
    assert!(db.auto_migrate);
    assert_eq!(db.startup_retries, 3);

    let security = SecurityConfig::default();
    assert_eq!(security.jwt.algorithm, "HS256");
    assert_eq!(security.jwt.expire_minutes, 30);

    let quiz = QuizConfig::default();
    assert_eq!(quiz.default_duration_minutes, 60);
    assert!((quiz.default_max_score - 1.0).abs() < f64::EPSILON);
    assert_eq!(quiz.min_options, 2);
}

#[test]
fn api_config_deserializes_partial_documents() {
    let raw = json!({
        "server": { "address": "0.0.0.0", "port": 9000, "cors_origins": ["https://quiz.example"] },
        "database": { "url": "mysql://u:p@db:3306/mcq", "auto_migrate": false },
        "security": { "jwt": { "secret": "s3cret", "expire_minutes": 5 } },
        "log": { "format": "json" }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 9000);
    assert!(!cfg.server.allows_any_origin());
    assert_eq!(cfg.database.url, "mysql://u:p@db:3306/mcq");
    assert!(!cfg.database.auto_migrate);
    assert_eq!(cfg.database.max_connections, 10);
    assert_eq!(cfg.security.jwt.secret, "s3cret");
    assert_eq!(cfg.security.jwt.algorithm, "HS256");
    assert_eq!(cfg.log.format, "json");
    assert_eq!(cfg.quiz.max_answers_per_submission, 500);
}

#[test]
fn cloned_config_is_copy_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 1234;

    assert_eq!(original.server.port, 8000);
    assert_eq!(changed.server.port, 1234);
}

#[test]
fn constants_match_wire_strings() {
    assert_eq!(API_PREFIX, "/api");
    assert_eq!(AUTH_TAG, "Authentication");
    assert_eq!(ENV_PREFIX, "MCQ");
    assert_eq!(ROLE_USER, "USER");
    assert_eq!(ROLE_ADMIN, "ADMIN");
    assert_eq!(TOKEN_TYPE, "bearer");
}
