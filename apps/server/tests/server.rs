use mcq::domain::config::ApiConfig;
use mcq_server::{Server, load_env_file};
use std::io::Write;

fn degraded_config(url: &str) -> ApiConfig {
    let mut config = ApiConfig::default();
    config.database.url = url.to_owned();
    config.database.startup_retries = 0;
    config
}

#[tokio::test]
async fn malformed_database_url_starts_degraded() {
    let server = Server::builder().config(degraded_config("postgres://elsewhere/db")).build().await.unwrap();

    assert!(!server.state().database.is_ready());
    assert!(server.state().database.connection().is_err());
}

#[tokio::test]
async fn empty_database_url_starts_degraded() {
    let server = Server::builder().config(degraded_config("")).build().await.unwrap();
    assert!(!server.state().database.is_ready());
}

#[tokio::test]
async fn missing_certificate_fails_the_build() {
    let mut config = degraded_config("not-a-url");
    config.server.ssl = Some(mcq::domain::config::SslConfig {
        cert: "/nonexistent/cert.pem".into(),
        key: "/nonexistent/key.pem".into(),
    });

    let err = Server::builder().config(config).build().await.unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}

#[tokio::test]
async fn slices_are_registered() {
    let server = Server::builder().config(degraded_config("not-a-url")).build().await.unwrap();
    let mut names: Vec<&str> = server.state().slice_names().collect();
    names.sort_unstable();
    assert_eq!(names, ["identity", "questions", "results", "test_papers"]);
}

fn env_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn missing_env_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!load_env_file(dir.path().join(".env")).unwrap());
}

#[test]
fn env_file_values_reach_the_environment() {
    let file = env_file("MCQ_SERVER_TEST_ENV_FILE=loaded\n");
    assert!(load_env_file(file.path()).unwrap());
    assert_eq!(std::env::var("MCQ_SERVER_TEST_ENV_FILE").unwrap(), "loaded");
}

#[test]
fn malformed_env_file_is_an_error() {
    let file = env_file("MCQ_SERVER_TEST_BROKEN has no equals sign\n");
    let err = load_env_file(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("Failed to load"), "{err}");
}
