use mcq_kernel::config::{ConfigError, ConfigLoader};
use std::io::Write;
use std::sync::{Arc, Mutex};

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_without_file_or_vars() {
    let cfg = ConfigLoader::new().file("does-not-exist.toml", false).load().unwrap();
    assert_eq!(cfg.server.port, 8000);
    assert_eq!(cfg.security.jwt.algorithm, "HS256");
    assert!(cfg.database.auto_migrate);
}

#[test]
fn file_then_env_then_legacy() {
    let file = toml_file(
        r#"
        [server]
        port = 7000
        cors_origins = ["https://a.example"]

        [database]
        url = "mysql://file:file@db:3306/mcq"
        max_connections = 4

        [security.jwt]
        secret = "from-file"
        "#,
    );

    let cfg = ConfigLoader::new()
        .file(file.path(), true)
        .vars([
            ("MCQ__SERVER__PORT", "9000"),
            ("MCQ__DATABASE__URL", "mysql://env:env@db:3306/mcq"),
            ("MCQ__SERVER__CORS_ORIGINS", "https://b.example,https://c.example"),
            ("DATABASE_URL", "mysql://legacy:legacy@db:3306/mcq"),
            ("JWT_ALGORITHM", "hs512"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "15"),
            ("ADMIN_SECRET_KEY", "letmein"),
        ])
        .load()
        .unwrap();

    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.cors_origins, vec!["https://b.example", "https://c.example"]);
    assert_eq!(cfg.database.url, "mysql://legacy:legacy@db:3306/mcq");
    assert_eq!(cfg.database.max_connections, 4);
    assert_eq!(cfg.security.jwt.secret, "from-file");
    assert_eq!(cfg.security.jwt.algorithm, "HS512");
    assert_eq!(cfg.security.jwt.expire_minutes, 15);
    assert_eq!(cfg.security.admin_secret, "letmein");
}

#[test]
fn config_path_variable_makes_file_required() {
    let err = ConfigLoader::new().vars([("MCQ_CONFIG", "/definitely/missing/mcq.toml")]).load();
    assert!(matches!(err, Err(ConfigError::Config { .. })));
}

#[test]
fn config_path_variable_is_honoured() {
    let file = toml_file("[quiz]\nmin_options = 3\n");
    let path = file.path().to_string_lossy().into_owned();

    let cfg = ConfigLoader::new().vars([("MCQ_CONFIG", path)]).load().unwrap();
    assert_eq!(cfg.quiz.min_options, 3);
}

#[test]
fn invalid_legacy_values_are_rejected() {
    let err = ConfigLoader::new()
        .file("does-not-exist.toml", false)
        .vars([("ACCESS_TOKEN_EXPIRE_MINUTES", "soon")])
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("ACCESS_TOKEN_EXPIRE_MINUTES"));

    let err = ConfigLoader::new()
        .file("does-not-exist.toml", false)
        .vars([("JWT_ALGORITHM", "RS256")])
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn blank_legacy_values_are_ignored() {
    let cfg = ConfigLoader::new()
        .file("does-not-exist.toml", false)
        .vars([("DATABASE_URL", "  ")])
        .load()
        .unwrap();
    assert!(cfg.database.url.starts_with("mysql://"));
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn load_logged(loader: &ConfigLoader) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    mcq_logger::bootstrap_with_writer(move || writer.clone(), || loader.load().unwrap());
    String::from_utf8(captured.0.lock().unwrap().clone()).unwrap()
}

#[test]
fn development_secrets_are_reported_while_loading() {
    let output = load_logged(&ConfigLoader::new().file("does-not-exist.toml", false));

    assert!(output.contains("Loading configuration"), "{output}");
    assert!(output.contains("security.jwt.secret uses the built-in development value"), "{output}");
    assert!(output.contains("security.admin_secret uses the built-in development value"), "{output}");
}

#[test]
fn configured_secrets_are_not_reported() {
    let loader = ConfigLoader::new()
        .file("does-not-exist.toml", false)
        .vars([("JWT_SECRET_KEY", "a-real-secret"), ("ADMIN_SECRET_KEY", "another-real-secret")]);
    let output = load_logged(&loader);

    assert!(!output.contains("development value"), "{output}");
}
