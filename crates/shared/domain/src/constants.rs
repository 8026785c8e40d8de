//! Names shared across crates: `OpenAPI` tags, route prefixes and configuration keys.

pub const SYSTEM_TAG: &str = "System";
pub const AUTH_TAG: &str = "Authentication";
pub const TEST_PAPERS_TAG: &str = "Test Papers";
pub const QUESTIONS_TAG: &str = "Questions";
pub const RESULTS_TAG: &str = "Results";

/// Prefix for all feature routes.
pub const API_PREFIX: &str = "/api";

/// Environment prefix for layered configuration (`MCQ__SERVER__PORT`).
pub const ENV_PREFIX: &str = "MCQ";
/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "MCQ_CONFIG";
/// Configuration file looked up in the working directory when `MCQ_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "mcq.toml";

pub const ROLE_USER: &str = "USER";
pub const ROLE_ADMIN: &str = "ADMIN";

/// `token_type` returned with every access token.
pub const TOKEN_TYPE: &str = "bearer";
