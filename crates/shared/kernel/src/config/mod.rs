use config::{Config, Environment, File, FileFormat, Map};
use mcq_domain::config::{ApiConfig, JwtConfig, SecurityConfig};
use mcq_domain::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{info, warn};

/// Custom error type for config loading.
#[mcq_derive::mcq_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Flat legacy variables and the keys they override.
const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET_KEY", "security.jwt.secret"),
    ("JWT_ALGORITHM", "security.jwt.algorithm"),
    ("ADMIN_SECRET_KEY", "security.admin_secret"),
];
const LEGACY_EXPIRE_MINUTES: &str = "ACCESS_TOKEN_EXPIRE_MINUTES";

const JWT_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];
const LOG_FORMATS: &[&str] = &["compact", "pretty", "json"];

/// Loads [`ApiConfig`] from the process environment.
///
/// Shorthand for `ConfigLoader::from_env().load()`.
///
/// # Errors
/// See [`ConfigLoader::load`].
pub fn load_api_config() -> Result<ApiConfig, ConfigError> {
    ConfigLoader::from_env().load()
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest priority first:
/// 1. **Defaults** from [`ApiConfig::default`].
/// 2. **Base File**: an explicit file, the file named by `MCQ_CONFIG` (required), or
///    `mcq.toml` in the working directory (optional).
/// 3. **Environment Overrides**: variables prefixed with `MCQ__`. Nested structures are
///    accessed using double underscores (`MCQ__DATABASE__URL` maps to `database.url`).
/// 4. **Legacy variables**: `DATABASE_URL`, `JWT_SECRET_KEY`, `JWT_ALGORITHM`,
///    `ACCESS_TOKEN_EXPIRE_MINUTES` and `ADMIN_SECRET_KEY`.
///
/// The variables are an explicit map so tests never touch the process environment.
///
/// # Example
/// ```rust
/// use mcq_kernel::config::ConfigLoader;
///
/// let cfg = ConfigLoader::new()
///     .vars([("MCQ__SERVER__PORT", "9000"), ("DATABASE_URL", "mysql://u:p@db:3306/mcq")])
///     .load()
///     .unwrap();
/// assert_eq!(cfg.server.port, 9000);
/// assert_eq!(cfg.database.url, "mysql://u:p@db:3306/mcq");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<(PathBuf, bool)>,
    vars: Map<String, String>,
}

impl ConfigLoader {
    /// A loader without variables. Looks for an optional `mcq.toml` only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader fed with the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new().vars(std::env::vars())
    }

    /// Replaces the variables used for `MCQ__*` and legacy overrides.
    #[must_use]
    pub fn vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Uses an explicit TOML file instead of `MCQ_CONFIG` / `mcq.toml`.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>, required: bool) -> Self {
        self.file = Some((path.into(), required));
        self
    }

    fn resolve_file(&self) -> (PathBuf, bool) {
        if let Some(file) = &self.file {
            return file.clone();
        }
        self.vars
            .get(CONFIG_PATH_ENV)
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| (PathBuf::from(DEFAULT_CONFIG_FILE), false), |p| (PathBuf::from(p), true))
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * [`ConfigError::Config`] if a required file is missing or a value has the wrong shape.
    /// * [`ConfigError::Invalid`] if the values violate the rules in [`validate`].
    pub fn load(&self) -> Result<ApiConfig, ConfigError> {
        let (path, required) = self.resolve_file();
        let env_source = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .source(Some(self.vars.clone()));

        let mut builder = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(env_source);

        for (var, key) in LEGACY_OVERRIDES {
            builder = builder
                .set_override_option(*key, self.var(var))
                .context(format!("Applying {var}"))?;
        }
        let expire_minutes = self
            .var(LEGACY_EXPIRE_MINUTES)
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| ConfigError::Invalid {
                    message: format!("{LEGACY_EXPIRE_MINUTES} must be an integer, got '{raw}'").into(),
                    context: None,
                })
            })
            .transpose()?;
        builder = builder
            .set_override_option("security.jwt.expire_minutes", expire_minutes)
            .context(format!("Applying {LEGACY_EXPIRE_MINUTES}"))?;

        info!(file = %path.display(), required, "Loading configuration");

        let mut config = builder
            .build()
            .context("Failed to build config")?
            .try_deserialize::<ApiConfig>()
            .context("Failed to deserialize config")?;

        config.security.jwt.algorithm = config.security.jwt.algorithm.trim().to_ascii_uppercase();
        config.log.format = config.log.format.trim().to_ascii_lowercase();

        validate(&config)?;
        warn_on_dev_secrets(&config.security);
        Ok(config)
    }
}

/// Rejects configurations the server cannot run with.
///
/// # Errors
/// [`ConfigError::Invalid`] naming the first offending key.
pub fn validate(config: &ApiConfig) -> Result<(), ConfigError> {
    let db = &config.database;
    ensure(db.max_connections > 0, "database.max_connections must be greater than 0")?;
    ensure(
        db.min_connections <= db.max_connections,
        "database.min_connections must not exceed database.max_connections",
    )?;

    let JwtConfig { secret, algorithm, expire_minutes } = &config.security.jwt;
    ensure(!secret.is_empty(), "security.jwt.secret must not be empty")?;
    ensure(
        JWT_ALGORITHMS.contains(&algorithm.as_str()),
        "security.jwt.algorithm must be one of HS256, HS384, HS512",
    )?;
    ensure(*expire_minutes > 0, "security.jwt.expire_minutes must be greater than 0")?;
    ensure(
        (4..=31).contains(&config.security.bcrypt_cost),
        "security.bcrypt_cost must be between 4 and 31",
    )?;

    let quiz = &config.quiz;
    ensure(quiz.default_duration_minutes > 0, "quiz.default_duration_minutes must be greater than 0")?;
    ensure(
        quiz.default_max_score.is_finite() && quiz.default_max_score > 0.0,
        "quiz.default_max_score must be a positive number",
    )?;
    ensure(quiz.min_options >= 2, "quiz.min_options must be at least 2")?;
    ensure(
        quiz.max_answers_per_submission > 0,
        "quiz.max_answers_per_submission must be greater than 0",
    )?;

    ensure(
        LOG_FORMATS.contains(&config.log.format.as_str()),
        "log.format must be one of compact, pretty, json",
    )
}

fn ensure(condition: bool, message: &'static str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid { message: message.into(), context: None })
    }
}

fn warn_on_dev_secrets(security: &SecurityConfig) {
    let defaults = SecurityConfig::default();
    if security.jwt.secret == defaults.jwt.secret {
        warn!("security.jwt.secret uses the built-in development value; set JWT_SECRET_KEY");
    }
    if security.admin_secret == defaults.admin_secret {
        warn!("security.admin_secret uses the built-in development value; set ADMIN_SECRET_KEY");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_validation() {
        validate(&ApiConfig::default()).unwrap();
    }

    #[test]
    fn test_validation_names_offending_key() {
        let mut cfg = ApiConfig::default();
        cfg.security.jwt.algorithm = "RS256".into();
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("security.jwt.algorithm"));

        let mut cfg = ApiConfig::default();
        cfg.database.min_connections = 20;
        assert!(validate(&cfg).unwrap_err().to_string().contains("database.min_connections"));
    }
}
