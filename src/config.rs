/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, JWT_SECRET, HTTP limits など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は immutable。secret は Config → TokenCodec へ一度だけ渡す
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub jwt_secret: String,
    pub jwt_expiration_seconds: i64,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the database url (credentials) or the jwt secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_expiration_seconds", &self.jwt_expiration_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key)),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(get("PORT"), "PORT", 8080)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections =
            parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 5)?;

        let jwt_secret = get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration_seconds: i64 = parse_or(
            get("JWT_EXPIRATION_IN_SECONDS"),
            "JWT_EXPIRATION_IN_SECONDS",
            3600 * 24 * 7,
        )?;

        let request_timeout_seconds =
            parse_or(get("REQUEST_TIMEOUT_SECONDS"), "REQUEST_TIMEOUT_SECONDS", 30)?;
        let request_body_limit_bytes = parse_or(
            get("REQUEST_BODY_LIMIT_BYTES"),
            "REQUEST_BODY_LIMIT_BYTES",
            1024 * 1024,
        )?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_expiration_seconds,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = Config::from_source(source(&[
            ("DATABASE_URL", "postgres://localhost/shop"),
            ("JWT_SECRET", "s3cr3t"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.jwt_expiration_seconds, 604_800);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn secret_is_required_and_non_empty() {
        let err = Config::from_source(source(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = Config::from_source(source(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", ""),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = Config::from_source(source(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("JWT_EXPIRATION_IN_SECONDS", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWT_EXPIRATION_IN_SECONDS"));
    }

    #[test]
    fn production_env_and_debug_redaction() {
        let config = Config::from_source(source(&[
            ("DATABASE_URL", "postgres://user:pw@db/shop"),
            ("JWT_SECRET", "very-secret"),
            ("APP_ENV", "PROD"),
            ("PORT", "9000"),
        ]))
        .unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(config.addr.port(), 9000);

        let out = format!("{config:?}");
        assert!(!out.contains("very-secret"));
        assert!(!out.contains("user:pw"));
    }
}
