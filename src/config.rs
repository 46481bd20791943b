/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Policy 設定など)
 * - 必須の設定値のバリデーション (不足なら起動失敗)
 * - PolicyConfig は全て任意: 未設定 = その機能は無効
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
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
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

#[derive(Debug)]
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

/// Resolver policy, read once at startup and passed explicitly into the
/// login service. All fields are optional: an unset variable disables the
/// associated check or strategy. No validation is performed beyond parsing.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
    pub check_issuer: bool,
    pub expected_issuer: Option<String>,
    pub check_client: bool,
    pub expected_client_id: Option<String>,
    pub assign_random_password: bool,
    pub use_edipi_number: bool,
    pub edipi_property_name: Option<String>,
    pub username_property_name: Option<String>,
}

impl PolicyConfig {
    pub fn from_env() -> Self {
        Self {
            check_issuer: env_flag("CHECK_ISSUER"),
            expected_issuer: env_opt("EXPECTED_ISSUER"),
            check_client: env_flag("CHECK_CLIENT"),
            expected_client_id: env_opt("EXPECTED_CLIENT_ID"),
            assign_random_password: env_flag("ASSIGN_RANDOM_PASSWORD"),
            use_edipi_number: env_flag("USE_EDIPI_NUMBER"),
            edipi_property_name: env_opt("EDIPI_PROPERTY_NAME"),
            username_property_name: env_opt("USERNAME_PROPERTY_NAME"),
        }
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub policy: PolicyConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let policy = PolicyConfig::from_env();

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            policy,
        })
    }
}

// Bool-like env var: "1" / "true" / "yes" / "on" (case-insensitive) are truthy.
// Absent or anything else is falsy, i.e. the feature stays disabled.
fn env_flag(key: &str) -> bool {
    std::env::var(key).map(|v| is_truthy(&v)).unwrap_or(false)
}

// Optional string env var; empty counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
