/*
 * Responsibility
 * - 環境変数や設定の読み込み (署名 secret, 公開ルート, HTTP 上限値など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ読む (hot reload なし)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_PUBLIC_ROUTES: &str = "/,/api-docs,/health";
// jsonwebtoken subtracts the leeway from the current time
const MAX_LEEWAY_SECONDS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
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

    // HS256 verification secret
    pub access_token_secret: String,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    // ordered public route specifiers, compiled once by the auth factory
    pub public_routes: Vec<String>,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_audience", &self.auth_audience)
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("public_routes", &self.public_routes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (process env in production, a closure in tests).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let access_token_secret =
            var("ACCESS_TOKEN_SECRET").ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;
        if access_token_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_SECRET"));
        }

        let auth_issuer = var("AUTH_ISSUER").filter(|s| !s.trim().is_empty());
        let auth_audience = var("AUTH_AUDIENCE").filter(|s| !s.trim().is_empty());

        let access_token_leeway_seconds = match var("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v <= MAX_LEEWAY_SECONDS)
                .ok_or(ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let public_routes = var("PUBLIC_ROUTES")
            .unwrap_or_else(|| DEFAULT_PUBLIC_ROUTES.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout_seconds = var("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(30);

        let request_body_limit_bytes = var("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024); // 1 MiB

        Ok(Self {
            addr,
            app_env,
            access_token_secret,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            public_routes,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = config(&[("ACCESS_TOKEN_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.public_routes, vec!["/", "/api-docs", "/health"]);
        assert_eq!(config.access_token_leeway_seconds, 0);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
        assert!(config.auth_issuer.is_none());
        assert!(config.auth_audience.is_none());
    }

    #[test]
    fn secret_is_required_and_non_empty() {
        assert_eq!(
            config(&[]).unwrap_err(),
            ConfigError::Missing("ACCESS_TOKEN_SECRET")
        );
        assert_eq!(
            config(&[("ACCESS_TOKEN_SECRET", "  ")]).unwrap_err(),
            ConfigError::Invalid("ACCESS_TOKEN_SECRET")
        );
    }

    #[test]
    fn public_routes_keep_order_and_drop_blanks() {
        let config = config(&[
            ("ACCESS_TOKEN_SECRET", "s"),
            ("PUBLIC_ROUTES", " /docs , ,/, /auth/login"),
        ])
        .unwrap();
        assert_eq!(config.public_routes, vec!["/docs", "/", "/auth/login"]);
    }

    #[test]
    fn invalid_port_fails() {
        assert_eq!(
            config(&[("ACCESS_TOKEN_SECRET", "s"), ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
    }

    #[test]
    fn leeway_must_parse_and_stay_bounded() {
        let ok = config(&[("ACCESS_TOKEN_SECRET", "s"), ("ACCESS_TOKEN_LEEWAY_SECONDS", "300")]);
        assert_eq!(ok.unwrap().access_token_leeway_seconds, 300);

        for value in ["301", "18446744073709551615", "-1", "soon"] {
            assert_eq!(
                config(&[("ACCESS_TOKEN_SECRET", "s"), ("ACCESS_TOKEN_LEEWAY_SECONDS", value)])
                    .unwrap_err(),
                ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"),
                "{value}"
            );
        }
    }

    #[test]
    fn production_env_is_recognized() {
        let config = config(&[("ACCESS_TOKEN_SECRET", "s"), ("APP_ENV", "PROD")]).unwrap();
        assert!(config.app_env.is_production());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = config(&[("ACCESS_TOKEN_SECRET", "do-not-print")]).unwrap();
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
