use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::assessment::{PolicyError, RiskPolicy};

const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let cors_origins = match env::var("APP_CORS_ORIGINS") {
            Ok(raw) => CorsOrigins::parse(&raw)?,
            Err(_) => CorsOrigins::Any,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let history_limit = match env::var("APP_HISTORY_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidHistoryLimit)?,
            Err(_) => DEFAULT_HISTORY_LIMIT,
        };

        let policy_path = env::var("APP_POLICY_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentConfig {
                policy_path,
                history_limit,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: CorsOrigins,
}

/// Browser origins allowed to call the API cross-origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// `*` or an empty value allows any origin; otherwise a comma separated list of
    /// `http(s)://host[:port]` origins.
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::Any);
        }

        let mut origins = Vec::new();
        for origin in trimmed.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            let printable = origin.bytes().all(|b| b.is_ascii_graphic());
            if !scheme_ok || !printable || origin.ends_with('/') {
                return Err(ConfigError::InvalidCorsOrigin(origin.to_string()));
            }
            origins.push(origin.to_string());
        }
        Ok(Self::List(origins))
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the risk policy comes from and how much history the service keeps.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub policy_path: Option<PathBuf>,
    pub history_limit: usize,
}

impl AssessmentConfig {
    /// Load the policy file when configured, otherwise the built-in defaults.
    pub fn risk_policy(&self) -> Result<RiskPolicy, ConfigError> {
        let policy = match &self.policy_path {
            Some(path) => read_policy(path)?,
            None => RiskPolicy::default(),
        };
        policy.validate().map_err(ConfigError::Policy)?;
        Ok(policy)
    }
}

fn read_policy(path: &Path) -> Result<RiskPolicy, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PolicyRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::PolicyParse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidHistoryLimit,
    InvalidCorsOrigin(String),
    PolicyRead {
        path: PathBuf,
        source: std::io::Error,
    },
    PolicyParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Policy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidHistoryLimit => {
                write!(f, "APP_HISTORY_LIMIT must be a positive integer")
            }
            ConfigError::InvalidCorsOrigin(origin) => write!(
                f,
                "APP_CORS_ORIGINS entry '{origin}' must look like http(s)://host[:port]"
            ),
            ConfigError::PolicyRead { path, .. } => {
                write!(f, "unable to read risk policy {}", path.display())
            }
            ConfigError::PolicyParse { path, .. } => {
                write!(f, "risk policy {} is not valid JSON", path.display())
            }
            ConfigError::Policy(err) => write!(f, "invalid risk policy: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidHistoryLimit
            | ConfigError::InvalidCorsOrigin(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::PolicyRead { source, .. } => Some(source),
            ConfigError::PolicyParse { source, .. } => Some(source),
            ConfigError::Policy(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_HISTORY_LIMIT");
        env::remove_var("APP_POLICY_PATH");
        env::remove_var("APP_CORS_ORIGINS");
    }

    fn policy_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("loan-risk-{}-{name}.json", std::process::id()));
        std::fs::write(&path, contents).expect("policy file written");
        path
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.assessment.history_limit, 10);
        assert!(config.assessment.policy_path.is_none());
        assert_eq!(config.server.cors_origins, CorsOrigins::Any);
    }

    #[test]
    fn reads_cors_origin_list() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "APP_CORS_ORIGINS",
            "http://localhost:3000, https://loans.example.com",
        );
        let config = AppConfig::load();
        reset_env();

        let config = config.expect("config loads");
        assert_eq!(
            config.server.cors_origins,
            CorsOrigins::List(vec![
                "http://localhost:3000".to_string(),
                "https://loans.example.com".to_string(),
            ])
        );
    }

    #[test]
    fn rejects_cors_origin_without_scheme() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_CORS_ORIGINS", "localhost:3000");
        let result = AppConfig::load();
        reset_env();
        match result {
            Err(ConfigError::InvalidCorsOrigin(origin)) => assert_eq!(origin, "localhost:3000"),
            other => panic!("expected cors origin error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 5000));
    }

    #[test]
    fn rejects_zero_history_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HISTORY_LIMIT", "0");
        let result = AppConfig::load();
        reset_env();
        assert!(matches!(result, Err(ConfigError::InvalidHistoryLimit)));
    }

    #[test]
    fn partial_policy_file_fills_from_defaults() {
        let path = policy_file("partial", r#"{ "eligibility_threshold": 45.0 }"#);
        let config = AssessmentConfig {
            policy_path: Some(path.clone()),
            history_limit: 10,
        };

        let policy = config.risk_policy().expect("policy loads");
        std::fs::remove_file(path).ok();

        assert_eq!(policy.eligibility_threshold, 45.0);
        assert_eq!(policy.loan_terms, RiskPolicy::default().loan_terms);
        assert_eq!(policy.weights, RiskPolicy::default().weights);
    }

    #[test]
    fn policy_file_with_unbalanced_weights_is_rejected() {
        let path = policy_file(
            "unbalanced",
            r#"{ "weights": { "credit": 0.9, "debt": 0.9 } }"#,
        );
        let config = AssessmentConfig {
            policy_path: Some(path.clone()),
            history_limit: 10,
        };

        let result = config.risk_policy();
        std::fs::remove_file(path).ok();

        assert!(matches!(
            result,
            Err(ConfigError::Policy(PolicyError::WeightSum(_)))
        ));
    }

    #[test]
    fn missing_policy_file_reports_path() {
        let config = AssessmentConfig {
            policy_path: Some(PathBuf::from("/nonexistent/loan-risk-policy.json")),
            history_limit: 10,
        };

        match config.risk_policy() {
            Err(err @ ConfigError::PolicyRead { .. }) => {
                assert!(err.to_string().contains("loan-risk-policy.json"));
            }
            other => panic!("expected policy read error, got {other:?}"),
        }
    }
}
