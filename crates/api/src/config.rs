use crate::auth::jwt::JwtConfig;

/// Default base URL of the prediction model service.
const DEFAULT_ML_BASE_URL: &str = "http://localhost:5000";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener closes.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub ml: MlConfig,
    /// Period of the event status reconciler in seconds (default: `300`).
    pub status_reconcile_interval_secs: u64,
}

/// Where the prediction model lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct MlConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                  |
    /// |----------------------------------|--------------------------|
    /// | `HOST`                           | `0.0.0.0`                |
    /// | `PORT`                           | `3000`                   |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`          | `30`                     |
    /// | `ML_BASE_URL`                    | `http://localhost:5000`  |
    /// | `ML_TIMEOUT_SECS`                | `10`                     |
    /// | `STATUS_RECONCILE_INTERVAL_SECS` | `300`                    |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable does not parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let ml = MlConfig {
            base_url: std::env::var("ML_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ML_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: env_u64("ML_TIMEOUT_SECS", 10),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_u64("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_u64("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            ml,
            status_reconcile_interval_secs: env_u64("STATUS_RECONCILE_INTERVAL_SECS", 300),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}
