/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Base URL of the workflow API. `None` selects the in-memory backend.
    pub workflow_api_url: Option<String>,
    /// Bearer token for the workflow API.
    pub workflow_api_token: Option<String>,
    /// Sessions not edited for this long are evicted (default: `3600`).
    pub session_idle_ttl_secs: u64,
    /// Interval between idle-session sweeps (default: `60`).
    pub session_sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `WORKFLOW_API_URL`     | unset (in-memory backend)  |
    /// | `WORKFLOW_API_TOKEN`   | unset                      |
    /// | `SESSION_IDLE_TTL_SECS`| `3600`                     |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `60`                |
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

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let session_idle_ttl_secs: u64 = std::env::var("SESSION_IDLE_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_IDLE_TTL_SECS must be a valid u64");

        let session_sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64");

        let workflow_api_url = non_empty_var("WORKFLOW_API_URL");
        let workflow_api_token = non_empty_var("WORKFLOW_API_TOKEN");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            workflow_api_url,
            workflow_api_token,
            session_idle_ttl_secs,
            session_sweep_interval_secs,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
