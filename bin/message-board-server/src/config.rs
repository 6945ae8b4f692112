//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for message-board-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// SQLite database URL (default: `"sqlite://data.sqlite"`, relative to
    /// the working directory). The file is created if it does not exist.
    pub database_url: String,

    /// Upper bound on pooled SQLite connections. Ignored for in-memory
    /// databases, which always use a single connection.
    pub db_max_connections: u32,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins; `None` allows any.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,

    /// Largest request body accepted before answering `413`.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bind_address: lookup("MSGBOARD_BIND").unwrap_or_else(|| "0.0.0.0:3000".to_owned()),
            database_url: lookup("MSGBOARD_DATABASE_URL")
                .unwrap_or_else(|| "sqlite://data.sqlite".to_owned()),
            db_max_connections: parse_or(lookup("MSGBOARD_DB_MAX_CONNECTIONS"), 5),
            log_level: lookup("MSGBOARD_LOG").unwrap_or_else(|| "info".to_owned()),
            log_json: lookup("MSGBOARD_LOG_JSON").map(|v| is_truthy(&v)).unwrap_or(false),
            cors_allowed_origins: lookup("MSGBOARD_CORS_ORIGINS").filter(|v| !v.trim().is_empty()),
            enable_swagger: lookup("MSGBOARD_ENABLE_SWAGGER").map(|v| is_truthy(&v)).unwrap_or(true),
            max_body_bytes: parse_or(lookup("MSGBOARD_MAX_BODY_BYTES"), 64 * 1024),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn is_truthy(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}
