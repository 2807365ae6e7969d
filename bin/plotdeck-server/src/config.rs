//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for plotdeck-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// Directory holding the uploaded CSV datasets.
    pub data_dir: String,

    /// Directory the rendered chart PNGs are written to and served from.
    pub artifacts_dir: String,

    /// Chat-completions endpoint URL.
    pub api_url: String,

    /// API key from the process environment. Takes precedence over the
    /// key in the credential file.
    pub api_key: Option<String>,

    /// Path of the YAML credential file managed by `/config/openai-key`.
    pub credentials_path: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origin allow-list; `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui`. Disable in production to avoid
    /// exposing the API structure.
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("PLOTDECK_BIND", "0.0.0.0:8000"),
            data_dir: env_or("PLOTDECK_DATA_DIR", "data"),
            artifacts_dir: env_or("PLOTDECK_ARTIFACTS_DIR", "plots"),
            api_url: env_or(
                "PLOTDECK_API_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            api_key: std::env::var("PLOTDECK_OPENAI_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),
            credentials_path: env_or("PLOTDECK_CREDENTIALS", "credentials.yaml"),
            log_level: env_or("PLOTDECK_LOG", "info"),
            log_json: std::env::var("PLOTDECK_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cors_allowed_origins: std::env::var("PLOTDECK_CORS_ORIGINS").ok(),
            enable_swagger: std::env::var("PLOTDECK_ENABLE_SWAGGER")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
