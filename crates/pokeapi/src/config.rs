use std::time::Duration;

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Gateway configuration loaded from environment variables.
///
/// All fields have defaults that talk to the public PokéAPI.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API root without a trailing slash (default: [`DEFAULT_BASE_URL`]).
    pub base_url: String,
    /// Deadline for each individual request (default: 10 s).
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("pokedex/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `POKEAPI_BASE_URL`     | `https://pokeapi.co/api/v2`  |
    /// | `POKEAPI_TIMEOUT_SECS` | `10`                         |
    ///
    /// Unparsable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("POKEAPI_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = match std::env::var("POKEAPI_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "POKEAPI_TIMEOUT_SECS must be a positive integer, using default"
                    );
                    defaults.timeout
                }
            },
            Err(_) => defaults.timeout,
        };

        Self {
            base_url,
            timeout,
            user_agent: defaults.user_agent,
        }
    }
}
