use std::path::PathBuf;
use std::time::Duration;

use pokedex_core::compose::DEFAULT_PAGE_SIZE;
use pokedex_core::debounce::DEFAULT_DEBOUNCE;
use pokedex_core::favorites::FAVORITES_KEY;
use pokedex_pokeapi::config::GatewayConfig;

/// Front-end configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub gateway: GatewayConfig,
    /// Entries per page (default: 20).
    pub page_size: usize,
    /// JSON file holding the favorites set (default: `pokemon-favorites.json`).
    pub favorites_path: PathBuf,
    /// Quiet period before typed search input is applied (default: 800 ms).
    pub debounce: Duration,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `POKEDEX_PAGE_SIZE`      | `20`                     |
    /// | `POKEDEX_FAVORITES_PATH` | `pokemon-favorites.json` |
    /// | `POKEDEX_DEBOUNCE_MS`    | `800`                    |
    ///
    /// Gateway variables are documented on [`GatewayConfig::from_env`].
    pub fn from_env() -> Self {
        let page_size = positive_env("POKEDEX_PAGE_SIZE")
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let favorites_path = std::env::var("POKEDEX_FAVORITES_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{FAVORITES_KEY}.json")));

        let debounce = positive_env("POKEDEX_DEBOUNCE_MS")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE);

        Self {
            gateway: GatewayConfig::from_env(),
            page_size,
            favorites_path,
            debounce,
        }
    }
}

/// A positive integer from `var`, or `None` (with a warning when set but
/// unusable).
fn positive_env(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!(var, value = %raw, "Expected a positive integer, using default");
            None
        }
    }
}
