use pokedex_pokeapi::error::GatewayError;

/// Failures that end the process. Everything else is rendered as a view.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Bad command line; exits with status 2.
    #[error("{0}")]
    Usage(String),

    #[error("Gateway setup failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
