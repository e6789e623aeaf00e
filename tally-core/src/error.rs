pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Occurs when `tally.toml` fails to load.
    #[error("failed to load tally.toml: {0}")]
    LoadError(String),
    /// Occurs when a configuration value cannot be interpreted.
    #[error("invalid value for \"{key}\": {reason}")]
    ValueError { key: String, reason: String },
}
