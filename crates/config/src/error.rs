use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config at {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Remote schema `{0}` is not supported; point the config at a local SDL or introspection file")]
    RemoteSchema(String),

    #[error("Invalid schema pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Schema pointer `{pattern}` did not match any file in {}", base.display())]
    SchemaNotFound { pattern: String, base: PathBuf },
}
