use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomebaseError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse session config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
    #[error("output directory {} is unusable: {reason}", path.display())]
    OutputDir { path: PathBuf, reason: String },
}

impl HomebaseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = core::result::Result<T, HomebaseError>;
