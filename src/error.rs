use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the application shell
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load help text from {}: {source}", path.display())]
    HelpAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
