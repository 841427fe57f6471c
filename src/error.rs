use std::path::PathBuf;

use thiserror::Error;

use crate::{
    config::ConfigError, database::client::ReferenceError, model::pipeline::SubmissionError, render::RenderError
};

/// Failures that end a command line run.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server failed: {0}")]
    Server(#[source] std::io::Error)
}
