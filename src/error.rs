// Error taxonomy shared by the cloud client and the resource scaffolder.
// The binary wraps these in `anyhow` for printing; library callers can
// match on the variants.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ToolboxError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ToolboxError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server rejected the credentials or the session token.
    #[error("not authorized ({status}): {body}")]
    Unauthorized { status: StatusCode, body: String },

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{reason} at {}", path.display())]
    File { path: PathBuf, reason: String },

    #[error("No Package.swift found in {}. Are you in a Vapor project?", dir.display())]
    NotAProject { dir: PathBuf },

    #[error("resource name must not be empty")]
    InvalidResourceName,

    #[error("credential cannot be sent as a header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// No server contract is documented for this operation yet.
    #[error("{0} is not supported yet")]
    Unspecified(&'static str),
}

impl ToolboxError {
    /// Build the error for a non-success response, splitting out auth failures.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ToolboxError::Unauthorized { status, body }
            }
            _ => ToolboxError::Status { status, body },
        }
    }
}
