use std::fmt;

use thiserror::Error;

use crate::text;

/// Every way an operation can end badly. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// A required form field was empty; no request was made.
    #[error("{}", text::VALIDATION_MESSAGE)]
    Validation,
    /// The creation request was rejected or returned no job id.
    #[error("Erro: {0}")]
    Launch(String),
    /// A status check could not be fetched or parsed.
    #[error("{}", text::CONNECTIVITY_MESSAGE)]
    PollTransport,
    /// The backend reported the job as failed.
    #[error("{0}")]
    Job(String),
    /// The job completed with zero items.
    #[error("{}", text::EMPTY_RESULT_MESSAGE)]
    EmptyResult,
    /// The artifact could not be downloaded or saved.
    #[error("{}", text::DOWNLOAD_ERROR_MESSAGE)]
    Download,
}

/// Rejected job creation, carrying the backend detail when there was one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct LaunchError {
    pub detail: Option<String>,
}

impl LaunchError {
    pub fn new(detail: Option<String>) -> Self {
        Self { detail }
    }

    pub fn user_message(&self) -> &str {
        match self.detail.as_deref().map(str::trim) {
            Some(detail) if !detail.is_empty() => detail,
            _ => text::LAUNCH_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl From<LaunchError> for Failure {
    fn from(err: LaunchError) -> Self {
        Failure::Launch(err.user_message().to_string())
    }
}

/// A status check that never produced a usable report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status check failed: {reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A download that did not end with a saved artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("download failed: {reason}")]
pub struct DownloadError {
    pub reason: String,
}

impl DownloadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
