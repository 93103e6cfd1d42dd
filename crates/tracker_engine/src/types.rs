use std::path::PathBuf;

use thiserror::Error;

use crate::wire::{JobStatusBody, SiteEntry};

/// Identity of one recurring poll timer.
pub type TimerId = u64;

/// Identity of one creation request, echoed back in its event.
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SitesListed(Result<Vec<SiteEntry>, ApiError>),
    JobCreated {
        ticket: Ticket,
        result: Result<String, ApiError>,
    },
    StatusFetched {
        job_id: String,
        result: Result<JobStatusBody, ApiError>,
    },
    ArtifactSaved {
        job_id: String,
        result: Result<PathBuf, ApiError>,
    },
    TimerFired {
        timer: TimerId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("http status {status}")]
    HttpStatus { status: u16, detail: Option<String> },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("response carried no job id")]
    MissingJobId,
    #[error("could not save artifact: {0}")]
    Persist(String),
}

impl ApiError {
    /// Backend-provided explanation, when the server sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
