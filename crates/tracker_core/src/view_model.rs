use std::path::PathBuf;

use crate::{text, Failure, JobId, JobStatus, PollHandle, ResultsView};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub sites: Vec<SiteOptionView>,
    pub selected_site: Option<String>,
    pub search_term: String,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    /// Status surface; `None` means hidden.
    pub tracking: Option<TrackingView>,
    /// Results surface; `None` means hidden.
    pub results: Option<ResultsView>,
    pub download_enabled: bool,
    pub download_label: &'static str,
    pub outcome: Option<Outcome>,
    pub current_job_id: Option<JobId>,
    pub active_poll: Option<PollHandle>,
    pub last_download: Option<PathBuf>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOptionView {
    /// Empty for the placeholder entry.
    pub key: String,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingView {
    pub job_id: JobId,
    pub indicator: StatusIndicator,
    pub progress: u8,
    pub details: String,
    /// Replaces the details when the job ended badly.
    pub error: Option<String>,
}

impl TrackingView {
    pub(crate) fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            indicator: StatusIndicator::Pending,
            progress: 0,
            details: text::DETAILS_DEFAULT.to_string(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusIndicator {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
}

impl StatusIndicator {
    pub fn label(self) -> &'static str {
        match self {
            StatusIndicator::Pending => text::STATUS_PENDING,
            StatusIndicator::Running => text::STATUS_RUNNING,
            StatusIndicator::Completed => text::STATUS_COMPLETED,
            StatusIndicator::Error => text::STATUS_ERROR,
        }
    }
}

impl From<JobStatus> for StatusIndicator {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Pending => StatusIndicator::Pending,
            JobStatus::Running => StatusIndicator::Running,
            JobStatus::Completed => StatusIndicator::Completed,
            JobStatus::Error => StatusIndicator::Error,
        }
    }
}

/// How the last tracked job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed { job_id: JobId, row_count: usize },
    Failed(Failure),
}
