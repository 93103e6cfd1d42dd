use std::fmt;

/// Opaque job identifier issued by the backend at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identity of one scheduled poll timer. A fresh handle is minted on every
/// poller start, so ticks from a cancelled timer never match the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PollHandle(pub u64);

/// Identity of one job-creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaunchTicket(pub u64);

/// Backend-reported job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Error,
}

impl JobStatus {
    /// Maps a wire status string. `failed` is accepted as an alias of
    /// `error`; unknown values are treated as still pending.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "error" | "failed" => JobStatus::Error,
            _ => JobStatus::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// One scraped entry. Every field is an opaque display string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    pub name: Option<String>,
    pub price: Option<String>,
    pub link: Option<String>,
    pub rating: Option<String>,
    pub sales_count: Option<String>,
}

/// One successful status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: JobStatus,
    pub message: Option<String>,
    /// Advisory percentage; `None` renders as 0.
    pub progress: Option<u8>,
    /// Present only when the job completed.
    pub items: Option<Vec<Item>>,
}

impl StatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            message: None,
            progress: None,
            items: None,
        }
    }
}

/// One selectable data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub key: String,
    pub name: String,
}

impl Site {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Parameters of a job-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub site: String,
    pub query: String,
}

/// What the user searched for; drives the result summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    pub site_key: String,
    pub site_name: String,
    pub term: String,
}
