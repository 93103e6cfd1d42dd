use std::path::PathBuf;

use crate::{
    DownloadError, JobId, LaunchError, LaunchTicket, PollHandle, Site, StatusReport,
    TransportError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The page is up; the catalog should be fetched.
    PageLoaded,
    /// Catalog fetch finished. `Err` carries the reason for logs only.
    SitesLoaded(Result<Vec<Site>, String>),
    /// User picked a source (empty string clears the choice).
    SiteSelected(String),
    /// User edited the search box.
    SearchTermChanged(String),
    /// User clicked the submit button.
    SubmitClicked,
    /// Creation request finished.
    JobCreated {
        ticket: LaunchTicket,
        result: Result<JobId, LaunchError>,
    },
    /// A poll timer fired.
    PollTick { handle: PollHandle },
    /// A status check finished.
    StatusFetched {
        job_id: JobId,
        result: Result<StatusReport, TransportError>,
    },
    /// User clicked the download button.
    DownloadClicked,
    /// Artifact request finished; `Ok` carries where it was saved.
    DownloadFinished {
        job_id: JobId,
        result: Result<PathBuf, DownloadError>,
    },
    /// User asked for a fresh search.
    NewSearchClicked,
    /// The page is being torn down.
    PageUnloaded,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
