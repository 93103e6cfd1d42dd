use std::time::Duration;

use crate::{JobId, LaunchRequest, LaunchTicket, PollHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the source catalog.
    LoadSites,
    /// Submit a job-creation request.
    CreateJob {
        ticket: LaunchTicket,
        request: LaunchRequest,
    },
    /// Schedule recurring `Msg::PollTick { handle }` every `period`.
    StartTimer { handle: PollHandle, period: Duration },
    /// Stop the timer behind `handle`; it must not tick again.
    CancelTimer { handle: PollHandle },
    /// Request the status of `job_id` once.
    FetchStatus { job_id: JobId },
    /// Request the artifact for `job_id` and save it as `filename`.
    DownloadArtifact { job_id: JobId, filename: String },
    /// Blocking notice for the user.
    Alert { message: String },
}
