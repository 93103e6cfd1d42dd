//! Tracker core: pure job-lifecycle state machine and view-model helpers.
mod effect;
mod error;
mod filename;
mod msg;
mod poller;
mod render;
mod session;
mod state;
pub mod text;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{DownloadError, Failure, LaunchError, TransportError};
pub use filename::download_filename;
pub use msg::Msg;
pub use poller::{FailureVerdict, PollPhase, Poller, FATAL_POLL_FAILURES, POLL_INTERVAL};
pub use render::{escape_html, render_results, ResultRow, ResultsView};
pub use session::Session;
pub use state::{AppState, Catalog};
pub use types::{
    Item, JobId, JobStatus, LaunchRequest, LaunchTicket, PollHandle, SearchContext, Site,
    StatusReport,
};
pub use update::update;
pub use view_model::{AppViewModel, Outcome, SiteOptionView, StatusIndicator, TrackingView};
