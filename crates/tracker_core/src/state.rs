use std::path::PathBuf;
use std::time::Duration;

use crate::session::Session;
use crate::view_model::{AppViewModel, Outcome, SiteOptionView, TrackingView};
use crate::{text, JobId, LaunchTicket, ResultsView, SearchContext, Site};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Catalog {
    #[default]
    Loading,
    Loaded(Vec<Site>),
    Unavailable,
}

/// A creation request that has not answered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingLaunch {
    pub(crate) ticket: LaunchTicket,
    pub(crate) search: SearchContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) catalog: Catalog,
    pub(crate) selected_site: Option<String>,
    pub(crate) search_term: String,
    pub(crate) launch: Option<PendingLaunch>,
    pub(crate) next_ticket: u64,
    pub(crate) session: Session,
    /// Search behind the tracked (or last tracked) job.
    pub(crate) search: Option<SearchContext>,
    pub(crate) tracking: Option<TrackingView>,
    pub(crate) results: Option<ResultsView>,
    pub(crate) outcome: Option<Outcome>,
    /// Completed job whose artifact can be downloaded.
    pub(crate) completed_job: Option<JobId>,
    /// Job whose artifact request has not answered yet.
    pub(crate) download_in_flight: Option<JobId>,
    pub(crate) last_download: Option<PathBuf>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            session: Session::new(poll_interval),
            ..Self::default()
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> AppViewModel {
        let submit_busy = self.launch.is_some();
        let submit_enabled = !submit_busy && !self.session.poller().is_active();
        AppViewModel {
            sites: self.site_options(),
            selected_site: self.selected_site.clone(),
            search_term: self.search_term.clone(),
            submit_enabled,
            submit_label: if submit_busy {
                text::SUBMIT_BUSY
            } else {
                text::SUBMIT_IDLE
            },
            tracking: self.tracking.clone(),
            results: self.results.clone(),
            download_enabled: self.completed_job.is_some() && self.download_in_flight.is_none(),
            download_label: if self.download_in_flight.is_some() {
                text::DOWNLOAD_BUSY
            } else {
                text::DOWNLOAD_IDLE
            },
            outcome: self.outcome.clone(),
            current_job_id: self.session.current_job_id().cloned(),
            active_poll: self.session.poller().handle(),
            last_download: self.last_download.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn site(&self, key: &str) -> Option<&Site> {
        match &self.catalog {
            Catalog::Loaded(sites) => sites.iter().find(|site| site.key == key),
            Catalog::Loading | Catalog::Unavailable => None,
        }
    }

    pub(crate) fn next_ticket(&mut self) -> LaunchTicket {
        self.next_ticket += 1;
        LaunchTicket(self.next_ticket)
    }

    fn site_options(&self) -> Vec<SiteOptionView> {
        let placeholder = SiteOptionView {
            key: String::new(),
            label: text::SITE_PLACEHOLDER.to_string(),
            enabled: true,
        };
        match &self.catalog {
            Catalog::Loading => vec![placeholder],
            Catalog::Loaded(sites) => std::iter::once(placeholder)
                .chain(sites.iter().map(|site| SiteOptionView {
                    key: site.key.clone(),
                    label: site.name.clone(),
                    enabled: true,
                }))
                .collect(),
            Catalog::Unavailable => vec![SiteOptionView {
                key: String::new(),
                label: text::SITES_UNAVAILABLE.to_string(),
                enabled: false,
            }],
        }
    }
}
