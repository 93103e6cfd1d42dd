use std::path::PathBuf;

use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::poller::FailureVerdict;
use crate::render::render_results;
use crate::state::{Catalog, PendingLaunch};
use crate::view_model::{Outcome, StatusIndicator, TrackingView};
use crate::{
    download_filename, text, AppState, DownloadError, Effect, Failure, JobId, JobStatus,
    LaunchError, LaunchRequest, LaunchTicket, Msg, SearchContext, Site, StatusReport,
    TransportError,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded => vec![Effect::LoadSites],
        Msg::SitesLoaded(result) => {
            apply_catalog(&mut state, result);
            Vec::new()
        }
        Msg::SiteSelected(key) => {
            select_site(&mut state, &key);
            Vec::new()
        }
        Msg::SearchTermChanged(term) => {
            if state.search_term != term {
                state.search_term = term;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::JobCreated { ticket, result } => job_created(&mut state, ticket, result),
        Msg::PollTick { handle } => state.session.poller().on_tick(handle),
        Msg::StatusFetched { job_id, result } => status_fetched(&mut state, job_id, result),
        Msg::DownloadClicked => download(&mut state),
        Msg::DownloadFinished { job_id, result } => download_finished(&mut state, job_id, result),
        Msg::NewSearchClicked => new_search(&mut state),
        Msg::PageUnloaded => {
            let effects = state.session.reset();
            if !effects.is_empty() {
                state.mark_dirty();
            }
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_catalog(state: &mut AppState, result: Result<Vec<Site>, String>) {
    state.catalog = match result {
        Ok(sites) => {
            tracker_info!("Catalog loaded with {} sources", sites.len());
            Catalog::Loaded(sites)
        }
        Err(reason) => {
            tracker_warn!("Catalog unavailable: {}", reason);
            Catalog::Unavailable
        }
    };
    if let Some(key) = &state.selected_site {
        if state.site(key).is_none() {
            state.selected_site = None;
        }
    }
    state.mark_dirty();
}

fn select_site(state: &mut AppState, key: &str) {
    let selected = if key.is_empty() {
        None
    } else if state.site(key).is_some() {
        Some(key.to_string())
    } else {
        tracker_warn!("Ignoring selection of unknown source {:?}", key);
        return;
    };
    if state.selected_site != selected {
        state.selected_site = selected;
        state.mark_dirty();
    }
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if state.launch.is_some() || state.session.poller().is_active() {
        tracker_debug!("Submit ignored while a job is being launched or tracked");
        return Vec::new();
    }

    let term = state.search_term.trim().to_string();
    let site = state
        .selected_site
        .as_deref()
        .and_then(|key| state.site(key))
        .cloned();
    let site = match site {
        Some(site) if !term.is_empty() => site,
        _ => {
            return vec![Effect::Alert {
                message: Failure::Validation.to_string(),
            }];
        }
    };

    let ticket = state.next_ticket();
    tracker_info!("Launching search {:?} on {} ({:?})", term, site.key, ticket);
    let request = LaunchRequest {
        site: site.key.clone(),
        query: term.clone(),
    };
    state.launch = Some(PendingLaunch {
        ticket,
        search: SearchContext {
            site_key: site.key,
            site_name: site.name,
            term,
        },
    });
    state.mark_dirty();
    vec![Effect::CreateJob { ticket, request }]
}

fn job_created(
    state: &mut AppState,
    ticket: LaunchTicket,
    result: Result<JobId, LaunchError>,
) -> Vec<Effect> {
    let pending = match state.launch.take() {
        Some(pending) if pending.ticket == ticket => pending,
        other => {
            tracker_debug!("Discarding creation response for stale {:?}", ticket);
            state.launch = other;
            return Vec::new();
        }
    };
    state.mark_dirty();

    match result {
        Ok(job_id) => {
            tracker_info!("Job {} created", job_id);
            state.search = Some(pending.search);
            state.tracking = Some(TrackingView::new(job_id.clone()));
            state.results = None;
            state.outcome = None;
            state.completed_job = None;
            state.last_download = None;
            state.session.track(job_id)
        }
        Err(err) => {
            tracker_warn!("Job creation failed: {}", err);
            vec![Effect::Alert {
                message: Failure::from(err).to_string(),
            }]
        }
    }
}

fn status_fetched(
    state: &mut AppState,
    job_id: JobId,
    result: Result<StatusReport, TransportError>,
) -> Vec<Effect> {
    if !state.session.accepts(&job_id) {
        tracker_debug!("Discarding status for job {} no longer tracked", job_id);
        return Vec::new();
    }
    state.mark_dirty();

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            tracker_warn!("Job {}: {}", job_id, err);
            return match state.session.poller_mut().record_failure() {
                FailureVerdict::Tolerated => Vec::new(),
                FailureVerdict::Fatal(effects) => {
                    end_with_failure(state, Failure::PollTransport);
                    effects
                }
            };
        }
    };
    state.session.poller_mut().record_success();
    show_status(state, &report);

    match report.status {
        JobStatus::Pending | JobStatus::Running => Vec::new(),
        JobStatus::Completed => {
            let effects = state.session.poller_mut().complete();
            let items = report.items.unwrap_or_default();
            let rendered = match &state.search {
                Some(search) => render_results(&items, search),
                None => Err(Failure::EmptyResult),
            };
            match rendered {
                Ok(results) => {
                    tracker_info!("Job {} completed with {} items", job_id, results.rows.len());
                    state.outcome = Some(Outcome::Completed {
                        job_id: job_id.clone(),
                        row_count: results.rows.len(),
                    });
                    state.results = Some(results);
                    state.completed_job = Some(job_id);
                    state.session.release();
                }
                Err(failure) => end_with_failure(state, failure),
            }
            effects
        }
        JobStatus::Error => {
            let effects = state.session.poller_mut().fail();
            let message = report
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| text::UNKNOWN_ERROR_MESSAGE.to_string());
            end_with_failure(state, Failure::Job(message));
            effects
        }
    }
}

fn show_status(state: &mut AppState, report: &StatusReport) {
    if let Some(tracking) = state.tracking.as_mut() {
        tracking.indicator = StatusIndicator::from(report.status);
        tracking.progress = report.progress.unwrap_or(0).min(100);
        tracking.details = report
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| text::DETAILS_DEFAULT.to_string());
    }
}

/// Surfaces `failure` on the status surface and releases the job.
fn end_with_failure(state: &mut AppState, failure: Failure) {
    tracker_warn!("Tracking ended: {}", failure);
    if let Some(tracking) = state.tracking.as_mut() {
        tracking.error = Some(failure.to_string());
    }
    state.results = None;
    state.completed_job = None;
    state.outcome = Some(Outcome::Failed(failure));
    state.session.release();
}

fn download(state: &mut AppState) -> Vec<Effect> {
    let job_id = match (&state.completed_job, &state.download_in_flight) {
        (Some(job_id), None) => job_id.clone(),
        _ => return Vec::new(),
    };
    state.download_in_flight = Some(job_id.clone());
    state.mark_dirty();
    let filename = download_filename(&job_id);
    tracker_info!("Downloading artifact for job {} as {}", job_id, filename);
    vec![Effect::DownloadArtifact { job_id, filename }]
}

fn download_finished(
    state: &mut AppState,
    job_id: JobId,
    result: Result<PathBuf, DownloadError>,
) -> Vec<Effect> {
    if state.download_in_flight.as_ref() != Some(&job_id) {
        tracker_debug!("Discarding download result for job {} no longer awaited", job_id);
        return Vec::new();
    }
    state.download_in_flight = None;
    state.mark_dirty();
    match result {
        Ok(path) => {
            tracker_info!("Artifact for job {} saved to {:?}", job_id, path);
            if state.completed_job.as_ref() == Some(&job_id) {
                state.last_download = Some(path);
            }
            Vec::new()
        }
        Err(err) => {
            tracker_warn!("Job {}: {}", job_id, err);
            vec![Effect::Alert {
                message: Failure::Download.to_string(),
            }]
        }
    }
}

fn new_search(state: &mut AppState) -> Vec<Effect> {
    let effects = state.session.reset();
    state.launch = None;
    state.search = None;
    state.tracking = None;
    state.results = None;
    state.outcome = None;
    state.completed_job = None;
    state.download_in_flight = None;
    state.last_download = None;
    state.selected_site = None;
    state.search_term.clear();
    state.mark_dirty();
    tracker_info!("New search: session reset");
    effects
}
