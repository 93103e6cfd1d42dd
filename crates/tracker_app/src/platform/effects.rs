use std::sync::mpsc;
use std::thread;

use tracker_core::{
    DownloadError, Effect, Item, JobId, JobStatus, LaunchError, LaunchTicket, Msg, PollHandle,
    Site, StatusReport, TransportError,
};
use tracker_engine::{
    ApiError, CreateJobRequest, EngineEvent, EngineHandle, JobStatusBody, ProductBody,
};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

/// Optional creation parameters forwarded with every launch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaunchOptions {
    pub max_pages: Option<u32>,
    pub delay: Option<f64>,
}

pub struct EffectRunner {
    engine: EngineHandle,
    launch: LaunchOptions,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, launch: LaunchOptions) -> Self {
        Self { engine, launch }
    }

    /// Hands IO effects to the engine. Alerts are for the user, so they are
    /// returned instead.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut alerts = Vec::new();
        for effect in effects {
            match effect {
                Effect::LoadSites => self.engine.list_sites(),
                Effect::CreateJob { ticket, request } => {
                    tracker_info!(
                        "CreateJob ticket={} site={} query_len={}",
                        ticket.0,
                        request.site,
                        request.query.len()
                    );
                    let mut body = CreateJobRequest::new(request.site, request.query);
                    body.max_paginas = self.launch.max_pages;
                    body.delay = self.launch.delay;
                    self.engine.create_job(ticket.0, body);
                }
                Effect::StartTimer { handle, period } => {
                    tracker_debug!("StartTimer {} every {:?}", handle.0, period);
                    self.engine.start_timer(handle.0, period);
                }
                Effect::CancelTimer { handle } => {
                    tracker_debug!("CancelTimer {}", handle.0);
                    self.engine.cancel_timer(handle.0);
                }
                Effect::FetchStatus { job_id } => self.engine.fetch_status(job_id.as_str()),
                Effect::DownloadArtifact { job_id, filename } => {
                    self.engine.download(job_id.as_str(), filename);
                }
                Effect::Alert { message } => alerts.push(message),
            }
        }
        alerts
    }

    /// Forwards engine events to the message channel until either side hangs up.
    pub fn spawn_event_pump(&self, events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
        thread::spawn(move || {
            for event in events {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            }
        });
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SitesListed(result) => Msg::SitesLoaded(
            result
                .map(|entries| {
                    entries
                        .into_iter()
                        .map(|entry| Site::new(entry.key, entry.name))
                        .collect()
                })
                .map_err(|err| err.to_string()),
        ),
        EngineEvent::JobCreated { ticket, result } => Msg::JobCreated {
            ticket: LaunchTicket(ticket),
            result: result.map(JobId::from).map_err(launch_error),
        },
        EngineEvent::StatusFetched { job_id, result } => Msg::StatusFetched {
            job_id: JobId::from(job_id),
            result: result
                .map(status_report)
                .map_err(|err| TransportError::new(err.to_string())),
        },
        EngineEvent::ArtifactSaved { job_id, result } => Msg::DownloadFinished {
            job_id: JobId::from(job_id),
            result: result.map_err(|err| DownloadError::new(err.to_string())),
        },
        EngineEvent::TimerFired { timer } => Msg::PollTick {
            handle: PollHandle(timer),
        },
    }
}

fn launch_error(err: ApiError) -> LaunchError {
    tracker_warn!("Creation request failed: {}", err);
    LaunchError::new(err.detail().map(str::to_string))
}

fn status_report(body: JobStatusBody) -> StatusReport {
    let status = JobStatus::from_wire(&body.status);
    let progress_text = body
        .progress
        .as_ref()
        .and_then(|progress| progress.text())
        .map(str::to_string);
    let message = [body.message, body.erro, progress_text]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty());

    StatusReport {
        status,
        message,
        progress: body.progress.as_ref().and_then(|progress| progress.percent()),
        items: body
            .produtos
            .map(|products| products.into_iter().map(item).collect()),
    }
}

fn item(product: ProductBody) -> Item {
    Item {
        name: product.nome,
        price: product.preco,
        link: product.link,
        rating: product.avaliacao,
        sales_count: product.vendas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracker_engine::{Progress, SiteEntry};

    #[test]
    fn completed_body_maps_to_report_with_items() {
        let body = JobStatusBody {
            status: "completed".to_string(),
            progress: Some(Progress::Percent(100.0)),
            produtos: Some(vec![ProductBody {
                nome: Some("X".to_string()),
                preco: Some("$10".to_string()),
                ..ProductBody::default()
            }]),
            ..JobStatusBody::default()
        };
        let report = status_report(body);
        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(report.progress, Some(100));
        assert_eq!(report.message, None);
        assert_eq!(
            report.items,
            Some(vec![Item {
                name: Some("X".to_string()),
                price: Some("$10".to_string()),
                ..Item::default()
            }])
        );
    }

    #[test]
    fn failure_text_falls_back_to_erro_then_progress_text() {
        let body = JobStatusBody {
            status: "failed".to_string(),
            message: Some("  ".to_string()),
            erro: Some("Timeout no site".to_string()),
            ..JobStatusBody::default()
        };
        let report = status_report(body);
        assert_eq!(report.status, JobStatus::Error);
        assert_eq!(report.message.as_deref(), Some("Timeout no site"));

        let body = JobStatusBody {
            status: "running".to_string(),
            progress: Some(Progress::Text("Processando página 2...".to_string())),
            ..JobStatusBody::default()
        };
        let report = status_report(body);
        assert_eq!(report.progress, None);
        assert_eq!(report.message.as_deref(), Some("Processando página 2..."));
    }

    #[test]
    fn rejected_creation_keeps_backend_detail() {
        let msg = map_event(EngineEvent::JobCreated {
            ticket: 4,
            result: Err(ApiError::HttpStatus {
                status: 400,
                detail: Some("Site não suportado".to_string()),
            }),
        });
        assert_eq!(
            msg,
            Msg::JobCreated {
                ticket: LaunchTicket(4),
                result: Err(LaunchError::new(Some("Site não suportado".to_string()))),
            }
        );

        let msg = map_event(EngineEvent::JobCreated {
            ticket: 5,
            result: Err(ApiError::MissingJobId),
        });
        assert_eq!(
            msg,
            Msg::JobCreated {
                ticket: LaunchTicket(5),
                result: Err(LaunchError::new(None)),
            }
        );
    }

    #[test]
    fn poll_transport_errors_become_transport_failures() {
        let msg = map_event(EngineEvent::StatusFetched {
            job_id: "J1".to_string(),
            result: Err(ApiError::Network("connection refused".to_string())),
        });
        match msg {
            Msg::StatusFetched { job_id, result } => {
                assert_eq!(job_id, JobId::from("J1"));
                assert!(result.unwrap_err().reason.contains("connection refused"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sites_and_timer_events_map_directly() {
        let msg = map_event(EngineEvent::SitesListed(Ok(vec![SiteEntry {
            key: "shop_a".to_string(),
            name: "Shop A".to_string(),
        }])));
        assert_eq!(msg, Msg::SitesLoaded(Ok(vec![Site::new("shop_a", "Shop A")])));

        let msg = map_event(EngineEvent::TimerFired { timer: 9 });
        assert_eq!(
            msg,
            Msg::PollTick {
                handle: PollHandle(9)
            }
        );
    }
}
