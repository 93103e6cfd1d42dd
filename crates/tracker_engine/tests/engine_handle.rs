use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use bytes::Bytes;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tracker_engine::{
    ApiClient, ApiError, ArtifactSaver, CreateJobRequest, EngineEvent, EngineHandle,
    JobStatusBody, SiteEntry,
};

const WAIT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct FakeApi {
    status_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl ApiClient for FakeApi {
    async fn list_sites(&self) -> Result<Vec<SiteEntry>, ApiError> {
        Ok(vec![SiteEntry {
            key: "shop_a".to_string(),
            name: "Shop A".to_string(),
        }])
    }

    async fn create_job(&self, request: &CreateJobRequest) -> Result<String, ApiError> {
        if request.site == "broken" {
            return Err(ApiError::HttpStatus {
                status: 400,
                detail: Some("Site não suportado".to_string()),
            });
        }
        Ok(format!("job-{}", request.termo_busca))
    }

    async fn job_status(&self, _job_id: &str) -> Result<JobStatusBody, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(JobStatusBody {
            status: "running".to_string(),
            ..JobStatusBody::default()
        })
    }

    async fn download(&self, job_id: &str) -> Result<Bytes, ApiError> {
        if job_id == "missing" {
            return Err(ApiError::HttpStatus {
                status: 404,
                detail: None,
            });
        }
        Ok(Bytes::from_static(b"xlsx-bytes"))
    }
}

fn spawn(dir: &TempDir) -> (EngineHandle, mpsc::Receiver<EngineEvent>, Arc<FakeApi>) {
    let api = Arc::new(FakeApi::default());
    let saver = ArtifactSaver::new(dir.path().join("downloads"));
    let (handle, events) = EngineHandle::spawn(api.clone(), saver);
    (handle, events, api)
}

#[test]
fn requests_come_back_as_events() {
    let dir = TempDir::new().unwrap();
    let (engine, events, _) = spawn(&dir);

    engine.list_sites();
    let event = events.recv_timeout(WAIT).unwrap();
    assert_eq!(
        event,
        EngineEvent::SitesListed(Ok(vec![SiteEntry {
            key: "shop_a".to_string(),
            name: "Shop A".to_string()
        }]))
    );

    engine.create_job(7, CreateJobRequest::new("shop_a", "phone"));
    let event = events.recv_timeout(WAIT).unwrap();
    assert_eq!(
        event,
        EngineEvent::JobCreated {
            ticket: 7,
            result: Ok("job-phone".to_string())
        }
    );

    engine.create_job(8, CreateJobRequest::new("broken", "phone"));
    match events.recv_timeout(WAIT).unwrap() {
        EngineEvent::JobCreated { ticket, result } => {
            assert_eq!(ticket, 8);
            assert_eq!(result.unwrap_err().detail(), Some("Site não suportado"));
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.fetch_status("J1");
    match events.recv_timeout(WAIT).unwrap() {
        EngineEvent::StatusFetched { job_id, result } => {
            assert_eq!(job_id, "J1");
            assert_eq!(result.unwrap().status, "running");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn download_is_saved_under_requested_name() {
    let dir = TempDir::new().unwrap();
    let (engine, events, _) = spawn(&dir);

    engine.download("J1", "scraping_results_J1.xlsx");
    let path = match events.recv_timeout(WAIT).unwrap() {
        EngineEvent::ArtifactSaved { job_id, result } => {
            assert_eq!(job_id, "J1");
            result.unwrap()
        }
        other => panic!("unexpected event {other:?}"),
    };
    assert_eq!(
        path,
        dir.path().join("downloads").join("scraping_results_J1.xlsx")
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"xlsx-bytes");

    engine.download("missing", "scraping_results_missing.xlsx");
    match events.recv_timeout(WAIT).unwrap() {
        EngineEvent::ArtifactSaved { result, .. } => {
            assert!(matches!(
                result,
                Err(ApiError::HttpStatus { status: 404, .. })
            ));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(!dir
        .path()
        .join("downloads")
        .join("scraping_results_missing.xlsx")
        .exists());
}

#[test]
fn timer_fires_until_cancelled() {
    let dir = TempDir::new().unwrap();
    let (engine, events, _) = spawn(&dir);

    engine.start_timer(1, Duration::from_millis(20));
    for _ in 0..3 {
        assert_eq!(
            events.recv_timeout(WAIT).unwrap(),
            EngineEvent::TimerFired { timer: 1 }
        );
    }

    engine.cancel_timer(1);
    // Ticks already queued before the cancel landed may still arrive.
    std::thread::sleep(Duration::from_millis(60));
    while events.try_recv().is_ok() {}
    assert!(events.recv_timeout(Duration::from_millis(120)).is_err());
}

#[test]
fn restarted_timer_keeps_single_task() {
    let dir = TempDir::new().unwrap();
    let (engine, events, _) = spawn(&dir);

    engine.start_timer(3, Duration::from_millis(40));
    engine.start_timer(3, Duration::from_millis(40));
    std::thread::sleep(Duration::from_millis(150));
    engine.cancel_timer(3);
    std::thread::sleep(Duration::from_millis(30));

    let fired: Vec<_> = events.try_iter().collect();
    // One task ticking every 40ms fires three times in 150ms; two would fire six.
    assert!(fired.len() <= 4, "got {} ticks", fired.len());
    assert!(fired
        .iter()
        .all(|event| *event == EngineEvent::TimerFired { timer: 3 }));
}

#[test]
fn first_tick_waits_one_period() {
    let dir = TempDir::new().unwrap();
    let (engine, events, _) = spawn(&dir);

    engine.start_timer(5, Duration::from_millis(200));
    assert!(events.recv_timeout(Duration::from_millis(80)).is_err());
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::TimerFired { timer: 5 }
    );
    engine.cancel_timer(5);
}

#[test]
fn status_requests_run_once_per_command() {
    let dir = TempDir::new().unwrap();
    let (engine, events, api) = spawn(&dir);

    engine.fetch_status("J1");
    engine.fetch_status("J1");
    events.recv_timeout(WAIT).unwrap();
    events.recv_timeout(WAIT).unwrap();
    assert_eq!(api.status_calls.load(Ordering::SeqCst), 2);
}
