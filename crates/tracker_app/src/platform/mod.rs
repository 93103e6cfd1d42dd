mod app;
mod effects;
mod export;
mod ui;

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use tracker_core::{text, AppState, Catalog, Msg, Outcome};
use tracker_engine::{
    ensure_output_dir, ArtifactSaver, ClientSettings, EngineHandle, ReqwestApiClient,
};
use tracker_logging::tracker_info;

use app::Driver;
pub use effects::LaunchOptions;
use export::{default_export_name, save_results, ExportContext};

/// Parameters of a headless search.
pub struct SearchArgs {
    pub site: String,
    pub term: String,
    pub download: bool,
    /// `Some(None)` asks for the default file name.
    pub save_json: Option<Option<PathBuf>>,
    pub timeout: Duration,
}

fn connect(settings: &ClientSettings, launch: LaunchOptions) -> Result<Driver> {
    let client = ReqwestApiClient::new(settings)
        .with_context(|| format!("cannot use API at {}", settings.base_url))?;
    let saver = ArtifactSaver::new(settings.download_dir.clone());
    let (engine, events) = EngineHandle::spawn(Arc::new(client), saver);

    let (msg_tx, msg_rx) = mpsc::channel();
    let runner = effects::EffectRunner::new(engine, launch);
    runner.spawn_event_pump(events, msg_tx.clone());

    let state = AppState::with_poll_interval(settings.poll_interval);
    let driver = Driver::new(state, runner, msg_tx, msg_rx);
    driver.watch_interrupt();
    Ok(driver)
}

/// Loads the catalog; fails when it is unavailable.
fn load_catalog(driver: &mut Driver, timeout: Duration) -> Result<()> {
    driver.dispatch(Msg::PageLoaded);
    driver.run_until(Some(timeout), |d| !matches!(d.catalog(), Catalog::Loading))?;
    if *driver.catalog() == Catalog::Unavailable {
        bail!("{}", text::SITES_UNAVAILABLE);
    }
    Ok(())
}

pub fn list_sites(settings: &ClientSettings) -> Result<()> {
    let mut driver = connect(settings, LaunchOptions::default())?;
    load_catalog(&mut driver, settings.request_timeout)
}

pub fn search(settings: &ClientSettings, launch: LaunchOptions, args: SearchArgs) -> Result<()> {
    let mut driver = connect(settings, launch)?;
    load_catalog(&mut driver, settings.request_timeout)?;

    driver.dispatch(Msg::SiteSelected(args.site.clone()));
    driver.dispatch(Msg::SearchTermChanged(args.term.clone()));
    let alerts_before = driver.alerts().len();
    driver.dispatch(Msg::SubmitClicked);
    driver.run_until(Some(args.timeout), |d| {
        d.view().outcome.is_some() || d.alerts().len() > alerts_before
    })?;

    let view = driver.view();
    let (job_id, results) = match (view.outcome, view.results) {
        (Some(Outcome::Completed { job_id, .. }), Some(results)) => (job_id, results),
        (Some(Outcome::Failed(failure)), _) => bail!("{failure}"),
        _ => match driver.alerts().last() {
            Some(alert) => bail!("{alert}"),
            None => bail!("{}", text::UNKNOWN_ERROR_MESSAGE),
        },
    };

    if let Some(target) = args.save_json {
        let target = target
            .unwrap_or_else(|| PathBuf::from(default_export_name(&args.term, Local::now())));
        let site = view
            .sites
            .iter()
            .find(|site| site.key == args.site)
            .map_or(args.site.as_str(), |site| site.label.as_str());
        let context = ExportContext {
            job_id: &job_id,
            site,
            term: &args.term,
        };
        let path = save_results(&target, &context, &results)?;
        println!("Resultados salvos em: {}", path.display());
    }

    if args.download {
        ensure_output_dir(&settings.download_dir)
            .with_context(|| format!("download dir {}", settings.download_dir.display()))?;
        let alerts_before = driver.alerts().len();
        driver.dispatch(Msg::DownloadClicked);
        driver.run_until(Some(settings.request_timeout), |d| {
            d.view().download_label == text::DOWNLOAD_IDLE
        })?;
        if driver.view().last_download.is_none() {
            match driver.alerts().get(alerts_before) {
                Some(alert) => bail!("{alert}"),
                None => bail!("{}", text::DOWNLOAD_ERROR_MESSAGE),
            }
        }
    }

    tracker_info!("Search for job {} finished", job_id);
    Ok(())
}

pub fn shell(settings: &ClientSettings, launch: LaunchOptions) -> Result<()> {
    let mut driver = connect(settings, launch)?;
    driver.dispatch(Msg::PageLoaded);
    driver.run_shell()
}
