mod platform;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use tracker_engine::ClientSettings;
use tracker_logging::{tracker_info, LogDestination, DEFAULT_LOG_FILE};

use platform::{LaunchOptions, SearchArgs};

#[derive(Parser)]
#[command(name = "scrape-tracker")]
#[command(version)]
#[command(about = "Launch scraping jobs, follow their progress and fetch the results", long_about = None)]
struct Cli {
    /// Root URL of the scraping API [default: http://localhost:8000]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory for downloaded spreadsheets [default: ./downloads]
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Page limit sent with new jobs
    #[arg(long, global = true)]
    max_pages: Option<u32>,

    /// Delay between page requests sent with new jobs, in seconds
    #[arg(long, global = true)]
    delay: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sources the API can scrape
    Sites,
    /// Run one search to completion
    Search {
        /// Source key, as listed by `sites`
        #[arg(short, long)]
        site: String,

        /// Search term
        #[arg(short, long)]
        term: String,

        /// Download the spreadsheet once the job completes
        #[arg(long)]
        download: bool,

        /// Save the result rows as JSON (default name when PATH is omitted)
        #[arg(long, value_name = "PATH")]
        save_json: Option<Option<PathBuf>>,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },
    /// Interactive session
    Shell,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

impl Cli {
    fn settings(&self) -> ClientSettings {
        let mut settings = ClientSettings::default();
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(dir) = &self.download_dir {
            settings.download_dir = dir.clone();
        }
        settings
    }

    fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            max_pages: self.max_pages,
            delay: self.delay,
        }
    }
}

fn init_logging(target: LogTarget, verbose: bool) {
    let destination = match target {
        LogTarget::File => LogDestination::File,
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::Both => LogDestination::Both,
        LogTarget::Off => return,
    };
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    tracker_logging::initialize(destination, level, Path::new(DEFAULT_LOG_FILE));
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log, cli.verbose);
    let settings = cli.settings();
    let launch = cli.launch_options();
    tracker_info!("Using API at {}", settings.base_url);

    match cli.command {
        Commands::Sites => platform::list_sites(&settings),
        Commands::Search {
            site,
            term,
            download,
            save_json,
            timeout,
        } => platform::search(
            &settings,
            launch,
            SearchArgs {
                site,
                term,
                download,
                save_json,
                timeout: Duration::from_secs(timeout),
            },
        ),
        Commands::Shell => platform::shell(&settings, launch),
    }
}
