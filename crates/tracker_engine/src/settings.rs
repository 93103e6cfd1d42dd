use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the scraping API; endpoint paths are appended to it.
    pub base_url: String,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Where downloaded artifacts are saved.
    pub download_dir: PathBuf,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            poll_interval: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            download_dir: PathBuf::from("downloads"),
            user_agent: concat!("scrape-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
