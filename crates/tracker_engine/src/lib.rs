//! Tracker engine: scraping API client and effect execution.
mod client;
mod engine;
mod persist;
mod settings;
mod types;
mod wire;

pub use client::{ApiClient, ReqwestApiClient};
pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, ArtifactSaver, PersistError};
pub use settings::ClientSettings;
pub use types::{ApiError, EngineEvent, Ticket, TimerId};
pub use wire::{CreateJobRequest, JobStatusBody, ProductBody, Progress, SiteEntry};
