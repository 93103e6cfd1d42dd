use bytes::Bytes;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracker_logging::tracker_debug;

use crate::wire::{
    CreateJobRequest, CreateJobResponse, ErrorBody, JobStatusBody, SiteEntry, SitesResponse,
};
use crate::{ApiError, ClientSettings};

/// The four operations of the scraping API.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// `GET /sites`
    async fn list_sites(&self) -> Result<Vec<SiteEntry>, ApiError>;

    /// `POST /scraping`; returns the new job id.
    async fn create_job(&self, request: &CreateJobRequest) -> Result<String, ApiError>;

    /// `GET /job/{id}`
    async fn job_status(&self, job_id: &str) -> Result<JobStatusBody, ApiError>;

    /// `GET /job/{id}/download`
    async fn download(&self, job_id: &str) -> Result<Bytes, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(settings.base_url.clone()));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Appends path segments to the base url; each segment is escaped.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracker_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        ensure_success(status, &body)?;
        decode(&body)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn list_sites(&self) -> Result<Vec<SiteEntry>, ApiError> {
        let url = self.endpoint(&["sites"])?;
        let response: SitesResponse = self.get_json(url).await?;
        Ok(response.into_entries())
    }

    async fn create_job(&self, request: &CreateJobRequest) -> Result<String, ApiError> {
        let url = self.endpoint(&["scraping"])?;
        tracker_debug!("POST {} site={} termo_busca={:?}", url, request.site, request.termo_busca);
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        ensure_success(status, &body)?;
        let created: CreateJobResponse = decode(&body)?;
        created
            .job_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ApiError::MissingJobId)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusBody, ApiError> {
        let url = self.endpoint(&["job", job_id])?;
        self.get_json(url).await
    }

    async fn download(&self, job_id: &str) -> Result<Bytes, ApiError> {
        let url = self.endpoint(&["job", job_id, "download"])?;
        tracker_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        ensure_success(status, &body)?;
        Ok(body)
    }
}

fn ensure_success(status: StatusCode, body: &[u8]) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_detail);
    Err(ApiError::HttpStatus {
        status: status.as_u16(),
        detail,
    })
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    ApiError::Network(err.to_string())
}
