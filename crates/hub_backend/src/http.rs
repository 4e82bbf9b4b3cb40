use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::api::ApiClient;
use crate::types::{
    map_reqwest_error, ApiError, DeleteAck, JobStatus, RecordPage, ScrapeKind, SelectAck, StartAck,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// `reqwest`-backed [`ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = url::Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidBase(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::InvalidBase(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::HttpStatus(status.as_u16()));
    }
    response.json::<T>().await.map_err(map_reqwest_error)
}

#[async_trait::async_trait]
impl ApiClient for HttpApiClient {
    async fn start_job(&self, kind: ScrapeKind, url: Option<&str>) -> Result<StartAck, ApiError> {
        // Only the custom scrape carries a body; the other kinds are bare
        // POSTs to their own endpoints.
        match kind {
            ScrapeKind::Custom => {
                let body = json!({ "url": url.unwrap_or_default() });
                self.post_json(kind.path(), &body).await
            }
            _ => self.post_json(kind.path(), &json!({})).await,
        }
    }

    async fn job_status(&self) -> Result<JobStatus, ApiError> {
        self.get_json("api/scraping_status").await
    }

    async fn list_records(&self) -> Result<RecordPage, ApiError> {
        self.get_json("api/products").await
    }

    async fn select_record(&self, index: usize) -> Result<SelectAck, ApiError> {
        let body = json!({ "product_index": index });
        self.post_json("api/select_product", &body).await
    }

    async fn delete_record(&self, index: usize) -> Result<DeleteAck, ApiError> {
        let body = json!({ "product_index": index });
        self.post_json("api/delete_product", &body).await
    }
}
