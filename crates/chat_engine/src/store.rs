use std::time::Duration;

use chat_logging::chat_warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{StoreError, StoreEvent};

/// Payload key holding a record's display text.
const PAYLOAD_TEXT_KEY: &str = "Event Text";
/// Payload key holding a record's optional artifact link.
const PAYLOAD_FILE_URL_KEY: &str = "fileUrl";

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upper bound on points read per scroll. The latest record is the last
    /// point of the page.
    pub page_limit: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6333".to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            page_limit: 1000,
        }
    }
}

/// Read side of the external document store holding pipeline status records.
#[async_trait::async_trait]
pub trait EventStore: Send + Sync {
    async fn collection_exists(&self, collection: &str) -> Result<bool, StoreError>;
    /// Latest record of the collection, or `None` when the collection is
    /// empty or its newest point carries no usable text.
    async fn latest_event(&self, collection: &str) -> Result<Option<StoreEvent>, StoreError>;
    async fn delete_collection(&self, collection: &str) -> Result<(), StoreError>;
}

/// REST client for a Qdrant-style vector store.
#[derive(Debug, Clone)]
pub struct HttpEventStore {
    client: reqwest::Client,
    settings: StoreSettings,
}

#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    result: CollectionsResult,
}

#[derive(Debug, Deserialize)]
struct CollectionsResult {
    collections: Vec<CollectionEntry>,
}

#[derive(Debug, Deserialize)]
struct CollectionEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct ScrollRequest {
    limit: usize,
    with_payload: bool,
    with_vector: bool,
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Debug, Deserialize)]
struct ScrollResult {
    points: Vec<ScrollPoint>,
}

#[derive(Debug, Deserialize)]
struct ScrollPoint {
    #[serde(default)]
    payload: serde_json::Map<String, Value>,
}

impl HttpEventStore {
    pub fn new(settings: StoreSettings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| StoreError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        let mut builder = self.client.request(method, url);
        if let Some(api_key) = &self.settings.api_key {
            builder = builder.header("api-key", api_key);
        }
        builder
    }
}

#[async_trait::async_trait]
impl EventStore for HttpEventStore {
    async fn collection_exists(&self, collection: &str) -> Result<bool, StoreError> {
        let response = self
            .request(reqwest::Method::GET, "/collections")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Http(status.as_u16()));
        }

        let body: CollectionsResponse = response
            .json()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        Ok(body
            .result
            .collections
            .iter()
            .any(|entry| entry.name == collection))
    }

    async fn latest_event(&self, collection: &str) -> Result<Option<StoreEvent>, StoreError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/collections/{collection}/points/scroll"),
            )
            .json(&ScrollRequest {
                limit: self.settings.page_limit,
                with_payload: true,
                with_vector: false,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::CollectionMissing);
        }
        if !status.is_success() {
            return Err(StoreError::Http(status.as_u16()));
        }

        let body: ScrollResponse = response
            .json()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;

        let Some(latest) = body.result.points.last() else {
            return Ok(None);
        };
        let Some(text) = latest
            .payload
            .get(PAYLOAD_TEXT_KEY)
            .and_then(Value::as_str)
        else {
            chat_warn!(
                "latest point in collection '{}' has no '{}' payload",
                collection,
                PAYLOAD_TEXT_KEY
            );
            return Ok(None);
        };
        let file_url = latest
            .payload
            .get(PAYLOAD_FILE_URL_KEY)
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(Some(StoreEvent {
            text: text.to_owned(),
            file_url,
        }))
    }

    async fn delete_collection(&self, collection: &str) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/collections/{collection}"))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::CollectionMissing);
        }
        if !status.is_success() {
            return Err(StoreError::Http(status.as_u16()));
        }
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    StoreError::Network(err.to_string())
}
