//! Vector store client.
//!
//! One collection holds every indexed chunk: vectors use cosine distance,
//! and the payload carries keyword indexes for the metadata fields queries
//! filter on plus a datetime index on the ingestion timestamp. The engine
//! talks to Qdrant over its REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::{IndexError, Result};

/// Payload fields indexed as keywords for equality filtering.
const KEYWORD_FIELDS: [&str; 5] = ["course_id", "semester_id", "type", "source", "lecture_id"];

/// A vector plus its payload, ready for upsert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointRecord {
    /// Fresh unique point id.
    pub id: String,
    /// Embedding vector.
    pub vector: Vec<f32>,
    /// Chunk text, position, timestamp, and caller metadata.
    pub payload: Value,
}

/// A search hit with its similarity score.
#[derive(Clone, Debug, Deserialize)]
pub struct ScoredPoint {
    /// Point id.
    pub id: Value,
    /// Similarity score (cosine: higher is closer).
    pub score: f64,
    /// Stored payload.
    #[serde(default)]
    pub payload: Value,
}

/// Upsert/search operations over one vector collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection and its payload indexes if missing.
    async fn ensure_collection(&self) -> Result<()>;

    /// Append a batch of records. Points are never updated in place.
    async fn upsert(&self, points: Vec<PointRecord>) -> Result<()>;

    /// Nearest-neighbor search with equality must-match filters.
    async fn search(
        &self,
        vector: Vec<f32>,
        filters: &Map<String, Value>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>>;
}

/// Qdrant REST client scoped to one collection.
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
    dimensions: usize,
}

impl QdrantStore {
    /// Build a client for the collection at `base_url`.
    #[must_use]
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        collection: String,
        dimensions: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            collection,
            dimensions,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if let Some(key) = &self.api_key {
            req = req.header("api-key", key);
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value> {
        let response = req
            .send()
            .await
            .map_err(|e| IndexError::Store(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Store(format!("{status}: {body}")));
        }
        response
            .json()
            .await
            .map_err(|e| IndexError::Response(e.to_string()))
    }

    async fn collection_exists(&self) -> Result<bool> {
        let body = self
            .send(self.request(reqwest::Method::GET, "/collections"))
            .await?;
        let names = body["result"]["collections"]
            .as_array()
            .ok_or_else(|| IndexError::Response("malformed collections listing".into()))?;
        Ok(names
            .iter()
            .any(|c| c["name"].as_str() == Some(self.collection.as_str())))
    }

    async fn create_payload_index(&self, field: &str, schema: &str) -> Result<()> {
        let path = format!("/collections/{}/index", self.collection);
        let _ = self
            .send(self.request(reqwest::Method::PUT, &path).json(&serde_json::json!({
                "field_name": field,
                "field_schema": schema,
            })))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ensure_collection(&self) -> Result<()> {
        if self.collection_exists().await? {
            debug!(collection = %self.collection, "collection already present");
        } else {
            let path = format!("/collections/{}", self.collection);
            let _ = self
                .send(self.request(reqwest::Method::PUT, &path).json(&serde_json::json!({
                    "vectors": { "size": self.dimensions, "distance": "Cosine" },
                })))
                .await?;
            info!(collection = %self.collection, dimensions = self.dimensions, "created collection");
        }

        for field in KEYWORD_FIELDS {
            self.create_payload_index(field, "keyword").await?;
        }
        self.create_payload_index("timestamp", "datetime").await?;
        Ok(())
    }

    async fn upsert(&self, points: Vec<PointRecord>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let count = points.len();
        let path = format!("/collections/{}/points?wait=true", self.collection);
        let _ = self
            .send(
                self.request(reqwest::Method::PUT, &path)
                    .json(&serde_json::json!({ "points": points })),
            )
            .await?;
        debug!(collection = %self.collection, count, "upserted points");
        Ok(())
    }

    async fn search(
        &self,
        vector: Vec<f32>,
        filters: &Map<String, Value>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>> {
        let must: Vec<Value> = filters
            .iter()
            .map(|(key, value)| serde_json::json!({ "key": key, "match": { "value": value } }))
            .collect();

        let mut body = serde_json::json!({
            "vector": vector,
            "limit": limit,
            "with_payload": true,
        });
        if !must.is_empty() {
            body["filter"] = serde_json::json!({ "must": must });
        }

        let path = format!("/collections/{}/points/search", self.collection);
        let response = self
            .send(self.request(reqwest::Method::POST, &path).json(&body))
            .await?;
        let hits = response
            .get("result")
            .cloned()
            .ok_or_else(|| IndexError::Response("search response missing result".into()))?;
        serde_json::from_value(hits).map_err(|e| IndexError::Response(e.to_string()))
    }
}
