//! Elasticsearch REST client
//!
//! Wraps the document, search and count APIs of a single index.
//! Writes use `refresh=wait_for` so a finished request is visible to the
//! next search, and updates can carry `if_seq_no`/`if_primary_term` for
//! optimistic concurrency.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::core::config::SearchConfig;
use crate::core::error::AppError;

/// Optimistic concurrency token of an indexed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocVersion {
    pub seq_no: i64,
    pub primary_term: i64,
}

/// A document as returned by the get and search APIs
#[derive(Debug, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_seq_no")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term")]
    pub primary_term: Option<i64>,
    #[serde(rename = "_source")]
    pub source: T,
}

impl<T> Hit<T> {
    pub fn version(&self) -> Option<DocVersion> {
        match (self.seq_no, self.primary_term) {
            (Some(seq_no), Some(primary_term)) => Some(DocVersion {
                seq_no,
                primary_term,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    #[serde(rename = "_seq_no")]
    seq_no: i64,
    #[serde(rename = "_primary_term")]
    primary_term: i64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    hits: SearchHits<T>,
}

#[derive(Debug, Deserialize)]
struct SearchHits<T> {
    hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

/// Escape the metacharacters of a `wildcard` query value
pub fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Elasticsearch client bound to one index
pub struct ElasticsearchClient {
    http_client: Client,
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

impl ElasticsearchClient {
    /// Create a new client from configuration
    ///
    /// No request is made here; call [`ElasticsearchClient::ensure_index`]
    /// to verify connectivity.
    pub fn new(config: &SearchConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.url.clone(),
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}/{}", self.base_url, path));

        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_ref()),
            None => builder,
        }
    }

    fn doc_path(&self, api: &str, id: &str) -> String {
        format!("{}/{}/{}", self.index, api, urlencoding::encode(id))
    }

    async fn error_from(response: Response, operation: &str) -> AppError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        AppError::SearchIndex(format!("{} failed: {} - {}", operation, status, body))
    }

    /// Create the index with the given mappings unless it already exists
    pub async fn ensure_index(&self, mappings: &Value) -> Result<(), AppError> {
        let response = self.request(Method::HEAD, &self.index).send().await?;

        if response.status().is_success() {
            debug!("Index '{}' already exists", self.index);
            return Ok(());
        }
        if response.status() != StatusCode::NOT_FOUND {
            return Err(Self::error_from(response, "Index lookup").await);
        }

        let response = self
            .request(Method::PUT, &self.index)
            .json(&json!({ "mappings": mappings }))
            .send()
            .await?;

        if response.status().is_success() {
            info!("Index '{}' created", self.index);
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        // Another instance may have created it between the two calls
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            debug!("Index '{}' created concurrently", self.index);
            Ok(())
        } else {
            Err(AppError::SearchIndex(format!(
                "Index creation failed: {} - {}",
                status, body
            )))
        }
    }

    /// Index a new document under `id`, failing if the id is taken
    pub async fn create_document<T: Serialize>(
        &self,
        id: &str,
        source: &T,
    ) -> Result<DocVersion, AppError> {
        let response = self
            .request(Method::PUT, &self.doc_path("_create", id))
            .query(&[("refresh", "wait_for")])
            .json(source)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(AppError::Conflict(format!("document {} already exists", id)));
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response, "Document create").await);
        }

        let written: WriteResponse = response.json().await?;
        debug!("Created document '{}' in index '{}'", id, self.index);

        Ok(DocVersion {
            seq_no: written.seq_no,
            primary_term: written.primary_term,
        })
    }

    /// Fetch a document by id, `None` when it does not exist
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        id: &str,
    ) -> Result<Option<Hit<T>>, AppError> {
        let response = self
            .request(Method::GET, &self.doc_path("_doc", id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response, "Document get").await);
        }

        Ok(Some(response.json().await?))
    }

    /// Overwrite a document
    ///
    /// When `expected` is given the write only succeeds if the stored
    /// document still has that version, otherwise `AppError::Conflict`.
    pub async fn update_document<T: Serialize>(
        &self,
        id: &str,
        source: &T,
        expected: Option<DocVersion>,
    ) -> Result<DocVersion, AppError> {
        let mut params = vec![("refresh", "wait_for".to_string())];
        if let Some(version) = expected {
            params.push(("if_seq_no", version.seq_no.to_string()));
            params.push(("if_primary_term", version.primary_term.to_string()));
        }

        let response = self
            .request(Method::PUT, &self.doc_path("_doc", id))
            .query(&params)
            .json(source)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(AppError::Conflict(format!(
                "document {} was modified concurrently",
                id
            )));
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response, "Document update").await);
        }

        let written: WriteResponse = response.json().await?;
        Ok(DocVersion {
            seq_no: written.seq_no,
            primary_term: written.primary_term,
        })
    }

    /// Delete a document, returns `false` when it did not exist
    pub async fn delete_document(&self, id: &str) -> Result<bool, AppError> {
        let response = self
            .request(Method::DELETE, &self.doc_path("_doc", id))
            .query(&[("refresh", "wait_for")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response, "Document delete").await);
        }

        debug!("Deleted document '{}' from index '{}'", id, self.index);
        Ok(true)
    }

    /// Run a search request body and return its hits
    pub async fn search<T: DeserializeOwned>(&self, body: &Value) -> Result<Vec<Hit<T>>, AppError> {
        let response = self
            .request(Method::POST, &format!("{}/_search", self.index))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Search").await);
        }

        let result: SearchResponse<T> = response.json().await?;
        Ok(result.hits.hits)
    }

    /// Count documents matching a query
    pub async fn count(&self, query: &Value) -> Result<u64, AppError> {
        let response = self
            .request(Method::POST, &format!("{}/_count", self.index))
            .json(&json!({ "query": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Count").await);
        }

        let result: CountResponse = response.json().await?;
        Ok(result.count)
    }
}
