//! Search module for document indexing
//!
//! Provides an Elasticsearch REST client for storing documents and
//! running filtered, paginated queries against a single index.

mod elasticsearch_client;

pub use elasticsearch_client::{escape_wildcard, DocVersion, ElasticsearchClient, Hit};
