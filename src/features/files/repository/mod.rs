//! Persistence seam for stored files
//!
//! The service only talks to [`FileRepository`]; production wiring uses the
//! Elasticsearch implementation, tests and `SEARCH_BACKEND=memory` use the
//! in-memory one.

mod elasticsearch_repository;
mod memory_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::files::models::{NewStoredFile, StoredFile};
use crate::features::files::services::FileQuery;

pub use elasticsearch_repository::ElasticsearchFileRepository;
pub use memory_repository::InMemoryFileRepository;

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Persist a new file, assigning its id
    async fn insert(&self, file: NewStoredFile) -> Result<StoredFile>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredFile>>;

    /// Overwrite a stored file
    ///
    /// If `file.version` is set and no longer matches the stored version the
    /// write is rejected with `AppError::Conflict`.
    async fn update(&self, file: &StoredFile) -> Result<StoredFile>;

    /// Returns `false` when no file had that id
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn count(&self, query: &FileQuery) -> Result<u64>;

    async fn search(&self, query: &FileQuery) -> Result<Vec<StoredFile>>;
}
