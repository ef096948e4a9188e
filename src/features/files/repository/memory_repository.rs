//! Process-local file repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{NewStoredFile, StoredFile};
use crate::features::files::repository::FileRepository;
use crate::features::files::services::FileQuery;
use crate::modules::search::DocVersion;

const PRIMARY_TERM: i64 = 1;

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<String, StoredFile>,
    seq_no: i64,
}

impl Inner {
    fn next_version(&mut self) -> DocVersion {
        self.seq_no += 1;
        DocVersion {
            seq_no: self.seq_no,
            primary_term: PRIMARY_TERM,
        }
    }
}

/// In-memory file repository with the same versioning rules as the index
#[derive(Debug, Default)]
pub struct InMemoryFileRepository {
    inner: RwLock<Inner>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn insert(&self, file: NewStoredFile) -> Result<StoredFile> {
        let mut inner = self.inner.write().await;
        let version = inner.next_version();
        let stored = file.into_stored(Uuid::now_v7().to_string(), Some(version));
        inner.files.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredFile>> {
        Ok(self.inner.read().await.files.get(id).cloned())
    }

    async fn update(&self, file: &StoredFile) -> Result<StoredFile> {
        let mut inner = self.inner.write().await;

        let current = inner
            .files
            .get(&file.id)
            .ok_or_else(|| AppError::FileNotFound(file.id.clone()))?;
        if file.version.is_some() && current.version != file.version {
            return Err(AppError::Conflict(format!(
                "document {} was modified concurrently",
                file.id
            )));
        }

        let mut updated = file.clone();
        updated.version = Some(inner.next_version());
        inner.files.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.inner.write().await.files.remove(id).is_some())
    }

    async fn count(&self, query: &FileQuery) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.files.values().filter(|f| query.matches(f)).count() as u64)
    }

    async fn search(&self, query: &FileQuery) -> Result<Vec<StoredFile>> {
        let inner = self.inner.read().await;
        Ok(inner
            .files
            .values()
            .filter(|f| query.matches(f))
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
