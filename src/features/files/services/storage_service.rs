use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::models::{NewStoredFile, StoredFile};
use crate::features::files::repository::FileRepository;
use crate::features::files::services::{tag_set, FileQuery, FileTypeClassifier};

/// One page of search results plus the total number of matches
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub total: u64,
    pub files: Vec<StoredFile>,
}

/// Service for file metadata and tag operations
pub struct StorageService {
    repository: Arc<dyn FileRepository>,
    classifier: FileTypeClassifier,
    max_update_retries: u32,
    max_result_window: u64,
}

impl StorageService {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        classifier: FileTypeClassifier,
        max_update_retries: u32,
        max_result_window: u64,
    ) -> Self {
        Self {
            repository,
            classifier,
            max_update_retries,
            max_result_window,
        }
    }

    /// Every stored file, bounded by the index result window
    pub async fn list_all(&self) -> Result<Vec<StoredFile>> {
        self.repository
            .search(&FileQuery::all(self.max_result_window))
            .await
    }

    /// Store metadata of a new file and return its id
    ///
    /// The file is tagged with its category when the extension maps to one.
    pub async fn upload(&self, file_name: String, file_size: i64) -> Result<String> {
        let tags: BTreeSet<String> = self.classifier.classify(&file_name).into_iter().collect();

        let stored = self
            .repository
            .insert(NewStoredFile {
                file_name,
                file_size,
                tags,
            })
            .await?;

        info!(
            "File stored: id={}, name={}, size={}, tags={:?}",
            stored.id, stored.file_name, stored.file_size, stored.tags
        );

        Ok(stored.id)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.find_existing(id).await?;

        // A concurrent delete may win between lookup and removal
        if !self.repository.delete(id).await? {
            return Err(AppError::FileNotFound(id.to_string()));
        }

        info!("File deleted: id={}", id);
        Ok(())
    }

    pub async fn assign_tags(&self, id: &str, tags: &BTreeSet<String>) -> Result<()> {
        self.update_tags(id, |file_tags| Ok(tag_set::assign(file_tags, tags)))
        .await?;

        debug!("Tags assigned: id={}, tags={:?}", id, tags);
        Ok(())
    }

    /// Remove tags from a file, all of them or none
    pub async fn remove_tags(&self, id: &str, tags: &BTreeSet<String>) -> Result<()> {
        self.update_tags(id, |file_tags| {
            tag_set::remove(file_tags, tags)
                .map(|()| !tags.is_empty())
                .map_err(|missing| AppError::TagsNotFound {
                    id: id.to_string(),
                    missing,
                })
        })
        .await?;

        debug!("Tags removed: id={}, tags={:?}", id, tags);
        Ok(())
    }

    /// Filtered and paginated search
    ///
    /// `tags` of `None` or an empty set applies no tag constraint, an empty
    /// `name_filter` applies no name constraint. `page` is zero-based.
    pub async fn search(
        &self,
        tags: Option<BTreeSet<String>>,
        page: u32,
        size: u32,
        name_filter: &str,
    ) -> Result<SearchPage> {
        let query = FileQuery::new(tags, name_filter, page, size);

        if query.window_end() > self.max_result_window {
            return Err(AppError::BadRequest(format!(
                "page * size + size must not exceed {}",
                self.max_result_window
            )));
        }

        let total = self.repository.count(&query).await?;
        let files = self.repository.search(&query).await?;

        Ok(SearchPage { total, files })
    }

    async fn find_existing(&self, id: &str) -> Result<StoredFile> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(id.to_string()))
    }

    /// Read-modify-write of a file's tags, retried on version conflicts
    ///
    /// `mutate` reports whether it changed the set; unchanged files are not
    /// written.
    async fn update_tags<F>(&self, id: &str, mutate: F) -> Result<()>
    where
        F: Fn(&mut BTreeSet<String>) -> Result<bool>,
    {
        let mut attempt = 0;
        loop {
            let mut file = self.find_existing(id).await?;
            if !mutate(&mut file.tags)? {
                return Ok(());
            }

            match self.repository.update(&file).await {
                Ok(_) => return Ok(()),
                Err(AppError::Conflict(_)) if attempt < self.max_update_retries => {
                    attempt += 1;
                    warn!(
                        "Concurrent tag update on file {}, retrying ({}/{})",
                        id, attempt, self.max_update_retries
                    );
                }
                Err(AppError::Conflict(_)) => {
                    return Err(AppError::Conflict(format!(
                        "file {} is being modified concurrently, try again",
                        id
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }
}
