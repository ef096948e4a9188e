use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::{FileDocument, NewStoredFile, StoredFile};
use crate::features::files::repository::FileRepository;
use crate::features::files::services::FileQuery;
use crate::modules::search::{ElasticsearchClient, Hit};

/// Field mappings of the file index
///
/// `filename` is a keyword so substring search runs as a wildcard over the
/// whole name.
pub fn file_index_mappings() -> Value {
    json!({
        "properties": {
            "id": { "type": "keyword" },
            "filename": { "type": "keyword" },
            "filesize": { "type": "long" },
            "tags": { "type": "keyword" }
        }
    })
}

fn from_hit(hit: Hit<FileDocument>) -> StoredFile {
    let version = hit.version();
    let mut file = StoredFile::from_document(hit.source, version);
    file.id = hit.id;
    file
}

/// File repository backed by an Elasticsearch index
pub struct ElasticsearchFileRepository {
    client: ElasticsearchClient,
}

impl ElasticsearchFileRepository {
    pub fn new(client: ElasticsearchClient) -> Self {
        Self { client }
    }

    /// Create the file index with its mappings if it is missing
    pub async fn ensure_index(&self) -> Result<()> {
        self.client.ensure_index(&file_index_mappings()).await?;
        info!("File index '{}' ready", self.client.index_name());
        Ok(())
    }
}

#[async_trait]
impl FileRepository for ElasticsearchFileRepository {
    async fn insert(&self, file: NewStoredFile) -> Result<StoredFile> {
        let mut stored = file.into_stored(Uuid::now_v7().to_string(), None);
        let version = self
            .client
            .create_document(&stored.id, &stored.to_document())
            .await?;
        stored.version = Some(version);
        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredFile>> {
        let hit = self.client.get_document::<FileDocument>(id).await?;
        Ok(hit.map(from_hit))
    }

    async fn update(&self, file: &StoredFile) -> Result<StoredFile> {
        let version = self
            .client
            .update_document(&file.id, &file.to_document(), file.version)
            .await?;

        let mut updated = file.clone();
        updated.version = Some(version);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.client.delete_document(id).await
    }

    async fn count(&self, query: &FileQuery) -> Result<u64> {
        self.client.count(&query.to_es_query()).await
    }

    async fn search(&self, query: &FileQuery) -> Result<Vec<StoredFile>> {
        let hits = self
            .client
            .search::<FileDocument>(&query.to_es_search_body())
            .await?;
        Ok(hits.into_iter().map(from_hit).collect())
    }
}
