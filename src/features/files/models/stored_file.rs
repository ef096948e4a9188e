use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::modules::search::DocVersion;

/// Metadata of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    pub file_name: String,
    pub file_size: i64,
    pub tags: BTreeSet<String>,
    /// Version read from the index, used to detect concurrent writers
    pub version: Option<DocVersion>,
}

/// A file about to be persisted; the repository assigns its id
#[derive(Debug, Clone)]
pub struct NewStoredFile {
    pub file_name: String,
    pub file_size: i64,
    pub tags: BTreeSet<String>,
}

/// Index document shape of a stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDocument {
    pub id: String,
    pub filename: String,
    pub filesize: i64,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl StoredFile {
    pub fn from_document(doc: FileDocument, version: Option<DocVersion>) -> Self {
        Self {
            id: doc.id,
            file_name: doc.filename,
            file_size: doc.filesize,
            tags: doc.tags,
            version,
        }
    }

    pub fn to_document(&self) -> FileDocument {
        FileDocument {
            id: self.id.clone(),
            filename: self.file_name.clone(),
            filesize: self.file_size,
            tags: self.tags.clone(),
        }
    }
}

impl NewStoredFile {
    pub fn into_stored(self, id: String, version: Option<DocVersion>) -> StoredFile {
        StoredFile {
            id,
            file_name: self.file_name,
            file_size: self.file_size,
            tags: self.tags,
            version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_uses_index_field_names() {
        let file = StoredFile {
            id: "1".to_string(),
            file_name: "song.mp3".to_string(),
            file_size: 42,
            tags: BTreeSet::from(["audio".to_string()]),
            version: None,
        };

        assert_eq!(
            serde_json::to_value(file.to_document()).unwrap(),
            json!({ "id": "1", "filename": "song.mp3", "filesize": 42, "tags": ["audio"] })
        );
    }

    #[test]
    fn test_document_without_tags_defaults_to_empty_set() {
        let doc: FileDocument =
            serde_json::from_value(json!({ "id": "1", "filename": "a", "filesize": 0 })).unwrap();
        let file = StoredFile::from_document(doc, None);
        assert!(file.tags.is_empty());
    }
}
