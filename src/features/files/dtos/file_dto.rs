use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::AppError;
use crate::features::files::models::StoredFile;
use crate::features::files::services::SearchPage;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_TAG_LENGTH};

/// Request DTO for storing file metadata
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UploadFileDto {
    /// File name, an optional extension decides the category tag
    #[serde(default)]
    #[validate(
        length(min = 1, message = "name of file must not be empty"),
        custom(function = "crate::shared::validation::validate_file_name_length"),
        regex(
            path = "*crate::shared::validation::FILE_NAME_REGEX",
            message = "name of file contains forbidden characters"
        )
    )]
    #[schema(example = "song.mp3")]
    pub name: String,

    /// Size of the file in bytes
    #[validate(
        required(message = "size of file must not be null"),
        range(min = 0, message = "size of file must not be less than 0")
    )]
    #[schema(example = 1024)]
    pub size: Option<i64>,
}

/// Response DTO for a stored upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponseDto {
    /// Identifier assigned to the file
    pub id: String,
}

/// Response DTO for file metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFileDto {
    pub id: String,
    pub file_name: String,
    pub file_size: i64,
    pub tags: Vec<String>,
}

impl From<StoredFile> for StoredFileDto {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            file_name: file.file_name,
            file_size: file.file_size,
            tags: file.tags.into_iter().collect(),
        }
    }
}

/// Query parameters for filtered, paginated search
///
/// `tags` may be repeated (`tags=a&tags=b`) and each value may hold a comma
/// separated list (`tags=a,b`), so it is collected by [`Self::from_pairs`]
/// rather than by the derived deserializer.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchFilesQuery {
    /// Zero-based page index (default: 0)
    #[serde(default)]
    #[param(minimum = 0)]
    pub page: u32,

    /// Number of files per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100)]
    pub size: u32,

    /// Tags a file must all carry
    #[serde(skip)]
    pub tags: Vec<String>,

    /// Substring the file name must contain
    #[serde(default)]
    #[param(example = "test")]
    pub q: String,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn invalid_query(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(format!("Invalid query parameters: {}", e))
}

impl SearchFilesQuery {
    /// Build the query from raw query string pairs
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let (tags, rest): (Vec<_>, Vec<_>) = pairs.into_iter().partition(|(key, _)| key == "tags");

        let encoded = serde_urlencoded::to_string(&rest).map_err(invalid_query)?;
        let mut query: Self = serde_urlencoded::from_str(&encoded).map_err(invalid_query)?;

        query.tags = tags.into_iter().map(|(_, value)| value).collect();
        Ok(query)
    }

    /// Parsed tag filter, `None` when no tag was given
    pub fn tag_filter(&self) -> Option<BTreeSet<String>> {
        let tags: BTreeSet<String> = self
            .tags
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        (!tags.is_empty()).then_some(tags)
    }
}

/// Response DTO for filtered, paginated search
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilteredPageResponseDto {
    /// Number of files matching the filter across all pages
    pub total: u64,
    /// Files of the requested page
    pub page: Vec<StoredFileDto>,
}

impl From<SearchPage> for FilteredPageResponseDto {
    fn from(page: SearchPage) -> Self {
        Self {
            total: page.total,
            page: page.files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reject blank or oversized tags in a tag request body
pub fn validate_tags(tags: &BTreeSet<String>) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if tags.iter().any(|t| t.trim().is_empty()) {
        errors.push("tags must not be blank".to_string());
    }
    if tags.iter().any(|t| t.chars().count() > MAX_TAG_LENGTH) {
        errors.push(format!("tags must not exceed {} characters", MAX_TAG_LENGTH));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::MAX_FILE_NAME_LENGTH;
    use crate::shared::validation::validation_messages;

    fn upload(name: &str, size: Option<i64>) -> UploadFileDto {
        UploadFileDto {
            name: name.to_string(),
            size,
        }
    }

    #[test]
    fn test_upload_valid() {
        assert!(upload("test.txt", Some(10)).validate().is_ok());
        assert!(upload("empty", Some(0)).validate().is_ok());
    }

    #[test]
    fn test_upload_empty_name() {
        let errors = upload("", Some(10)).validate().unwrap_err();
        assert_eq!(
            validation_messages(&errors),
            vec!["name of file must not be empty"]
        );
    }

    #[test]
    fn test_upload_negative_size() {
        let errors = upload("test", Some(-1)).validate().unwrap_err();
        assert_eq!(
            validation_messages(&errors),
            vec!["size of file must not be less than 0"]
        );
    }

    #[test]
    fn test_upload_missing_size() {
        let dto: UploadFileDto = serde_json::from_str(r#"{"name":"test"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            validation_messages(&errors),
            vec!["size of file must not be null"]
        );
    }

    #[test]
    fn test_upload_name_too_long() {
        let longest = "a".repeat(MAX_FILE_NAME_LENGTH);
        assert!(upload(&longest, Some(1)).validate().is_ok());

        let errors = upload(&format!("{}.txt", longest), Some(1))
            .validate()
            .unwrap_err();
        assert_eq!(
            validation_messages(&errors),
            vec!["name of file must not exceed 255 characters"]
        );
    }

    #[test]
    fn test_upload_forbidden_name() {
        let errors = upload("../etc/passwd", Some(1)).validate().unwrap_err();
        assert_eq!(
            validation_messages(&errors),
            vec!["name of file contains forbidden characters"]
        );
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_search_query_defaults() {
        let query = SearchFilesQuery::from_pairs(Vec::new()).unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 10);
        assert_eq!(query.q, "");
        assert_eq!(query.tag_filter(), None);
    }

    #[test]
    fn test_tag_filter_parsing() {
        let query = SearchFilesQuery::from_pairs(pairs(&[("tags", " a, b,,a ")])).unwrap();
        let expected: BTreeSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(query.tag_filter(), Some(expected));

        let blank = SearchFilesQuery::from_pairs(pairs(&[("tags", " , ")])).unwrap();
        assert_eq!(blank.tag_filter(), None);
    }

    #[test]
    fn test_repeated_tags_are_collected() {
        let query = SearchFilesQuery::from_pairs(pairs(&[
            ("tags", "audio"),
            ("page", "2"),
            ("tags", "x,y"),
            ("q", "song"),
        ]))
        .unwrap();

        let expected: BTreeSet<String> =
            ["audio", "x", "y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(query.tag_filter(), Some(expected));
        assert_eq!(query.page, 2);
        assert_eq!(query.q, "song");
    }

    #[test]
    fn test_search_query_rejects_malformed_numbers() {
        let result = SearchFilesQuery::from_pairs(pairs(&[("page", "abc")]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_search_query_size_bounds() {
        let mut query = SearchFilesQuery::from_pairs(pairs(&[("size", "0")])).unwrap();
        assert!(query.validate().is_err());
        query.size = 101;
        assert!(query.validate().is_err());
        query.size = 100;
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validate_tags() {
        let ok: BTreeSet<String> = BTreeSet::from(["tag".to_string()]);
        assert!(validate_tags(&ok).is_ok());

        let blank: BTreeSet<String> = BTreeSet::from(["  ".to_string()]);
        assert!(matches!(
            validate_tags(&blank),
            Err(AppError::Validation(errors)) if errors == vec!["tags must not be blank"]
        ));

        let long: BTreeSet<String> = BTreeSet::from(["x".repeat(MAX_TAG_LENGTH + 1)]);
        assert!(validate_tags(&long).is_err());
    }
}
