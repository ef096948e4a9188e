use std::collections::BTreeSet;

use serde_json::{json, Value};

use crate::features::files::models::StoredFile;
use crate::modules::search::escape_wildcard;

/// Filtered, paginated file query
///
/// The same value drives both the total count and the page fetch, so the
/// two always agree on the predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    /// Tags a file must all carry; empty means no tag constraint
    pub tags: BTreeSet<String>,
    /// Substring the file name must contain; empty means no name constraint
    pub name_contains: String,
    pub offset: u64,
    pub limit: u64,
}

impl FileQuery {
    /// Build a query from a zero-based page index and page size
    pub fn new(
        tags: Option<BTreeSet<String>>,
        name_contains: impl Into<String>,
        page: u32,
        size: u32,
    ) -> Self {
        Self {
            tags: tags.unwrap_or_default(),
            name_contains: name_contains.into(),
            offset: u64::from(page) * u64::from(size),
            limit: u64::from(size),
        }
    }

    /// Query that matches every file, for listing
    pub fn all(limit: u64) -> Self {
        Self {
            tags: BTreeSet::new(),
            name_contains: String::new(),
            offset: 0,
            limit,
        }
    }

    /// Last position (exclusive) the page reaches into the result set
    pub fn window_end(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }

    /// The predicate part, shared by `_count` and `_search`
    pub fn to_es_query(&self) -> Value {
        let mut filters: Vec<Value> = self
            .tags
            .iter()
            .map(|tag| json!({ "term": { "tags": tag } }))
            .collect();

        if !self.name_contains.is_empty() {
            filters.push(json!({
                "wildcard": {
                    "filename": { "value": format!("*{}*", escape_wildcard(&self.name_contains)) }
                }
            }));
        }

        if filters.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "bool": { "filter": filters } })
        }
    }

    /// Full `_search` body including pagination
    ///
    /// Pages are ordered by id, which follows insertion order for v7 ids.
    pub fn to_es_search_body(&self) -> Value {
        json!({
            "query": self.to_es_query(),
            "from": self.offset,
            "size": self.limit,
            "sort": [{ "id": "asc" }],
            "seq_no_primary_term": true,
        })
    }

    /// Evaluate the predicate against a file in memory
    pub fn matches(&self, file: &StoredFile) -> bool {
        self.tags.is_subset(&file.tags) && file.file_name.contains(&self.name_contains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, tags: &[&str]) -> StoredFile {
        StoredFile {
            id: name.to_string(),
            file_name: name.to_string(),
            file_size: 1,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            version: None,
        }
    }

    #[test]
    fn test_no_constraints_matches_all() {
        let query = FileQuery::new(None, "", 0, 10);
        assert_eq!(query.to_es_query(), json!({ "match_all": {} }));
        assert!(query.matches(&file("anything", &[])));
    }

    #[test]
    fn test_empty_tag_set_is_no_constraint() {
        let query = FileQuery::new(Some(BTreeSet::new()), "", 0, 10);
        assert_eq!(query, FileQuery::new(None, "", 0, 10));
    }

    #[test]
    fn test_tags_render_one_term_each() {
        let tags = BTreeSet::from(["a".to_string(), "b".to_string()]);
        let query = FileQuery::new(Some(tags), "", 0, 10);

        assert_eq!(
            query.to_es_query(),
            json!({ "bool": { "filter": [
                { "term": { "tags": "a" } },
                { "term": { "tags": "b" } }
            ] } })
        );
    }

    #[test]
    fn test_name_filter_renders_escaped_wildcard() {
        let query = FileQuery::new(None, "te*st", 0, 10);
        assert_eq!(
            query.to_es_query(),
            json!({ "bool": { "filter": [
                { "wildcard": { "filename": { "value": "*te\\*st*" } } }
            ] } })
        );
    }

    #[test]
    fn test_pagination_offsets() {
        let query = FileQuery::new(None, "", 3, 20);
        assert_eq!(query.offset, 60);
        assert_eq!(query.limit, 20);
        assert_eq!(query.window_end(), 80);

        let body = query.to_es_search_body();
        assert_eq!(body["from"], 60);
        assert_eq!(body["size"], 20);
        assert_eq!(body["seq_no_primary_term"], true);
    }

    #[test]
    fn test_search_body_sorts_by_id() {
        let body = FileQuery::new(None, "", 0, 10).to_es_search_body();
        assert_eq!(body["sort"], json!([{ "id": "asc" }]));
    }

    #[test]
    fn test_matches_requires_all_tags_and_substring() {
        let tags = BTreeSet::from(["a".to_string(), "b".to_string()]);
        let query = FileQuery::new(Some(tags), "test", 0, 10);

        assert!(query.matches(&file("my_test.txt", &["a", "b", "c"])));
        assert!(!query.matches(&file("my_test.txt", &["a"])));
        assert!(!query.matches(&file("other.txt", &["a", "b"])));
    }
}
