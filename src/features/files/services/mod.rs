mod file_query;
mod file_type;
mod storage_service;
pub mod tag_set;

pub use file_query::FileQuery;
pub use file_type::FileTypeClassifier;
pub use storage_service::{SearchPage, StorageService};
