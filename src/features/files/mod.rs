//! File metadata storage with tag based search.
//!
//! Only metadata is stored: name, size and tags. Uploading a file seeds
//! its tags with a category derived from the extension.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/file/all` | List every stored file |
//! | POST | `/file` | Store file metadata |
//! | DELETE | `/file/{id}` | Delete a file |
//! | POST | `/file/{id}/tags` | Assign tags |
//! | DELETE | `/file/{id}/tags` | Remove tags (all or none) |
//! | GET | `/file?page=&size=&tags=&q=` | Filtered, paginated search |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use services::StorageService;
