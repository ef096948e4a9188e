use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::{ApiErrorResponse, SuccessResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        files_handlers::list_all_files,
        files_handlers::upload_file,
        files_handlers::delete_file,
        files_handlers::assign_tags,
        files_handlers::remove_tags,
        files_handlers::search_files,
    ),
    components(
        schemas(
            SuccessResponse,
            ApiErrorResponse,
            files_dtos::UploadFileDto,
            files_dtos::UploadFileResponseDto,
            files_dtos::StoredFileDto,
            files_dtos::FilteredPageResponseDto,
        )
    ),
    tags(
        (name = "files", description = "File metadata and tag management"),
    ),
    info(
        title = "File Tag Storage API",
        version = "0.1.0",
        description = "Store file metadata, tag files and search them by tags and name",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
