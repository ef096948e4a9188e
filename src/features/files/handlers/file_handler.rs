use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::files::dtos::{
    validate_tags, FilteredPageResponseDto, SearchFilesQuery, StoredFileDto, UploadFileDto,
    UploadFileResponseDto,
};
use crate::features::files::services::StorageService;
use crate::shared::types::{ApiErrorResponse, SuccessResponse};
use crate::shared::validation::validation_messages;

/// List every stored file
#[utoipa::path(
    get,
    path = "/file/all",
    tag = "files",
    responses(
        (status = 200, description = "All stored files", body = Vec<StoredFileDto>)
    )
)]
pub async fn list_all_files(
    State(service): State<Arc<StorageService>>,
) -> Result<Json<Vec<StoredFileDto>>> {
    let files = service.list_all().await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// Store metadata of a file
///
/// The file gets a category tag (audio, video, text, image) when its
/// extension maps to one.
#[utoipa::path(
    post,
    path = "/file",
    tag = "files",
    request_body = UploadFileDto,
    responses(
        (status = 200, description = "File stored", body = UploadFileResponseDto),
        (status = 400, description = "Validation error", body = ApiErrorResponse)
    )
)]
pub async fn upload_file(
    State(service): State<Arc<StorageService>>,
    AppJson(dto): AppJson<UploadFileDto>,
) -> Result<Json<UploadFileResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    // `size` is present once validation passed
    let id = service
        .upload(dto.name, dto.size.unwrap_or_default())
        .await?;
    Ok(Json(UploadFileResponseDto { id }))
}

/// Delete a file by id
#[utoipa::path(
    delete,
    path = "/file/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File deleted", body = SuccessResponse),
        (status = 404, description = "File not found", body = ApiErrorResponse)
    )
)]
pub async fn delete_file(
    State(service): State<Arc<StorageService>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    service.delete_by_id(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Add tags to a file
#[utoipa::path(
    post,
    path = "/file/{id}/tags",
    tag = "files",
    params(
        ("id" = String, Path, description = "File id")
    ),
    request_body = Vec<String>,
    responses(
        (status = 200, description = "Tags assigned", body = SuccessResponse),
        (status = 400, description = "Invalid tags", body = ApiErrorResponse),
        (status = 404, description = "File not found", body = ApiErrorResponse)
    )
)]
pub async fn assign_tags(
    State(service): State<Arc<StorageService>>,
    Path(id): Path<String>,
    AppJson(tags): AppJson<BTreeSet<String>>,
) -> Result<Json<SuccessResponse>> {
    validate_tags(&tags)?;

    service.assign_tags(&id, &tags).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Remove tags from a file
///
/// Fails without changing anything if any of the tags is not on the file.
#[utoipa::path(
    delete,
    path = "/file/{id}/tags",
    tag = "files",
    params(
        ("id" = String, Path, description = "File id")
    ),
    request_body = Vec<String>,
    responses(
        (status = 200, description = "Tags removed", body = SuccessResponse),
        (status = 400, description = "Some tags are not on the file", body = ApiErrorResponse),
        (status = 404, description = "File not found", body = ApiErrorResponse)
    )
)]
pub async fn remove_tags(
    State(service): State<Arc<StorageService>>,
    Path(id): Path<String>,
    AppJson(tags): AppJson<BTreeSet<String>>,
) -> Result<Json<SuccessResponse>> {
    validate_tags(&tags)?;

    service.remove_tags(&id, &tags).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Search files by tags and name with pagination
#[utoipa::path(
    get,
    path = "/file",
    tag = "files",
    params(
        SearchFilesQuery,
        ("tags" = Option<Vec<String>>, Query,
            description = "Tags a file must all carry, repeated or comma separated")
    ),
    responses(
        (status = 200, description = "Page of matching files", body = FilteredPageResponseDto),
        (status = 400, description = "Invalid query parameters", body = ApiErrorResponse)
    )
)]
pub async fn search_files(
    State(service): State<Arc<StorageService>>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> Result<Json<FilteredPageResponseDto>> {
    let query = SearchFilesQuery::from_pairs(pairs)?;
    query
        .validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let page = service
        .search(query.tag_filter(), query.page, query.size, &query.q)
        .await?;

    Ok(Json(page.into()))
}
