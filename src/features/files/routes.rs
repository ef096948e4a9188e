use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers;
use crate::features::files::services::StorageService;

/// Create routes for the files feature
pub fn routes(service: Arc<StorageService>) -> Router {
    Router::new()
        // "/file/all" must come before "/file/{id}"
        .route("/file/all", get(handlers::list_all_files))
        .route(
            "/file",
            get(handlers::search_files).post(handlers::upload_file),
        )
        .route("/file/{id}", delete(handlers::delete_file))
        .route(
            "/file/{id}/tags",
            post(handlers::assign_tags).delete(handlers::remove_tags),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::repository::{FileRepository, InMemoryFileRepository};
    use crate::features::files::services::{FileQuery, FileTypeClassifier};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use fake::{faker::lorem::en::Word, Fake};
    use serde_json::{json, Value};

    fn test_server() -> (TestServer, Arc<InMemoryFileRepository>) {
        let repo = Arc::new(InMemoryFileRepository::new());
        let service = Arc::new(StorageService::new(
            repo.clone(),
            FileTypeClassifier::new(["audio", "video", "text", "image"]),
            3,
            10_000,
        ));
        let server = TestServer::new(routes(service)).unwrap();
        (server, repo)
    }

    async fn upload(server: &TestServer, name: &str) -> String {
        let response = server
            .post("/file")
            .json(&json!({ "name": name, "size": 10 }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_upload_valid_returns_id() {
        let (server, repo) = test_server();
        let id = upload(&server, "test.txt").await;

        let file = repo.find_by_id(&id).await.unwrap().unwrap();
        assert!(file.tags.contains("text"));
    }

    #[tokio::test]
    async fn test_upload_empty_name() {
        let (server, _) = test_server();
        let response = server
            .post("/file")
            .json(&json!({ "name": "", "size": 10 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "name of file must not be empty");
    }

    #[tokio::test]
    async fn test_upload_negative_size() {
        let (server, _) = test_server();
        let response = server
            .post("/file")
            .json(&json!({ "name": "test", "size": -1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "size of file must not be less than 0"
        );
    }

    #[tokio::test]
    async fn test_upload_missing_size() {
        let (server, _) = test_server();
        let response = server.post("/file").json(&json!({ "name": "test" })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "size of file must not be null"
        );
    }

    #[tokio::test]
    async fn test_upload_name_too_long() {
        let (server, repo) = test_server();
        let response = server
            .post("/file")
            .json(&json!({ "name": "a".repeat(40_000), "size": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "name of file must not exceed 255 characters"
        );
        assert_eq!(repo.count(&FileQuery::all(10)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_malformed_json() {
        let (server, _) = test_server();
        let response = server
            .post("/file")
            .bytes(axum::body::Bytes::from_static(b"{not json"))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn test_list_all() {
        let (server, _) = test_server();
        upload(&server, "a.mp3").await;
        upload(&server, "b").await;

        let response = server.get("/file/all").await;
        response.assert_status_ok();

        let files = response.json::<Vec<Value>>();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f["fileName"].is_string()));
        assert!(files.iter().all(|f| f["fileSize"] == 10));
    }

    #[tokio::test]
    async fn test_delete_missing_file() {
        let (server, _) = test_server();
        let response = server.delete("/file/unknown").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "file not found, id: unknown");
    }

    #[tokio::test]
    async fn test_delete_existing_file() {
        let (server, repo) = test_server();
        let id = upload(&server, "a").await;

        let response = server.delete(&format!("/file/{}", id)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "success": true }));
        assert_eq!(repo.find_by_id(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_assign_and_remove_tags() {
        let (server, repo) = test_server();
        let id = upload(&server, "notes").await;
        let tag: String = Word().fake();

        server
            .post(&format!("/file/{}/tags", id))
            .json(&json!([tag, "keep"]))
            .await
            .assert_status_ok();

        server
            .delete(&format!("/file/{}/tags", id))
            .json(&json!([tag]))
            .await
            .assert_status_ok();

        let file = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(file.tags.into_iter().collect::<Vec<_>>(), vec!["keep"]);
    }

    #[tokio::test]
    async fn test_assign_tags_missing_file() {
        let (server, _) = test_server();
        server
            .post("/file/unknown/tags")
            .json(&json!(["a"]))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_assign_blank_tag() {
        let (server, _) = test_server();
        let id = upload(&server, "a").await;

        let response = server
            .post(&format!("/file/{}/tags", id))
            .json(&json!(["  "]))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "tags must not be blank");
    }

    #[tokio::test]
    async fn test_remove_missing_tags() {
        let (server, repo) = test_server();
        let id = upload(&server, "a").await;
        server
            .post(&format!("/file/{}/tags", id))
            .json(&json!(["tag1", "tag3"]))
            .await
            .assert_status_ok();

        let response = server
            .delete(&format!("/file/{}/tags", id))
            .json(&json!(["tag1", "tag2"]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            format!("tags: [tag2] not found on file with id: {}", id)
        );
        assert_eq!(body["details"], json!(["tag2"]));

        let file = repo.find_by_id(&id).await.unwrap().unwrap();
        assert!(file.tags.contains("tag1") && file.tags.contains("tag3"));
    }

    #[tokio::test]
    async fn test_search_by_name_and_tags() {
        let (server, _) = test_server();
        for _ in 0..3 {
            upload(&server, "test.mp3").await;
        }
        upload(&server, "test").await;
        upload(&server, "other.mp3").await;

        let response = server
            .get("/file")
            .add_query_param("q", "test")
            .add_query_param("tags", "audio")
            .add_query_param("page", 0)
            .add_query_param("size", 2)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["total"], 3);
        assert_eq!(body["page"].as_array().unwrap().len(), 2);
        assert_eq!(body["page"][0]["tags"], json!(["audio"]));
    }

    #[tokio::test]
    async fn test_search_with_repeated_tags() {
        let (server, _) = test_server();
        let id = upload(&server, "song.mp3").await;
        upload(&server, "other.mp3").await;
        server
            .post(&format!("/file/{}/tags", id))
            .json(&json!(["x"]))
            .await
            .assert_status_ok();

        let repeated = server.get("/file?tags=audio&tags=x").await;
        repeated.assert_status_ok();
        let body = repeated.json::<Value>();
        assert_eq!(body["total"], 1);
        assert_eq!(body["page"][0]["id"], id);

        let comma = server.get("/file?tags=audio,x").await;
        comma.assert_status_ok();
        assert_eq!(comma.json::<Value>(), body);
    }

    #[tokio::test]
    async fn test_search_defaults() {
        let (server, _) = test_server();
        upload(&server, "a").await;

        let response = server.get("/file").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["total"], 1);
    }

    #[tokio::test]
    async fn test_search_invalid_page() {
        let (server, _) = test_server();

        let response = server.get("/file").add_query_param("page", "abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], false);

        server
            .get("/file")
            .add_query_param("size", 0)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
