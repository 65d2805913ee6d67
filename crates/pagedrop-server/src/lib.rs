//! HTTP server for pagedrop.
//!
//! Accepts HTML pages over a JSON API, stores each payload under a short
//! derived identifier, and serves it back at `/view/{identifier}`.
//!
//! # Endpoints
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/health` | liveness |
//! | GET | `/api/info` | version and storage backend |
//! | GET | `/api/deployments` | active pages in list order |
//! | POST | `/api/deploy` | store a page, `201` with its summary |
//! | GET/PATCH/DELETE | `/api/deployments/{page_id}` | one page |
//! | GET | `/view/{key}` | raw HTML by identifier or title |

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod service;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::PageSummary;
pub use server::PagedropServer;
pub use service::{DeployRequest, PageService};

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        PagedropServer::new(ServerConfig::default()).unwrap().router()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (status, body) = send(&app(), get("/api/info")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["storage"], "chunked");
        assert_eq!(body["deleteMode"], "archive");
        assert_eq!(body["maxUnit"], 2000);
    }

    #[tokio::test]
    async fn info_reports_no_max_unit_for_unchunked_storage() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ServerConfig {
            storage: pagedrop_store::StorageConfig::Filesystem {
                root: dir.path().to_path_buf(),
            },
            ..ServerConfig::default()
        };
        let app = PagedropServer::new(config).unwrap().router();
        let (_, body) = send(&app, get("/api/info")).await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["storage"], "filesystem");
        assert!(body["maxUnit"].is_null());
    }

    #[tokio::test]
    async fn deploy_view_delete_flow() {
        let app = app();
        let html = format!("<html><body>{}</body></html>", "x".repeat(5000));

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/deploy",
                json!({ "title": "测试5", "htmlContent": html, "description": "big" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let page: Value = serde_json::from_slice(&body).unwrap();
        let id = page["id"].as_str().unwrap().to_string();
        let hash = page["htmlHash"].as_str().unwrap().to_string();
        assert_eq!(hash.len(), 8);
        assert_eq!(
            page["shareUrl"],
            format!("http://localhost:3000/view/{hash}")
        );

        let response = app.clone().oneshot(get(&format!("/view/{hash}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let served = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(served, html.as_bytes());

        let (status, body) = send(&app, get("/api/deployments")).await;
        assert_eq!(status, StatusCode::OK);
        let list: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/deployments/{id}"),
                json!({ "title": "Renamed" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let page: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(page["title"], "Renamed");

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/deployments/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, get(&format!("/view/{hash}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8(body).unwrap().contains("Page not found"));

        let (status, body) = send(&app, get(&format!("/api/deployments/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().contains(&id));
    }

    #[tokio::test]
    async fn deploy_rejects_missing_content() {
        let (status, _) = send(
            &app(),
            json_request("POST", "/api/deploy", json!({ "title": "t", "htmlContent": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_deploy_conflicts() {
        let app = app();
        let body = json!({ "title": "t", "htmlContent": "<p>same</p>" });
        let (status, _) = send(&app, json_request("POST", "/api/deploy", body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, json_request("POST", "/api/deploy", body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn view_by_title() {
        let app = app();
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/deploy",
                json!({ "title": "landing", "htmlContent": "<h1>hi</h1>" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&app, get("/view/landing")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>hi</h1>");
    }
}
