use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use pagedrop_records::{PageId, PageRecord, PageUpdate};
use serde::Serialize;
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::service::{DeployRequest, PageService};

/// A page as returned by the JSON API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub html_hash: String,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    pub sort_order: i64,
}

impl From<PageRecord> for PageSummary {
    fn from(record: PageRecord) -> Self {
        Self {
            id: record.page_id.to_string(),
            title: record.title,
            description: record.description,
            html_hash: record.identifier.into_string(),
            share_url: record.share_url,
            created_at: record.created_at,
            sort_order: record.sort_order,
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(service): State<Arc<PageService>>) -> Json<serde_json::Value> {
    let config = service.config();
    Json(json!({
        "name": "pagedrop-server",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": service.content().backend_name(),
        "maxUnit": config.storage.chunk_config().map(|c| c.max_unit),
        "deleteMode": config.delete_mode,
        "publicBaseUrl": config.public_base_url,
    }))
}

pub async fn list_handler(
    State(service): State<Arc<PageService>>,
) -> ServerResult<Json<Vec<PageSummary>>> {
    let pages = service.list().await?;
    Ok(Json(pages.into_iter().map(PageSummary::from).collect()))
}

pub async fn deploy_handler(
    State(service): State<Arc<PageService>>,
    Json(request): Json<DeployRequest>,
) -> ServerResult<(StatusCode, Json<PageSummary>)> {
    let record = service.deploy(request).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn get_handler(
    State(service): State<Arc<PageService>>,
    Path(page_id): Path<String>,
) -> ServerResult<Json<PageSummary>> {
    let record = service.get(&PageId::new(page_id)).await?;
    Ok(Json(record.into()))
}

pub async fn update_handler(
    State(service): State<Arc<PageService>>,
    Path(page_id): Path<String>,
    Json(update): Json<PageUpdate>,
) -> ServerResult<Json<PageSummary>> {
    let record = service.update(&PageId::new(page_id), update).await?;
    Ok(Json(record.into()))
}

pub async fn delete_handler(
    State(service): State<Arc<PageService>>,
    Path(page_id): Path<String>,
) -> ServerResult<StatusCode> {
    service.delete(&PageId::new(page_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serve stored HTML. Misses render a small HTML page instead of JSON.
pub async fn view_handler(
    State(service): State<Arc<PageService>>,
    Path(key): Path<String>,
) -> Response {
    match service.view(&key).await {
        Ok(html) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(ServerError::ContentNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Html(
                "<!DOCTYPE html><html><head><title>Not found</title></head>\
                 <body><h1>Page not found</h1></body></html>",
            ),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedrop_types::Identifier;

    #[test]
    fn summary_uses_api_field_names() {
        let record = PageRecord {
            page_id: PageId::new("p1"),
            title: "Home".into(),
            description: String::new(),
            identifier: Identifier::new("abc12345").unwrap(),
            share_url: "http://localhost:3000/view/abc12345".into(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            sort_order: 2,
            archived: false,
        };
        let json = serde_json::to_value(PageSummary::from(record)).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["htmlHash"], "abc12345");
        assert_eq!(json["shareUrl"], "http://localhost:3000/view/abc12345");
        assert_eq!(json["sortOrder"], 2);
        assert!(json.get("archived").is_none());
    }
}
