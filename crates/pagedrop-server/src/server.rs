use std::sync::Arc;

use pagedrop_records::{InMemoryRecordStore, RecordStore};
use pagedrop_store::{open_store, ContentStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::service::PageService;

/// pagedrop HTTP server.
pub struct PagedropServer {
    service: Arc<PageService>,
}

impl PagedropServer {
    /// Open the configured content store with an in-memory record store.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let content = open_store(&config.storage)?;
        Ok(Self::with_stores(
            content,
            Arc::new(InMemoryRecordStore::new()),
            config,
        ))
    }

    pub fn with_stores(
        content: Arc<dyn ContentStore>,
        records: Arc<dyn RecordStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            service: Arc::new(PageService::new(content, records, config)),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        self.service.config()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.service))
    }

    /// Serve requests until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let addr = self.config().bind_addr;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            %addr,
            storage = self.service.content().backend_name(),
            "pagedrop server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
