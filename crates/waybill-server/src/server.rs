use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use waybill_audit::AuditTrailService;
use waybill_ledger::{HttpLedgerClient, LedgerClient};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Waybill HTTP server.
pub struct WaybillServer {
    config: ServerConfig,
    state: AppState,
}

impl WaybillServer {
    /// Build a server over an already constructed ledger client.
    pub fn new(config: ServerConfig, ledger: Arc<dyn LedgerClient>) -> Self {
        let mut audit = AuditTrailService::new(ledger);
        if let Some(explorer) = &config.explorer_url {
            audit = audit.with_explorer_url(explorer.clone());
        }
        Self {
            config,
            state: AppState::new(audit),
        }
    }

    /// Build a server talking to the node named in `config`.
    pub fn connect(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let ledger = HttpLedgerClient::with_timeout(&config.node_url, config.request_timeout());
        Ok(Self::new(config, Arc::new(ledger)))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router with tracing and CORS layers (useful for testing).
    pub fn router(&self) -> Router {
        let mut router = build_router(self.state.clone()).layer(TraceLayer::new_for_http());
        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        router
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            node = %self.state.audit.ledger().node_url(),
            "Waybill server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
