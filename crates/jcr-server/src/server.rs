use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// JSON Change Report HTTP server.
pub struct JcrServer {
    state: AppState,
}

impl JcrServer {
    pub fn new(config: AppConfig) -> ServerResult<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.state.config.server.bind_addr;
        let app = build_router(self.state);
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("JCR server listening on {}", addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
