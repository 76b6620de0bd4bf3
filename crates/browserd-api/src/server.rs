//! HTTP server bootstrap.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::http::routes::create_router;
use crate::state::AppState;

/// Server startup and runtime failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// The REST server.
pub struct ApiServer {
    addr: String,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            addr: state.config().server.addr(),
            state,
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        TcpListener::bind(&self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr.clone(),
                source,
            })
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.state.clone());
        info!("browserd listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("HTTP server shutting down");
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use browserd_config::Config;

    fn state_on(host: &str, port: u16) -> Arc<AppState> {
        let mut config = Config::default();
        config.server.host = host.to_string();
        config.server.port = port;
        Arc::new(AppState::new(config))
    }

    #[test]
    fn test_server_addr() {
        let server = ApiServer::new(state_on("127.0.0.1", 18850));
        assert_eq!(server.addr(), "127.0.0.1:18850");
    }

    #[tokio::test]
    async fn test_bind_and_shutdown() {
        let server = ApiServer::new(state_on("127.0.0.1", 0));
        let listener = server.bind().await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
        });
        tx.send(()).unwrap();
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_bind_failure_names_address() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let server = ApiServer::new(state_on("127.0.0.1", port));
        let err = server.bind().await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(err.to_string().contains(&format!("127.0.0.1:{}", port)));
    }
}
