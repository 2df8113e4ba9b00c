//! HTTP Server
//!
//! Binds the listener and serves the user API until shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use super::handlers::{self, SharedEngine};

/// Build the user API router
///
/// Routes:
/// - `GET    /init`
/// - `POST   /users`
/// - `GET    /users?page&limit`
/// - `GET    /users/{id}`
/// - `PUT    /users/{id}`
/// - `DELETE /users/{id}`
///
/// Every route answers cross-origin requests from any origin.
pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/init", get(handlers::init))
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

/// HTTP server for the user API
pub struct Server {
    listener: TcpListener,
    engine: Arc<Engine>,
}

impl Server {
    /// Bind the configured listen address
    pub async fn bind(config: &Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).await?;
        Ok(Self { listener, engine })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until `shutdown` resolves
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Listening on http://{}", self.local_addr()?);

        axum::serve(self.listener, router(self.engine))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server stopped accepting requests");
        Ok(())
    }
}
