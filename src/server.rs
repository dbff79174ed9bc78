use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::routes;
use crate::state::AppState;
use crate::store::{self, Store};

/// Build the application router over the given state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(handlers::health_handler))
        .route(
            routes::BLOG_LIST,
            get(handlers::list_handler).post(handlers::create_handler),
        )
        .route(routes::BLOG_AUTHOR, get(handlers::author_handler))
        .route(
            routes::BLOG_ITEM,
            get(handlers::get_handler)
                .put(handlers::update_handler)
                .delete(handlers::delete_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
}

/// A running HTTP listener together with its document store
pub struct Server {
    local_addr: SocketAddr,
    store: Store,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl Server {
    /// Connect to the store, then bind the listener on `host:port`.
    ///
    /// If binding fails the store is closed before the error is returned.
    pub async fn start(database_url: &str, host: &str, port: u16) -> Result<Self> {
        let store = store::connect(database_url)
            .await
            .context("Failed to connect to document store")?;

        Self::start_with_store(store, host, port).await
    }

    /// Bind the listener over an already connected store.
    ///
    /// The store is owned by the server from here on and is closed on failure.
    pub async fn start_with_store(store: Store, host: &str, port: u16) -> Result<Self> {
        let listener = match TcpListener::bind((host, port)).await {
            Ok(listener) => listener,
            Err(e) => {
                store.close().await;
                return Err(e).with_context(|| format!("Failed to bind to {}:{}", host, port));
            }
        };

        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                store.close().await;
                return Err(e).context("Failed to read listener address");
            }
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let router = app(AppState {
            store: store.clone(),
        });

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!("Listening on {}", local_addr);

        Ok(Self {
            local_addr,
            store,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Stop accepting connections, wait for in-flight requests, then close
    /// the store. Calling it again is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let served = match self.task.take() {
            Some(task) => task.await.context("HTTP server task panicked"),
            None => return Ok(()),
        };

        // The store is released even when the listener failed
        self.store.close().await;
        tracing::info!("Server on {} stopped", self.local_addr);

        served?.context("HTTP server error")
    }
}
