use axum::{
    routing::{get, post},
    Router,
};
use osn_core::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod state;
pub mod views;

pub use state::{AppState, View};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/create", get(handlers::create_form).post(handlers::create_submit))
        .route("/articles", get(handlers::list_page))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/articles", get(handlers::list_articles).post(handlers::create_article))
        .route("/api/articles/:filename", get(handlers::get_article))
        .route("/api/resolve", get(handlers::resolve))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use osn_core::{Article, Error, Result};
    pub use crate::{AppState, View};
}
