//! HTTP server: the page, its assets, and the JSON API

use std::num::NonZeroU16;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::db::history::{DbHistoryStore, HistoryStore};
use crate::llm::TextModel;
use crate::random::{RandomSource, ThreadRandom};

mod api;
mod history;
mod images;
pub(crate) mod prelude;
mod views;

#[derive(Clone)]
pub(crate) struct AppState {
    text_model: Option<Arc<dyn TextModel>>,
    pub(crate) random: Arc<dyn RandomSource>,
    pub(crate) history: Arc<dyn HistoryStore>,
    pub(crate) image_dir: PathBuf,
}

impl AppState {
    fn new(
        image_dir: PathBuf,
        text_model: Option<Arc<dyn TextModel>>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            text_model,
            random: Arc::new(ThreadRandom),
            history,
            image_dir,
        }
    }

    #[cfg(test)]
    fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Whether a language model is configured. Individual calls may still
    /// fall back to the rule-based generators.
    pub(crate) fn ai_enabled(&self) -> bool {
        self.text_model.is_some()
    }

    pub(crate) fn text_model(&self) -> Option<&dyn TextModel> {
        self.text_model.as_deref()
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(views::root_handler))
        .route("/static/styles.css", get(views::styles_handler))
        .route("/static/app.js", get(views::app_js_handler))
        .route("/memes/{file}", get(images::template_image_handler))
        .route("/api/templates", get(api::templates_handler))
        .route(
            "/api/generate-dialogue",
            post(api::generate_dialogue_handler),
        )
        .route("/api/generate-meme", post(api::generate_meme_handler))
        .route(
            "/api/history/{kind}",
            get(history::list_history_handler)
                .post(history::save_history_handler)
                .delete(history::clear_history_handler),
        )
        .route(
            "/api/history/{kind}/{id}",
            delete(history::delete_history_entry_handler),
        )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Serves the app on `listen_addr:port` until ctrl-c.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    image_dir: PathBuf,
    text_model: Option<Arc<dyn TextModel>>,
    db: DatabaseConnection,
) -> Result<(), anyhow::Error> {
    if text_model.is_some() {
        info!("Language model configured, AI generation enabled");
    } else {
        info!("No language model configured, using rule-based generation only");
    }
    let history: Arc<dyn HistoryStore> = Arc::new(DbHistoryStore::new(db));
    let app = create_router().with_state(AppState::new(image_dir, text_model, history));

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}
