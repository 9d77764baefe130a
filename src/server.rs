//! Live view.
//!
//! An axum router that renders every page on request. The spreadsheet is
//! re-read for each request, so edits show up on reload without restarting
//! the server.
//!
//! | Route          | Page                                  |
//! |----------------|---------------------------------------|
//! | `/`            | feed                                  |
//! | `/post/:id`    | post detail, or the not-found page    |
//! | `/profiles`    | author cards                          |
//! | `/report`      | paginated print report                |
//! | `/clipping`    | feed + profiles, for the clipping PDF |
//! | `/static/*`    | files under the asset root            |

use crate::assets;
use crate::config::Project;
use crate::loader;
use crate::render::{self, Context, Links};
use crate::types::Dataset;
use crate::views;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use maud::Markup;
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub project: Arc<Project>,
}

impl AppState {
    pub fn new(project: Project) -> Self {
        Self {
            project: Arc::new(project),
        }
    }

    fn context(&self) -> Context<'_> {
        Context {
            site: &self.project.config.site,
            report: &self.project.config.report,
            links: Links::Live,
        }
    }

    /// Read the spreadsheet off the async runtime.
    async fn dataset(&self) -> Result<Dataset, AppError> {
        let path = self.project.data_path();
        tokio::task::spawn_blocking(move || loader::load_file(&path))
            .await
            .map_err(|err| AppError::internal(format!("loader task failed: {err}")))
    }
}

/// Handler failure, rendered as a plain HTML message.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(status = %self.status, message = %self.message, "request failed");
        let body = maud::html! {
            h1 { (self.status.to_string()) }
            p { (self.message) }
        };
        (self.status, Html(body.into_string())).into_response()
    }
}

type PageResult = Result<Html<String>, AppError>;

fn page(markup: Markup) -> Html<String> {
    Html(markup.into_string())
}

pub fn router(state: AppState) -> Router {
    let static_dir = state.project.static_dir();
    Router::new()
        .route("/", get(feed))
        .route("/post/:id", get(post))
        .route("/profiles", get(profiles))
        .route("/report", get(report))
        .route("/clipping", get(clipping))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

async fn feed(State(state): State<AppState>) -> PageResult {
    let dataset = state.dataset().await?;
    Ok(page(render::render_feed(&state.context(), &dataset)))
}

async fn post(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    let dataset = state.dataset().await?;
    let ctx = state.context();
    let response = match views::find_post(&dataset, &id) {
        Some(post) => page(render::render_post(&ctx, post)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            page(render::render_not_found(&ctx, &id)),
        )
            .into_response(),
    };
    Ok(response)
}

async fn profiles(State(state): State<AppState>) -> PageResult {
    let dataset = state.dataset().await?;
    Ok(page(render::render_profiles(&state.context(), &dataset)))
}

async fn report(State(state): State<AppState>) -> PageResult {
    let dataset = state.dataset().await?;
    Ok(page(render::render_report(&state.context(), &dataset)))
}

async fn clipping(State(state): State<AppState>) -> PageResult {
    let dataset = state.dataset().await?;
    Ok(page(render::render_clipping(&state.context(), &dataset)))
}

/// Serve the live view until Ctrl+C or SIGTERM.
pub async fn serve(project: Project, port: u16) -> Result<(), ServerError> {
    for path in assets::ensure_placeholders(&project.static_dir())? {
        tracing::info!(path = %path.display(), "created placeholder");
    }

    let addr = format!("{}:{}", project.config.server.host, port);
    let app = router(AppState::new(project)).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
