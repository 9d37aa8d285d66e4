use crate::config::{Config, SearchConfig};
use crate::error::{Result, WikigraphError};
use crate::graph::GraphBuilder;
use crate::query::ids::normalize_entity_id;
use crate::query::{QueryClient, SearchResults};
use crate::render::{self, NO_GRAPH_HTML};
use crate::web::pages;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Web front end: search form, result list and entity graph pages
pub struct WebServer {
    state: AppState,
    bind_addr: String,
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    client: Arc<QueryClient>,
    builder: Arc<GraphBuilder>,
    search: SearchConfig,
    max_relations: usize,
}

impl WebServer {
    /// Create a new web server from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = QueryClient::new(config.knowledge_base.clone())?;
        let builder = GraphBuilder::from_config(&config.graph);

        Ok(Self {
            state: AppState {
                client: Arc::new(client),
                builder: Arc::new(builder),
                search: config.search.clone(),
                max_relations: config.graph.max_relations,
            },
            bind_addr: config.bind_addr(),
        })
    }

    /// Run the HTTP server until the process is stopped
    pub async fn run(&self) -> Result<()> {
        let app = self.create_router();

        let listener = tokio::net::TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| {
                WikigraphError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to bind to {}: {}. Set server.port in config.toml to use a different port.",
                        self.bind_addr, e
                    ),
                ))
            })?;

        log::info!("Wikigraph listening on http://{}", self.bind_addr);

        axum::serve(listener, app).await.map_err(|e| {
            WikigraphError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Create the axum router
    pub fn create_router(&self) -> Router {
        Router::new()
            .route("/", get(handle_index))
            .route("/search", get(handle_search))
            .route("/entity/:id", get(handle_entity))
            .route("/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(self.state.clone())
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

async fn handle_index() -> Response {
    html_page(pages::index_page())
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim();
    if query.is_empty() {
        return html_page(pages::results_page("", &SearchResults::empty()));
    }

    let limit = params
        .limit
        .unwrap_or(state.search.default_limit)
        .clamp(1, state.search.max_limit);

    let results = state.client.search(query, limit).await;
    html_page(pages::results_page(query, &results))
}

async fn handle_entity(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let entity_id = match normalize_entity_id(&raw_id) {
        Ok(id) => id,
        Err(e) => {
            log::debug!("Rejected entity id '{}': {}", raw_id, e);
            return not_found(&format!("Entity {} not found", raw_id));
        }
    };

    let entity = match state.client.lookup(&entity_id).await {
        Ok(entity) => entity,
        Err(WikigraphError::EntityNotFound(_)) => {
            return not_found(&format!("Entity {} not found", entity_id));
        }
        Err(e) => {
            log::error!("Lookup of {} failed: {}", entity_id, e);
            return not_found(&format!("Entity {} not found", entity_id));
        }
    };

    let graph = state.builder.build_or_hub(&entity, state.max_relations);
    let (graph_html, graph_json) =
        match (render::render_graph_html(&graph), render::graph_json(&graph)) {
            (Ok(html), Ok(json)) => (html, json),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Graph rendering failed for {}: {}", entity_id, e);
                (NO_GRAPH_HTML.to_string(), "{}".to_string())
            }
        };

    html_page(pages::entity_page(&entity, &graph_html, &graph_json))
}

async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "wikigraph",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}

fn html_page(page: Result<String>) -> Response {
    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log::error!("Page rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Template error: {}", e))).into_response()
        }
    }
}

fn not_found(message: &str) -> Response {
    match pages::error_page(message) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            log::error!("Error page rendering failed: {}", e);
            (StatusCode::NOT_FOUND, message.to_string()).into_response()
        }
    }
}
