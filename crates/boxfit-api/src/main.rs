use anyhow::anyhow;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use boxfit_core::{
    BoxReport, Catalog, CatalogError, GroupCache, GroupEnumerator, ShippingBox, DEFAULT_MAX_ITEMS,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
#[cfg(test)]
mod tests;

use config::ApiConfig;

/// Largest `max_items` value accepted from clients.
const MAX_ITEMS_LIMIT: u32 = 10;

const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Boxfit API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;

/// Shared request state: the catalog and the group cache built from it.
struct AppState {
    catalog: Catalog,
    cache: Mutex<GroupCache>,
}

impl AppState {
    fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cache: Mutex::new(GroupCache::new()),
        }
    }

    fn report(&self, shipping_box: &ShippingBox, max_items: u32) -> Result<BoxReport, AppError> {
        let enumerator = GroupEnumerator::new(&self.catalog);
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow!("Group cache lock poisoned"))?;
        Ok(cache.report(&enumerator, shipping_box, max_items))
    }
}

#[derive(Debug, Deserialize)]
struct GroupsQuery {
    max_items: Option<u32>,
}

impl GroupsQuery {
    fn max_items(&self) -> Result<u32, CatalogError> {
        let max_items = self.max_items.unwrap_or(DEFAULT_MAX_ITEMS);
        if !(2..=MAX_ITEMS_LIMIT).contains(&max_items) {
            return Err(CatalogError::InvalidInput(format!(
                "max_items must be between 2 and {}",
                MAX_ITEMS_LIMIT
            )));
        }
        Ok(max_items)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Boxfit API");

    let config = ApiConfig::from_env();
    let catalog = match config.catalog_path() {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            Catalog::from_path(path)?
        }
        None => Catalog::builtin(),
    };

    info!(
        "Catalog ready: {} products, {} boxes",
        catalog.products().len(),
        catalog.boxes().len()
    );

    let app = app(Arc::new(AppState::new(catalog)));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://localhost:{}/api/health", addr.port());

    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/catalog", get(catalog))
        .route("/api/products/:id/boxes", get(product_boxes))
        .route("/api/boxes/:id/groups", get(box_groups))
        .route("/api/groups", get(all_groups))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "boxfit-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.catalog.clone())
}

/// Boxes a single product fits into
async fn product_boxes(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Path(id) = id.map_err(invalid_request)?;
    let product = state.catalog.product(id)?;
    let boxes = state.catalog.compatible_boxes(product);

    info!("Product {} fits {} boxes", product.id, boxes.len());

    Ok(Json(json!({
        "product": product,
        "boxes": boxes,
    })))
}

/// Groups for one box
async fn box_groups(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<GroupsQuery>, QueryRejection>,
) -> Result<Json<BoxReport>, AppError> {
    let Query(query) = query.map_err(invalid_request)?;
    let max_items = query.max_items()?;
    let shipping_box = state.catalog.shipping_box(&id)?;

    let report = state.report(shipping_box, max_items)?;

    info!(
        "Box {}: {} groups (max_items={})",
        report.box_id,
        report.groups.len(),
        max_items
    );

    Ok(Json(report))
}

/// Groups for every box in the catalog
async fn all_groups(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GroupsQuery>, QueryRejection>,
) -> Result<Json<Vec<BoxReport>>, AppError> {
    let Query(query) = query.map_err(invalid_request)?;
    let max_items = query.max_items()?;

    let reports = state
        .catalog
        .boxes()
        .iter()
        .map(|shipping_box| state.report(shipping_box, max_items))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Enumerated groups for {} boxes (max_items={})",
        reports.len(),
        max_items
    );

    Ok(Json(reports))
}

/// Turns an extractor rejection into an invalid input error with a JSON body.
fn invalid_request(rejection: impl std::fmt::Display) -> CatalogError {
    CatalogError::InvalidInput(rejection.to_string())
}

/// Application error type
struct AppError(anyhow::Error);

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let status = match self.0.downcast_ref::<CatalogError>() {
            Some(CatalogError::UnknownProduct(_)) | Some(CatalogError::UnknownBox(_)) => {
                StatusCode::NOT_FOUND
            }
            Some(CatalogError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
