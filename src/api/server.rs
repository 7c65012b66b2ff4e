//! HTTP server for the QSSMA dashboard API.
//!
//! The dataset is loaded once at startup and shared read-only; every
//! request computes its response from that cached record set. Re-loading
//! means restarting the server with a new file.
//!
//! # API Endpoints
//!
//! | Method | Path           | Description                               |
//! |--------|----------------|-------------------------------------------|
//! | GET    | `/health`      | Health check                              |
//! | GET    | `/api/records` | Cleaned record set plus load metadata     |
//! | POST   | `/api/filter`  | Filtered records, options, KPIs, rankings |
//! | GET    | `/api/logs`    | SSE stream of pipeline logs               |

use axum::{
    extract::State,
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{DashboardRequest, DashboardResponse};
use crate::etl::pipeline::{load_file, Dataset};

/// Load the dataset and start the HTTP server.
pub async fn start_server(data_file: &Path, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = match load_file(data_file) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            log_error(format!("Load failed: {}", e));
            return Err(e.into());
        }
    };

    // Permissive CORS for the dashboard frontend
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/records", get(records))
        .route("/api/filter", post(filter))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(dataset.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 QSSMA server running on http://localhost:{}", port);
    println!("   GET  /api/records - Cleaned record set ({} records)", dataset.records.len());
    println!("   POST /api/filter  - Filtered records + KPIs + rankings");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(dataset): State<Arc<Dataset>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "qssma-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "recordCount": dataset.records.len(),
        "loadedAt": dataset.info.loaded_at,
        "endpoints": {
            "records": "GET /api/records",
            "filter": "POST /api/filter",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// Full cleaned record set plus load metadata
async fn records(State(dataset): State<Arc<Dataset>>) -> Json<Dataset> {
    Json((*dataset).clone())
}

/// Apply a filter selection and return everything one render needs
async fn filter(
    State(dataset): State<Arc<Dataset>>,
    Json(request): Json<DashboardRequest>,
) -> Json<DashboardResponse> {
    Json(DashboardResponse::compute(&dataset.records, &request))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
