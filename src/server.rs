//! HTTP Server Module
//! Warp routes for the question endpoint, dataset summary, health check and static page.

use crate::data::Datasets;
use crate::query::QueryDispatcher;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use warp::http::StatusCode;
use warp::{reject::Rejection, reply::Reply, Filter};

/// Largest accepted `/ask` body.
const MAX_ASK_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Deserialize)]
struct AskRequest {
    #[serde(default)]
    question: Option<String>,
}

#[derive(Debug, Serialize)]
struct DatasetSummary {
    message: &'static str,
    rows: usize,
    columns: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

fn with_datasets(
    datasets: Arc<Datasets>,
) -> impl Filter<Extract = (Arc<Datasets>,), Error = Infallible> + Clone {
    warp::any().map(move || datasets.clone())
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "agristat"
    })))
}

async fn ask(request: AskRequest, datasets: Arc<Datasets>) -> Result<impl Reply, Rejection> {
    let question = request.question.unwrap_or_default();
    info!("/ask: {:?}", question);

    let answer = QueryDispatcher::answer(&question, &datasets);
    Ok(warp::reply::json(&answer.into_response()))
}

async fn fetch_data(datasets: Arc<Datasets>) -> Result<impl Reply, Rejection> {
    let crops = &datasets.crops;
    if crops.is_empty() {
        return Ok(warp::reply::with_status(
            warp::reply::json(&Message {
                message: "❌ Crop data not loaded",
            }),
            StatusCode::NOT_FOUND,
        ));
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&DatasetSummary {
            message: "✅ Data fetched successfully!",
            rows: crops.len(),
            columns: crops.columns().to_vec(),
        }),
        StatusCode::OK,
    ))
}

/// All routes, with CORS open to any origin.
pub fn routes(
    datasets: Arc<Datasets>,
    static_dir: PathBuf,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file(static_dir.join("index.html")));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let ask_route = warp::path("ask")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_ASK_BODY_BYTES))
        .and(warp::body::json())
        .and(with_datasets(datasets.clone()))
        .and_then(ask);

    let fetch_route = warp::path("fetch-data")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_datasets(datasets))
        .and_then(fetch_data);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST"])
        .allow_headers(vec!["content-type"]);

    index
        .or(health)
        .or(ask_route)
        .or(fetch_route)
        .with(cors)
        .with(warp::trace::request())
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, datasets: Datasets, static_dir: PathBuf) -> Result<()> {
    let routes = routes(Arc::new(datasets), static_dir);
    let (bound, server) = warp::serve(routes)
        .try_bind_ephemeral(addr)
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", bound);
    info!("Ask endpoint: POST http://{}/ask", bound);

    server.await;
    Ok(())
}
