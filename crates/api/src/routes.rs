use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use eval::EvaluationMetrics;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::cache::CacheStats;
use crate::metrics::{MetricsSnapshot, TimedOperation};
use crate::pages::{self, BenchmarksView, CellSelection, EvaluationView};
use crate::state::AppState;

type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/benchmarks") }))
        .route("/benchmarks", get(benchmarks))
        .route("/evaluation", get(evaluation))
        .route("/api/benchmarks/stats", get(benchmark_stats))
        .route("/api/evaluation/metrics", get(evaluation_metrics))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn record_request(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let timer = TimedOperation::start();
    let response = next.run(request).await;
    let success = !response.status().is_server_error();
    state.metrics.record_request(success, timer.elapsed());
    response
}

/// Empty query values count as absent; selectors submit `""` for no choice.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct BenchmarksQuery {
    benchmark: Option<String>,
    #[serde(rename = "type")]
    type_label: Option<String>,
}

async fn benchmarks(State(state): State<SharedState>, Query(query): Query<BenchmarksQuery>) -> Response {
    let stats = match state.load_benchmark_stats().await {
        Ok(stats) => stats,
        Err(failure) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::stats_error_page(&failure))).into_response();
        }
    };
    let table = stats::build_table(&stats);

    // unknown values fall back to the first benchmark and type
    let benchmark = non_empty(query.benchmark)
        .filter(|b| table.has_benchmark(b))
        .or_else(|| table.benchmarks.first().cloned());
    let type_label = non_empty(query.type_label)
        .filter(|t| table.has_type(t))
        .or_else(|| table.type_labels().next().map(str::to_string));

    let selection = match (benchmark, type_label) {
        (Some(benchmark), Some(type_label)) => Some(CellSelection { benchmark, type_label }),
        _ => None,
    };
    let entities = match &selection {
        Some(s) => state
            .load_entities(&s.benchmark, &s.type_label)
            .await
            .map_err(|e| e.to_string()),
        None => Ok(Vec::new()),
    };

    let view = BenchmarksView {
        table: &table,
        selection,
        entities,
    };
    Html(pages::benchmarks_page(&view)).into_response()
}

#[derive(Debug, Deserialize)]
struct EvaluationQuery {
    run: Option<String>,
    article: Option<String>,
}

async fn evaluation(State(state): State<SharedState>, Query(query): Query<EvaluationQuery>) -> Response {
    let (runs, articles) = tokio::join!(state.discover_runs(), state.load_articles());

    let selected_run = non_empty(query.run);
    let files = selected_run.as_deref().and_then(|key| runs.get(key));
    if let (Some(key), None) = (&selected_run, files) {
        warn!(run = %key, "Unknown run selected");
    }
    let run = match files {
        Some(files) => Some(state.select_run(files).await),
        None => None,
    };

    let articles = articles.map_err(|e| e.to_string());
    let selected_article = non_empty(query.article).and_then(|a| a.parse::<usize>().ok());

    let view = EvaluationView {
        runs: runs.keys().collect(),
        selected_run: files.and(selected_run.as_deref()),
        run: run.as_deref(),
        articles: articles.as_ref().map(Vec::as_slice).map_err(String::clone),
        selected_article,
    };
    Html(pages::evaluation_page(&view)).into_response()
}

async fn benchmark_stats(State(state): State<SharedState>) -> Response {
    match state.load_benchmark_stats().await {
        Ok(stats) => Json(stats::build_table(&stats)).into_response(),
        Err(failure) => {
            let errors: Vec<_> = failure
                .failures
                .iter()
                .map(|(benchmark, e)| json!({"benchmark": benchmark, "kind": e.kind(), "error": e.to_string()}))
                .collect();
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "errors": errors }))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetricsQuery {
    run: String,
}

#[derive(Serialize)]
struct RunMetricsResponse {
    run: String,
    metrics: EvaluationMetrics,
}

async fn evaluation_metrics(State(state): State<SharedState>, Query(query): Query<MetricsQuery>) -> Response {
    let runs = state.discover_runs().await;
    let Some(files) = runs.get(&query.run) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": format!("unknown run {}", query.run)}))).into_response();
    };

    let run = state.select_run(files).await;
    match run.metrics() {
        Some(metrics) => Json(RunMetricsResponse {
            run: query.run,
            metrics,
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": pages::NO_CASES_MESSAGE}))).into_response(),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    data_source: String,
}

async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        data_source: state.source.describe(),
    })
}

#[derive(Serialize)]
struct MetricsResponse {
    requests: MetricsSnapshot,
    cache: CacheStats,
    current_run: Option<String>,
}

async fn metrics(State(state): State<SharedState>) -> Json<MetricsResponse> {
    let current_run = state.runs.current().await.map(|run| run.files.key());
    Json(MetricsResponse {
        requests: state.metrics.snapshot(),
        cache: state.cache.stats(),
        current_run,
    })
}
