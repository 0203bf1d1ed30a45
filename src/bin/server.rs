use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use batch_cut_optimizer::OptimizeError;
use batch_cut_optimizer::rod::{RodRequest, solve_rod_cutting};
use batch_cut_optimizer::scheduler::{QueueRequest, optimize_queue};
use batch_cut_optimizer::types::{CutPlan, ScheduleResult};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

fn bad_request(e: OptimizeError) -> (StatusCode, String) {
    tracing::warn!(error = %e, "rejected request");
    (StatusCode::BAD_REQUEST, e.to_string())
}

async fn queue(
    Json(req): Json<QueueRequest>,
) -> Result<Json<ScheduleResult>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /queue"
    );

    let result = optimize_queue(req.jobs, req.constraints).map_err(bad_request)?;
    Ok(Json(result))
}

async fn rod(Json(req): Json<RodRequest>) -> Result<Json<CutPlan>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /rod"
    );

    // Quadratic in `length`, so keep it off the async workers.
    let plan = tokio::task::spawn_blocking(move || {
        solve_rod_cutting(req.length, &req.prices, req.strategy)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "rod solver task failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "solver failed".to_string())
    })?
    .map_err(bad_request)?;
    Ok(Json(plan))
}

fn app() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/queue", post(queue))
        .route("/rod", post(rod))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[tokio::main]
async fn main() {
    // Reporting stays off unless a DSN is configured.
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app()).await.unwrap();
}
