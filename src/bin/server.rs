use std::collections::HashMap;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use profile_cut_optimizer::solver::Solver;
use profile_cut_optimizer::types::{OptimizationResult, OrderInput, Solution};
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Packing cost grows cubically with the pieces of a profile: about two
/// seconds at this size in the worst case.
const MAX_PIECES_PER_PROFILE: usize = 1_000;
const MAX_PIECES_PER_REQUEST: usize = 5_000;

#[derive(Serialize)]
struct OptimizeResponse {
    results: Vec<OptimizationResult>,
    bar_count: usize,
    unplaced_count: usize,
    waste_percent: f64,
}

impl From<Solution> for OptimizeResponse {
    fn from(solution: Solution) -> Self {
        Self {
            bar_count: solution.bar_count(),
            unplaced_count: solution.unplaced_count(),
            waste_percent: solution.total_waste_percent(),
            results: solution.results,
        }
    }
}

fn validate(req: &OrderInput) -> Result<(), String> {
    let mut per_profile: HashMap<&str, usize> = HashMap::new();
    for r in req.requirements.iter().filter(|r| r.is_usable()) {
        let count = per_profile.entry(r.profile_id.as_str()).or_default();
        *count = count.saturating_add(r.piece_count());
    }

    if let Some((profile, &pieces)) = per_profile
        .iter()
        .find(|&(_, &pieces)| pieces > MAX_PIECES_PER_PROFILE)
    {
        return Err(format!(
            "too many pieces for profile {}: {} (limit {})",
            profile, pieces, MAX_PIECES_PER_PROFILE
        ));
    }

    let pieces = per_profile.values().fold(0usize, |acc, &n| acc.saturating_add(n));
    if pieces > MAX_PIECES_PER_REQUEST {
        return Err(format!(
            "too many pieces: {} (limit {})",
            pieces, MAX_PIECES_PER_REQUEST
        ));
    }
    Ok(())
}

async fn optimize(
    Json(req): Json<OrderInput>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    validate(&req).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let params = req.params();
    let solver = Solver::new(req.requirements, params);
    let solution = tokio::task::spawn_blocking(move || solver.solve())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "optimizer task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "optimization failed".to_string(),
            )
        })?;

    if solution.unplaced_count() > 0 {
        tracing::warn!(
            unplaced = solution.unplaced_count(),
            "some pieces are longer than their stock bar"
        );
    }

    Ok(Json(solution.into()))
}

fn app() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[tokio::main]
async fn main() {
    let _sentry = sentry::init(sentry::ClientOptions {
        dsn: std::env::var("SENTRY_DSN").ok().and_then(|dsn| dsn.parse().ok()),
        release: sentry::release_name!(),
        ..Default::default()
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
