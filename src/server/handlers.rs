//! API route handlers
//!
//! Service calls read from the store and fit models synchronously, so each
//! one runs on the blocking pool.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{BudgetError, BudgetResult};
use crate::services::{BudgetService, ForecastService, TransactionService};

use super::response::respond;
use super::AppState;

/// Message returned by the liveness route
pub const ROOT_MESSAGE: &str = "Budget insights service is running";

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub periods: Option<String>,
}

async fn run_blocking<T, F>(task: F) -> BudgetResult<T>
where
    F: FnOnce() -> BudgetResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .unwrap_or_else(|e| Err(BudgetError::ComputationFailure(format!("Request task failed: {}", e))))
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.clone();
    let connected = tokio::task::spawn_blocking(move || store.is_connected())
        .await
        .unwrap_or(false);

    Json(json!({
        "status": if connected { "ok" } else { "degraded" },
        "store": if connected { "connected" } else { "disconnected" },
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn budget_insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let legacy = state.settings.legacy_status_codes;
    let result = run_blocking(move || {
        BudgetService::new(&state.store, &state.settings).analyze(&user_id)
    })
    .await;
    respond(result, legacy)
}

pub async fn budget_forecast(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Response {
    let legacy = state.settings.legacy_status_codes;
    let result = run_blocking(move || {
        let service = ForecastService::new(&state.store, &state.settings, state.model.as_ref());
        let periods = service.resolve_periods(query.periods.as_deref())?;
        service.forecast(&user_id, periods)
    })
    .await;
    respond(result, legacy)
}

pub async fn debug_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let legacy = state.settings.legacy_status_codes;
    let result = run_blocking(move || {
        let transactions = TransactionService::new(&state.store).raw_transactions(&user_id)?;
        Ok(json!({ "transactions": transactions }))
    })
    .await;
    respond(result, legacy)
}
