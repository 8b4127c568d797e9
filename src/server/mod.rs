//! HTTP facade
//!
//! Every data route is served both at the root and under `/api`, the prefix
//! existing dashboard clients call.

pub mod handlers;
pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::forecasting::{ForecastModel, TrendSeasonalModel};
use crate::storage::StoreHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreHandle>,
    pub settings: Arc<Settings>,
    pub model: Arc<dyn ForecastModel>,
}

impl AppState {
    /// State using the default trend and seasonality model
    pub fn new(store: StoreHandle, settings: Settings) -> Self {
        let model = TrendSeasonalModel::new(settings.interval_width);
        Self::with_model(store, settings, Arc::new(model))
    }

    pub fn with_model(store: StoreHandle, settings: Settings, model: Arc<dyn ForecastModel>) -> Self {
        Self {
            store: Arc::new(store),
            settings: Arc::new(settings),
            model,
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/budget-insights/:user_id", get(handlers::budget_insights))
        .route("/budget-forecast/:user_id", get(handlers::budget_forecast))
        .route("/debug/transactions/:user_id", get(handlers::debug_transactions))
}

/// Build the application router with middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn run(state: AppState) -> BudgetResult<()> {
    let addr: SocketAddr = format!("{}:{}", state.settings.host, state.settings.port)
        .parse()
        .map_err(|e| {
            BudgetError::Config(format!(
                "Invalid listen address {}:{}: {}",
                state.settings.host, state.settings.port, e
            ))
        })?;

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("budget-insights v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, app).await?;
    Ok(())
}
