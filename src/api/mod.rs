pub mod balances;
pub mod events;
pub mod health;

use crate::db::Repository;
use crate::domain::Decimal;
use crate::domain::parse_date;
use crate::error::AppError;
use crate::orchestration::BalanceService;
use axum::{routing::get, Router};
use chrono::NaiveDate;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub balances: Arc<BalanceService>,
}

impl AppState {
    /// State for a server replaying at `interest_rate` per day.
    pub fn new(repo: Arc<Repository>, interest_rate: Decimal) -> Self {
        let balances = Arc::new(BalanceService::new(repo.clone(), interest_rate));
        Self { repo, balances }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/balances", get(balances::get_balances))
        .route("/v1/events", get(events::get_events))
        .layer(cors)
        .with_state(state)
}

/// Cutoff from an optional `asOf` query parameter; today when absent.
pub(crate) fn resolve_as_of(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw {
        Some(s) => parse_date(s).map_err(|e| AppError::BadRequest(e.to_string())),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
