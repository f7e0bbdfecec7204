use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{resolve_as_of, AppState};
use crate::domain::DATE_FORMAT;
use crate::engine::Snapshot;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesQuery {
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesResponse {
    pub as_of: String,
    pub interest_rate: String,
    pub advances: Vec<AdvanceDto>,
    pub aggregate_advance_balance: String,
    pub interest_payable_balance: String,
    pub total_interest_paid: String,
    pub balance_applicable_to_future_advances: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceDto {
    /// 1-based position in origination order.
    pub identifier: usize,
    pub sequence_id: i64,
    pub date: String,
    pub initial_amount: String,
    pub current_balance: String,
}

impl BalancesResponse {
    fn from_snapshot(snapshot: Snapshot, interest_rate: String) -> Self {
        let advances = snapshot
            .advances
            .iter()
            .enumerate()
            .map(|(index, advance)| AdvanceDto {
                identifier: index + 1,
                sequence_id: advance.identifier.as_i64(),
                date: advance.origination_date.format(DATE_FORMAT).to_string(),
                initial_amount: advance.initial_amount.to_canonical_string(),
                current_balance: advance.outstanding_balance.to_canonical_string(),
            })
            .collect();

        Self {
            as_of: snapshot.as_of.format(DATE_FORMAT).to_string(),
            interest_rate,
            advances,
            aggregate_advance_balance: snapshot.total_outstanding_principal.to_canonical_string(),
            interest_payable_balance: snapshot.interest_payable.to_canonical_string(),
            total_interest_paid: snapshot.interest_paid_cumulative.to_canonical_string(),
            balance_applicable_to_future_advances: snapshot
                .future_payment_credit
                .to_canonical_string(),
        }
    }
}

pub async fn get_balances(
    Query(params): Query<BalancesQuery>,
    State(state): State<AppState>,
) -> Result<Json<BalancesResponse>, AppError> {
    let as_of = resolve_as_of(params.as_of.as_deref())?;
    let snapshot = state.balances.balances_as_of(as_of).await?;

    let interest_rate = state.balances.interest_rate().to_canonical_string();
    Ok(Json(BalancesResponse::from_snapshot(snapshot, interest_rate)))
}
