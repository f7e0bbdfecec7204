use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{resolve_as_of, AppState};
use crate::domain::DATE_FORMAT;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub as_of: String,
    pub event_count: usize,
    pub events: Vec<EventDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub sequence_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub amount: String,
}

pub async fn get_events(
    Query(params): Query<EventsQuery>,
    State(state): State<AppState>,
) -> Result<Json<EventsResponse>, AppError> {
    let as_of = resolve_as_of(params.as_of.as_deref())?;
    let events = state.balances.events_until(as_of).await?;

    let events: Vec<EventDto> = events
        .into_iter()
        .map(|e| EventDto {
            sequence_id: e.sequence_id.as_i64(),
            kind: e.kind.to_string(),
            date: e.occurred_on.format(DATE_FORMAT).to_string(),
            amount: e.amount.to_canonical_string(),
        })
        .collect();

    Ok(Json(EventsResponse {
        as_of: as_of.format(DATE_FORMAT).to_string(),
        event_count: events.len(),
        events,
    }))
}
