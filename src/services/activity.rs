//! Activity services - Composizione del filtro per il flusso attività

use crate::core::{AppError, AppState};
use crate::dtos::ActivityFilterQuery;
use crate::filter::{Filter, compose_activity_filter};
use axum::extract::{Json, Path, Query, State};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, instrument};

#[debug_handler]
#[instrument(skip(state, params), fields(group_id = %group_id))]
pub async fn compose_filter(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
    Query(params): Query<ActivityFilterQuery>,
) -> Result<Json<Filter>, AppError> {
    debug!("Composing activity filter");
    // 1. Normalizzare i tipi richiesti (lista separata da virgola)
    // 2. Delegare al composer: mai un errore, al peggio MatchNone

    let requested_types: Vec<String> = params
        .types
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let filter =
        compose_activity_filter(&state, group_id, params.scope, &requested_types).await;

    Ok(Json(filter))
}
