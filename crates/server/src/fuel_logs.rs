//! Fuel log API endpoints

use api_types::fuel_log::{
    FuelLogCreated, FuelLogListQuery, FuelLogListResponse, FuelLogNew, FuelLogUpdate, FuelLogView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn fuel_log_view(log: engine::FuelLog) -> FuelLogView {
    FuelLogView {
        id: log.id,
        date: log.date.fixed_offset(),
        amount_paid: log.amount_paid,
        quantity: log.quantity,
        odometer: log.odometer,
        brand: log.brand,
        notes: log.notes,
    }
}

/// Handle requests for recording a refill.
pub async fn create(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
    Json(payload): Json<FuelLogNew>,
) -> Result<Json<FuelLogCreated>, ServerError> {
    let date = payload
        .date
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let log_id = state
        .engine
        .new_fuel_log(
            car_id,
            date,
            payload.amount_paid,
            payload.quantity,
            payload.odometer,
            payload.brand.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok(Json(FuelLogCreated { id: log_id }))
}

/// Handle requests for listing a car's fuel logs, newest first.
///
/// Without query parameters the full history is returned; `limit` (and the
/// returned `next_cursor`) switch to paginated reads.
pub async fn list(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
    Query(query): Query<FuelLogListQuery>,
) -> Result<Json<FuelLogListResponse>, ServerError> {
    let engine = &state.engine;

    let response = match (query.limit, query.cursor) {
        (None, None) => FuelLogListResponse {
            fuel_logs: engine
                .list_fuel_logs(car_id)
                .await?
                .into_iter()
                .map(fuel_log_view)
                .collect(),
            next_cursor: None,
        },
        (limit, cursor) => {
            let page = engine
                .list_fuel_logs_page(car_id, limit.unwrap_or(50), cursor.as_deref())
                .await?;
            FuelLogListResponse {
                fuel_logs: page.fuel_logs.into_iter().map(fuel_log_view).collect(),
                next_cursor: page.next_cursor,
            }
        }
    };

    Ok(Json(response))
}

/// Handle partial updates to a fuel log.
pub async fn update(
    State(state): State<ServerState>,
    Path((car_id, log_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<FuelLogUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_fuel_log(
            car_id,
            log_id,
            engine::FuelLogUpdate {
                date: payload.date.map(|date| date.with_timezone(&Utc)),
                amount_paid: payload.amount_paid,
                quantity: payload.quantity,
                odometer: payload.odometer,
                brand: payload.brand,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for deleting a fuel log.
pub async fn delete(
    State(state): State<ServerState>,
    Path((car_id, log_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_fuel_log(car_id, log_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
