//! Car API endpoints

use api_types::car::{CarCreated, CarNew, CarUpdate, CarView, CarsResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn car_view(car: engine::Car) -> CarView {
    CarView {
        id: car.id,
        name: car.name,
        plate_number: car.plate_number,
        initial_odometer: car.initial_odometer,
        current_odometer: car.current_odometer,
        created_at: car.created_at.fixed_offset(),
        updated_at: car.updated_at.fixed_offset(),
    }
}

/// Handle requests for registering a new car.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CarNew>,
) -> Result<Json<CarCreated>, ServerError> {
    let car_id = state
        .engine
        .new_car(
            &payload.name,
            payload.plate_number.as_deref(),
            payload.initial_odometer,
        )
        .await?;

    Ok(Json(CarCreated { id: car_id }))
}

/// Handle requests for listing all cars.
pub async fn list(State(state): State<ServerState>) -> Result<Json<CarsResponse>, ServerError> {
    let cars = state
        .engine
        .list_cars()
        .await?
        .into_iter()
        .map(car_view)
        .collect();

    Ok(Json(CarsResponse { cars }))
}

/// Handle requests for a single car.
pub async fn get(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<CarView>, ServerError> {
    let car = state.engine.car(car_id).await?;
    Ok(Json(car_view(car)))
}

/// Handle partial updates to a car.
pub async fn update(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
    Json(payload): Json<CarUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_car(
            car_id,
            engine::CarUpdate {
                name: payload.name,
                plate_number: payload.plate_number,
                initial_odometer: payload.initial_odometer,
                current_odometer: payload.current_odometer,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for deleting a car and all of its records.
pub async fn delete(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_car(car_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
