//! Service API endpoints

use api_types::service::{ServiceCreated, ServiceNew, ServiceUpdate, ServiceView, ServicesResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn service_view(service: engine::Service) -> ServiceView {
    ServiceView {
        id: service.id,
        name: service.name,
        price: service.price,
        odometer: service.odometer,
        description: service.description,
        reminder_odometer: service.reminder_odometer,
        needs_attention: service.needs_attention,
        created_at: service.created_at.fixed_offset(),
    }
}

/// Handle requests for recording a maintenance service.
pub async fn create(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
    Json(payload): Json<ServiceNew>,
) -> Result<Json<ServiceCreated>, ServerError> {
    let service_id = state
        .engine
        .new_service(
            car_id,
            &payload.name,
            payload.price,
            payload.odometer,
            payload.description.as_deref(),
            payload.reminder_odometer,
        )
        .await?;

    Ok(Json(ServiceCreated { id: service_id }))
}

/// Handle requests for listing a car's services.
///
/// The `needs_attention` flag on each entry is derived from the car's
/// current odometer at read time; `needs_attention_count` is its sum.
pub async fn list(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<ServicesResponse>, ServerError> {
    let services: Vec<ServiceView> = state
        .engine
        .list_services(car_id)
        .await?
        .into_iter()
        .map(service_view)
        .collect();

    let needs_attention_count = services
        .iter()
        .filter(|service| service.needs_attention)
        .count() as u64;

    Ok(Json(ServicesResponse {
        services,
        needs_attention_count,
    }))
}

/// Handle partial updates to a service.
pub async fn update(
    State(state): State<ServerState>,
    Path((car_id, service_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ServiceUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_service(
            car_id,
            service_id,
            engine::ServiceUpdate {
                name: payload.name,
                price: payload.price,
                odometer: payload.odometer,
                description: payload.description,
                reminder_odometer: payload.reminder_odometer,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for deleting a service.
pub async fn delete(
    State(state): State<ServerState>,
    Path((car_id, service_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_service(car_id, service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
