//! Statistics API endpoints

use api_types::stats::FuelStatistics;
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Handle requests for a car's computed fuel statistics.
pub async fn get_stats(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<FuelStatistics>, ServerError> {
    let stats = state.engine.fuel_statistics(car_id).await?;

    Ok(Json(FuelStatistics {
        avg_liters_per_100km: stats.avg_liters_per_100km,
        avg_km_per_liter: stats.avg_km_per_liter,
        avg_cost_per_100km: stats.avg_cost_per_100km,
        avg_cost_per_liter: stats.avg_cost_per_liter,
        avg_cost_per_km: stats.avg_cost_per_km,
        total_distance: stats.total_distance,
        total_liters: stats.total_liters,
        total_cost: stats.total_cost,
        total_fill_ups: stats.total_fill_ups,
        best_fuel_economy: stats.best_fuel_economy,
        worst_fuel_economy: stats.worst_fuel_economy,
    }))
}
