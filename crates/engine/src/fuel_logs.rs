//! Fuel log primitives.
//!
//! A `FuelLog` is one refill event: what was paid, how much fuel went in and
//! what the odometer read at the pump. The statistics in [`crate::stats`] are
//! derived from a car's full fuel-log history and never mutate the entries.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// One refill event for a car.
#[derive(Clone, Debug, PartialEq)]
pub struct FuelLog {
    pub id: Uuid,
    pub car_id: Uuid,
    pub date: DateTime<Utc>,
    pub amount_paid: f64,
    pub quantity: f64,
    /// Total distance reading at refill time. Expected non-decreasing across
    /// a car's history but never enforced here; the statistics tolerate
    /// out-of-order and duplicate readings.
    pub odometer: f64,
    pub brand: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl FuelLog {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        car_id: Uuid,
        date: DateTime<Utc>,
        amount_paid: f64,
        quantity: f64,
        odometer: f64,
        brand: String,
        notes: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            date,
            amount_paid,
            quantity,
            odometer,
            brand,
            notes,
            created_at: now,
        }
    }
}

/// Partial update for a fuel log. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct FuelLogUpdate {
    pub date: Option<DateTime<Utc>>,
    pub amount_paid: Option<f64>,
    pub quantity: Option<f64>,
    pub odometer: Option<f64>,
    pub brand: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fuel_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub car_id: String,
    pub date: DateTimeUtc,
    pub amount_paid: f64,
    pub quantity: f64,
    pub odometer: f64,
    pub brand: String,
    pub notes: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cars::Entity",
        from = "Column::CarId",
        to = "super::cars::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cars,
}

impl Related<super::cars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cars.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FuelLog> for ActiveModel {
    fn from(log: &FuelLog) -> Self {
        Self {
            id: ActiveValue::Set(log.id.to_string()),
            car_id: ActiveValue::Set(log.car_id.to_string()),
            date: ActiveValue::Set(log.date),
            amount_paid: ActiveValue::Set(log.amount_paid),
            quantity: ActiveValue::Set(log.quantity),
            odometer: ActiveValue::Set(log.odometer),
            brand: ActiveValue::Set(log.brand.clone()),
            notes: ActiveValue::Set(log.notes.clone()),
            created_at: ActiveValue::Set(log.created_at),
        }
    }
}

impl TryFrom<Model> for FuelLog {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("fuel log not exists".to_string()))?,
            car_id: Uuid::parse_str(&model.car_id)
                .map_err(|_| EngineError::KeyNotFound("car not exists".to_string()))?,
            date: model.date,
            amount_paid: model.amount_paid,
            quantity: model.quantity,
            odometer: model.odometer,
            brand: model.brand,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}
