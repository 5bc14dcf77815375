//! The `Car` is the vehicle everything else hangs off: fuel logs, services
//! and expenses all belong to exactly one car.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// A tracked vehicle.
#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    /// Stable identifier, generated once and persisted as a string.
    pub id: Uuid,
    pub name: String,
    pub plate_number: String,
    /// Mileage the car had when it was registered.
    pub initial_odometer: f64,
    /// Latest known mileage.
    ///
    /// Maintained by the write path: every fuel log or service write moves it
    /// to the submitted reading (last write wins, not the maximum), expense
    /// writes only when they carry a reading.
    pub current_odometer: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    pub fn new(
        name: String,
        plate_number: String,
        initial_odometer: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            plate_number,
            initial_odometer,
            current_odometer: initial_odometer,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a car. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct CarUpdate {
    pub name: Option<String>,
    pub plate_number: Option<String>,
    pub initial_odometer: Option<f64>,
    pub current_odometer: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub plate_number: String,
    pub initial_odometer: f64,
    pub current_odometer: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fuel_logs::Entity")]
    FuelLogs,
    #[sea_orm(has_many = "super::services::Entity")]
    Services,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::fuel_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelLogs.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Car> for ActiveModel {
    fn from(car: &Car) -> Self {
        Self {
            id: ActiveValue::Set(car.id.to_string()),
            name: ActiveValue::Set(car.name.clone()),
            plate_number: ActiveValue::Set(car.plate_number.clone()),
            initial_odometer: ActiveValue::Set(car.initial_odometer),
            current_odometer: ActiveValue::Set(car.current_odometer),
            created_at: ActiveValue::Set(car.created_at),
            updated_at: ActiveValue::Set(car.updated_at),
        }
    }
}

impl TryFrom<Model> for Car {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("car not exists".to_string()))?,
            name: model.name,
            plate_number: model.plate_number,
            initial_odometer: model.initial_odometer,
            current_odometer: model.current_odometer,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn new_car_starts_at_initial_odometer() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let car = Car::new("Golf".to_string(), "AB 123 CD".to_string(), 54_000.0, now);

        assert_eq!(car.current_odometer, car.initial_odometer);
        assert_eq!(car.created_at, car.updated_at);
    }

    #[test]
    fn model_round_trips_through_active_model() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let car = Car::new("Golf".to_string(), String::new(), 54_000.0, now);
        let model: ActiveModel = (&car).into();

        assert_eq!(model.id.unwrap(), car.id.to_string());
        assert_eq!(model.current_odometer.unwrap(), 54_000.0);
    }
}
