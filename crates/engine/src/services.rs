//! Maintenance service records and the service-due derivation.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Whether a service reminder threshold has been reached.
///
/// True iff the car's current odometer is known, a reminder is set
/// (`reminder_odometer > 0`) and the current reading has reached or passed
/// it. Deliberately a stateless predicate re-evaluated on every read, never a
/// persisted flag, so it can never go stale when the odometer moves.
pub fn needs_attention(reminder_odometer: f64, current_odometer: Option<f64>) -> bool {
    match current_odometer {
        Some(current) => reminder_odometer > 0.0 && current >= reminder_odometer,
        None => false,
    }
}

/// One maintenance event for a car.
#[derive(Clone, Debug, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub car_id: Uuid,
    pub name: String,
    pub price: f64,
    /// Reading at time of service.
    pub odometer: f64,
    pub description: String,
    /// Future odometer threshold; 0 means no reminder is set.
    pub reminder_odometer: f64,
    /// Derived, never stored. Filled from the owning car's current odometer
    /// when the record is read.
    pub needs_attention: bool,
    pub created_at: DateTime<Utc>,
}

impl Service {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        car_id: Uuid,
        name: String,
        price: f64,
        odometer: f64,
        description: String,
        reminder_odometer: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            name,
            price,
            odometer,
            description,
            reminder_odometer,
            needs_attention: false,
            created_at: now,
        }
    }
}

/// Partial update for a service. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub odometer: Option<f64>,
    pub description: Option<String>,
    pub reminder_odometer: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub car_id: String,
    pub name: String,
    pub price: f64,
    pub odometer: f64,
    pub description: String,
    pub reminder_odometer: f64,
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

impl From<&Service> for ActiveModel {
    fn from(service: &Service) -> Self {
        Self {
            id: ActiveValue::Set(service.id.to_string()),
            car_id: ActiveValue::Set(service.car_id.to_string()),
            name: ActiveValue::Set(service.name.clone()),
            price: ActiveValue::Set(service.price),
            odometer: ActiveValue::Set(service.odometer),
            description: ActiveValue::Set(service.description.clone()),
            reminder_odometer: ActiveValue::Set(service.reminder_odometer),
            created_at: ActiveValue::Set(service.created_at),
        }
    }
}

impl TryFrom<(Model, Option<f64>)> for Service {
    type Error = EngineError;

    /// Builds a `Service` from its row plus the owning car's current
    /// odometer, deriving `needs_attention` on the way.
    fn try_from((model, current_odometer): (Model, Option<f64>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("service not exists".to_string()))?,
            car_id: Uuid::parse_str(&model.car_id)
                .map_err(|_| EngineError::KeyNotFound("car not exists".to_string()))?,
            name: model.name,
            price: model.price,
            odometer: model.odometer,
            description: model.description,
            reminder_odometer: model.reminder_odometer,
            needs_attention: needs_attention(model.reminder_odometer, current_odometer),
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_when_current_reaches_threshold() {
        assert!(needs_attention(60_000.0, Some(60_000.0)));
        assert!(needs_attention(60_000.0, Some(61_500.0)));
    }

    #[test]
    fn not_due_below_threshold() {
        assert!(!needs_attention(60_000.0, Some(59_999.0)));
    }

    #[test]
    fn not_due_when_no_reminder_set() {
        assert!(!needs_attention(0.0, Some(60_000.0)));
    }

    #[test]
    fn not_due_when_current_odometer_unknown() {
        assert!(!needs_attention(60_000.0, None));
    }
}
