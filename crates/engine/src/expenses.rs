//! Miscellaneous car expenses: insurance, parking, fines and the like.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpenseCategory {
    Insurance,
    Registration,
    Parking,
    Tolls,
    CarWash,
    Accessories,
    Fines,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insurance => "Insurance",
            Self::Registration => "Registration",
            Self::Parking => "Parking",
            Self::Tolls => "Tolls",
            Self::CarWash => "Car Wash",
            Self::Accessories => "Accessories",
            Self::Fines => "Fines",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Insurance" => Ok(Self::Insurance),
            "Registration" => Ok(Self::Registration),
            "Parking" => Ok(Self::Parking),
            "Tolls" => Ok(Self::Tolls),
            "Car Wash" => Ok(Self::CarWash),
            "Accessories" => Ok(Self::Accessories),
            "Fines" => Ok(Self::Fines),
            "Other" => Ok(Self::Other),
            other => Err(EngineError::InvalidValue(format!(
                "invalid expense category: {other}"
            ))),
        }
    }
}

/// One miscellaneous expense for a car.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub car_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    /// Odometer reading at expense time, if one was recorded.
    pub odometer: Option<f64>,
    pub description: String,
    pub category: ExpenseCategory,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        car_id: Uuid,
        name: String,
        amount: f64,
        date: DateTime<Utc>,
        odometer: Option<f64>,
        description: String,
        category: ExpenseCategory,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            name,
            amount,
            date,
            odometer,
            description,
            category,
            created_at: now,
        }
    }
}

/// Partial update for an expense. `None` fields are left untouched.
///
/// `odometer` is doubly optional: the outer `None` leaves the stored value
/// alone, `Some(None)` clears it.
#[derive(Clone, Debug, Default)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub odometer: Option<Option<f64>>,
    pub description: Option<String>,
    pub category: Option<ExpenseCategory>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub car_id: String,
    pub name: String,
    pub amount: f64,
    pub date: DateTimeUtc,
    pub odometer: Option<f64>,
    pub description: String,
    pub category: String,
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

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            car_id: ActiveValue::Set(expense.car_id.to_string()),
            name: ActiveValue::Set(expense.name.clone()),
            amount: ActiveValue::Set(expense.amount),
            date: ActiveValue::Set(expense.date),
            odometer: ActiveValue::Set(expense.odometer),
            description: ActiveValue::Set(expense.description.clone()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            car_id: Uuid::parse_str(&model.car_id)
                .map_err(|_| EngineError::KeyNotFound("car not exists".to_string()))?,
            name: model.name,
            amount: model.amount,
            date: model.date,
            odometer: model.odometer,
            description: model.description,
            // Rows written before a category existed fall back to Other.
            category: ExpenseCategory::try_from(model.category.as_str()).unwrap_or_default(),
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in [
            ExpenseCategory::Insurance,
            ExpenseCategory::Registration,
            ExpenseCategory::Parking,
            ExpenseCategory::Tolls,
            ExpenseCategory::CarWash,
            ExpenseCategory::Accessories,
            ExpenseCategory::Fines,
            ExpenseCategory::Other,
        ] {
            assert_eq!(ExpenseCategory::try_from(category.as_str()), Ok(category));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(ExpenseCategory::try_from("Snacks").is_err());
    }
}
