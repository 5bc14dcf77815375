use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Expense, ExpenseCategory, ExpenseUpdate, ResultEngine, expenses};

use super::{Engine, ensure_non_negative, normalize_required_name, normalize_text, with_tx};

/// Treats an absent or zero reading as "no reading taken".
fn normalize_reading(odometer: Option<f64>) -> ResultEngine<Option<f64>> {
    odometer
        .map(|value| ensure_non_negative(value, "odometer"))
        .transpose()
        .map(|value| value.filter(|&odometer| odometer > 0.0))
}

impl Engine {
    async fn require_expense(
        &self,
        db: &sea_orm::DatabaseTransaction,
        car_id: Uuid,
        expense_id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .filter(expenses::Column::CarId.eq(car_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }

    /// Records a miscellaneous expense.
    ///
    /// The car's current odometer only moves when the expense carries a
    /// reading; most expenses (insurance, fines) do not.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_expense(
        &self,
        car_id: Uuid,
        name: &str,
        amount: f64,
        date: DateTime<Utc>,
        odometer: Option<f64>,
        description: Option<&str>,
        category: ExpenseCategory,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "expense")?;
        let amount = ensure_non_negative(amount, "amount")?;
        let odometer = normalize_reading(odometer)?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let expense = Expense::new(
                car_id,
                name,
                amount,
                date,
                odometer,
                normalize_text(description),
                category,
                now,
            );
            let expense_id = expense.id;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;

            if let Some(odometer) = odometer {
                self.touch_car_odometer(&db_tx, car_id, odometer, now)
                    .await?;
            }
            Ok(expense_id)
        })
    }

    /// Lists a car's expenses, newest first by expense date.
    pub async fn list_expenses(&self, car_id: Uuid) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::CarId.eq(car_id.to_string()))
                .order_by_desc(expenses::Column::Date)
                .order_by_desc(expenses::Column::Id)
                .all(&db_tx)
                .await?;

            models.into_iter().map(Expense::try_from).collect()
        })
    }

    /// Applies a partial update to an expense.
    pub async fn update_expense(
        &self,
        car_id: Uuid,
        expense_id: Uuid,
        update: ExpenseUpdate,
    ) -> ResultEngine<()> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "expense"))
            .transpose()?;
        let amount = update
            .amount
            .map(|value| ensure_non_negative(value, "amount"))
            .transpose()?;
        let odometer = update.odometer.map(normalize_reading).transpose()?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;
            self.require_expense(&db_tx, car_id, expense_id).await?;

            let mut active = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                ..Default::default()
            };
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(amount) = amount {
                active.amount = ActiveValue::Set(amount);
            }
            if let Some(date) = update.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(odometer) = odometer {
                active.odometer = ActiveValue::Set(odometer);
            }
            if let Some(description) = update.description {
                active.description = ActiveValue::Set(description.trim().to_string());
            }
            if let Some(category) = update.category {
                active.category = ActiveValue::Set(category.as_str().to_string());
            }
            active.update(&db_tx).await?;

            if let Some(Some(odometer)) = odometer {
                self.touch_car_odometer(&db_tx, car_id, odometer, now)
                    .await?;
            }
            Ok(())
        })
    }

    /// Deletes an expense.
    pub async fn delete_expense(&self, car_id: Uuid, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;
            self.require_expense(&db_tx, car_id, expense_id).await?;

            expenses::Entity::delete_by_id(expense_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
