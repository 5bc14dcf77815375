use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{EngineError, FuelLog, FuelLogUpdate, ResultEngine, fuel_logs};

use super::{Engine, ensure_non_negative, normalize_text, with_tx};

/// One page of a car's fuel-log history, newest first.
#[derive(Clone, Debug)]
pub struct FuelLogPage {
    pub fuel_logs: Vec<FuelLog>,
    /// Opaque cursor for fetching the next (older) page.
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FuelLogsCursor {
    date: DateTime<Utc>,
    fuel_log_id: String,
}

impl FuelLogsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid fuel logs cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid fuel logs cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid fuel logs cursor".to_string()))
    }
}

impl Engine {
    async fn require_fuel_log(
        &self,
        db: &sea_orm::DatabaseTransaction,
        car_id: Uuid,
        log_id: Uuid,
    ) -> ResultEngine<fuel_logs::Model> {
        fuel_logs::Entity::find_by_id(log_id.to_string())
            .filter(fuel_logs::Column::CarId.eq(car_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("fuel log not exists".to_string()))
    }

    /// Records a refill and moves the car's current odometer to the
    /// submitted reading.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_fuel_log(
        &self,
        car_id: Uuid,
        date: DateTime<Utc>,
        amount_paid: f64,
        quantity: f64,
        odometer: f64,
        brand: Option<&str>,
        notes: Option<&str>,
    ) -> ResultEngine<Uuid> {
        let amount_paid = ensure_non_negative(amount_paid, "amount paid")?;
        let quantity = ensure_non_negative(quantity, "quantity")?;
        let odometer = ensure_non_negative(odometer, "odometer")?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let log = FuelLog::new(
                car_id,
                date,
                amount_paid,
                quantity,
                odometer,
                normalize_text(brand),
                normalize_text(notes),
                now,
            );
            let log_id = log.id;
            fuel_logs::ActiveModel::from(&log).insert(&db_tx).await?;

            self.touch_car_odometer(&db_tx, car_id, odometer, now)
                .await?;
            Ok(log_id)
        })
    }

    /// Lists a car's full fuel-log history, newest first.
    pub async fn list_fuel_logs(&self, car_id: Uuid) -> ResultEngine<Vec<FuelLog>> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let models = fuel_logs::Entity::find()
                .filter(fuel_logs::Column::CarId.eq(car_id.to_string()))
                .order_by_desc(fuel_logs::Column::Date)
                .order_by_desc(fuel_logs::Column::Id)
                .all(&db_tx)
                .await?;

            models.into_iter().map(FuelLog::try_from).collect()
        })
    }

    /// Lists a car's fuel logs with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(date DESC, fuel_log_id DESC)`.
    pub async fn list_fuel_logs_page(
        &self,
        car_id: Uuid,
        limit: u64,
        cursor: Option<&str>,
    ) -> ResultEngine<FuelLogPage> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let limit_plus_one = limit.saturating_add(1);
            let mut query = fuel_logs::Entity::find()
                .filter(fuel_logs::Column::CarId.eq(car_id.to_string()))
                .order_by_desc(fuel_logs::Column::Date)
                .order_by_desc(fuel_logs::Column::Id)
                .limit(limit_plus_one);

            if let Some(cursor) = cursor {
                let cursor = FuelLogsCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(fuel_logs::Column::Date.lt(cursor.date))
                        .add(
                            Condition::all()
                                .add(fuel_logs::Column::Date.eq(cursor.date))
                                .add(fuel_logs::Column::Id.lt(cursor.fuel_log_id)),
                        ),
                );
            }

            let rows: Vec<fuel_logs::Model> = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let mut fuel_logs: Vec<FuelLog> = Vec::with_capacity(rows.len().min(limit as usize));
            for model in rows.into_iter().take(limit as usize) {
                fuel_logs.push(FuelLog::try_from(model)?);
            }

            let next_cursor = fuel_logs.last().map(|log| FuelLogsCursor {
                date: log.date,
                fuel_log_id: log.id.to_string(),
            });
            let next_cursor = if has_more {
                next_cursor.map(|c| c.encode()).transpose()?
            } else {
                None
            };

            Ok(FuelLogPage {
                fuel_logs,
                next_cursor,
            })
        })
    }

    /// Applies a partial update to a fuel log.
    ///
    /// An update that carries an odometer reading also moves the car's
    /// current odometer, same as a fresh write would.
    pub async fn update_fuel_log(
        &self,
        car_id: Uuid,
        log_id: Uuid,
        update: FuelLogUpdate,
    ) -> ResultEngine<()> {
        let amount_paid = update
            .amount_paid
            .map(|value| ensure_non_negative(value, "amount paid"))
            .transpose()?;
        let quantity = update
            .quantity
            .map(|value| ensure_non_negative(value, "quantity"))
            .transpose()?;
        let odometer = update
            .odometer
            .map(|value| ensure_non_negative(value, "odometer"))
            .transpose()?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;
            self.require_fuel_log(&db_tx, car_id, log_id).await?;

            let mut active = fuel_logs::ActiveModel {
                id: ActiveValue::Set(log_id.to_string()),
                ..Default::default()
            };
            if let Some(date) = update.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(amount_paid) = amount_paid {
                active.amount_paid = ActiveValue::Set(amount_paid);
            }
            if let Some(quantity) = quantity {
                active.quantity = ActiveValue::Set(quantity);
            }
            if let Some(odometer) = odometer {
                active.odometer = ActiveValue::Set(odometer);
            }
            if let Some(brand) = update.brand {
                active.brand = ActiveValue::Set(brand.trim().to_string());
            }
            if let Some(notes) = update.notes {
                active.notes = ActiveValue::Set(notes.trim().to_string());
            }
            active.update(&db_tx).await?;

            if let Some(odometer) = odometer {
                self.touch_car_odometer(&db_tx, car_id, odometer, now)
                    .await?;
            }
            Ok(())
        })
    }

    /// Deletes a fuel log. Statistics adjust on the next read.
    pub async fn delete_fuel_log(&self, car_id: Uuid, log_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;
            self.require_fuel_log(&db_tx, car_id, log_id).await?;

            fuel_logs::Entity::delete_by_id(log_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
