use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{Car, EngineError, ResultEngine, cars, expenses, fuel_logs, services};

use super::{Engine, ensure_non_negative, normalize_required_name, normalize_text, with_tx};

use crate::cars::CarUpdate;

impl Engine {
    pub(super) async fn require_car(
        &self,
        db: &DatabaseTransaction,
        car_id: Uuid,
    ) -> ResultEngine<cars::Model> {
        cars::Entity::find_by_id(car_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("car not exists".to_string()))
    }

    /// Moves a car's `current_odometer` to the submitted reading.
    ///
    /// Last write wins on whatever value came in, even when it is lower than
    /// the stored one; corrections to a mistyped reading go through the same
    /// path as ordinary writes.
    pub(super) async fn touch_car_odometer(
        &self,
        db: &DatabaseTransaction,
        car_id: Uuid,
        odometer: f64,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let active = cars::ActiveModel {
            id: ActiveValue::Set(car_id.to_string()),
            current_odometer: ActiveValue::Set(odometer),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        active.update(db).await?;
        Ok(())
    }

    /// Registers a new car. Its current odometer starts at the initial one.
    pub async fn new_car(
        &self,
        name: &str,
        plate_number: Option<&str>,
        initial_odometer: f64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "car")?;
        let initial_odometer = ensure_non_negative(initial_odometer, "initial odometer")?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            let car = Car::new(name, normalize_text(plate_number), initial_odometer, now);
            let car_id = car.id;
            cars::ActiveModel::from(&car).insert(&db_tx).await?;
            Ok(car_id)
        })
    }

    /// Returns one car.
    pub async fn car(&self, car_id: Uuid) -> ResultEngine<Car> {
        with_tx!(self, |db_tx| {
            let model = self.require_car(&db_tx, car_id).await?;
            Car::try_from(model)
        })
    }

    /// Lists all cars, newest first.
    pub async fn list_cars(&self) -> ResultEngine<Vec<Car>> {
        with_tx!(self, |db_tx| {
            let models = cars::Entity::find()
                .order_by_desc(cars::Column::CreatedAt)
                .order_by_desc(cars::Column::Id)
                .all(&db_tx)
                .await?;

            models.into_iter().map(Car::try_from).collect()
        })
    }

    /// Applies a partial update to a car.
    ///
    /// `current_odometer` goes through the same last-write-wins policy as
    /// record writes.
    pub async fn update_car(&self, car_id: Uuid, update: CarUpdate) -> ResultEngine<()> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "car"))
            .transpose()?;
        let initial_odometer = update
            .initial_odometer
            .map(|value| ensure_non_negative(value, "initial odometer"))
            .transpose()?;
        let current_odometer = update
            .current_odometer
            .map(|value| ensure_non_negative(value, "current odometer"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let mut active = cars::ActiveModel {
                id: ActiveValue::Set(car_id.to_string()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(plate_number) = update.plate_number {
                active.plate_number = ActiveValue::Set(plate_number.trim().to_string());
            }
            if let Some(initial_odometer) = initial_odometer {
                active.initial_odometer = ActiveValue::Set(initial_odometer);
            }
            if let Some(current_odometer) = current_odometer {
                active.current_odometer = ActiveValue::Set(current_odometer);
            }
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a car together with its fuel logs, services and expenses.
    pub async fn delete_car(&self, car_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let car_id = car_id.to_string();
            fuel_logs::Entity::delete_many()
                .filter(fuel_logs::Column::CarId.eq(car_id.clone()))
                .exec(&db_tx)
                .await?;
            services::Entity::delete_many()
                .filter(services::Column::CarId.eq(car_id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_many()
                .filter(expenses::Column::CarId.eq(car_id.clone()))
                .exec(&db_tx)
                .await?;
            cars::Entity::delete_by_id(car_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
