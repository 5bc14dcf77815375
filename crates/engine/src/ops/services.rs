use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, Service, ServiceUpdate, services};

use super::{Engine, ensure_non_negative, normalize_required_name, normalize_text, with_tx};

impl Engine {
    async fn require_service(
        &self,
        db: &sea_orm::DatabaseTransaction,
        car_id: Uuid,
        service_id: Uuid,
    ) -> ResultEngine<services::Model> {
        services::Entity::find_by_id(service_id.to_string())
            .filter(services::Column::CarId.eq(car_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("service not exists".to_string()))
    }

    /// Records a maintenance service and moves the car's current odometer to
    /// the submitted reading.
    pub async fn new_service(
        &self,
        car_id: Uuid,
        name: &str,
        price: f64,
        odometer: f64,
        description: Option<&str>,
        reminder_odometer: f64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "service")?;
        let price = ensure_non_negative(price, "price")?;
        let odometer = ensure_non_negative(odometer, "odometer")?;
        let reminder_odometer = ensure_non_negative(reminder_odometer, "reminder odometer")?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let service = Service::new(
                car_id,
                name,
                price,
                odometer,
                normalize_text(description),
                reminder_odometer,
                now,
            );
            let service_id = service.id;
            services::ActiveModel::from(&service).insert(&db_tx).await?;

            self.touch_car_odometer(&db_tx, car_id, odometer, now)
                .await?;
            Ok(service_id)
        })
    }

    /// Lists a car's services, newest first, with the derived
    /// `needs_attention` flag filled from the car's current odometer.
    pub async fn list_services(&self, car_id: Uuid) -> ResultEngine<Vec<Service>> {
        with_tx!(self, |db_tx| {
            let car = self.require_car(&db_tx, car_id).await?;
            let current_odometer = Some(car.current_odometer);

            let models = services::Entity::find()
                .filter(services::Column::CarId.eq(car_id.to_string()))
                .order_by_desc(services::Column::CreatedAt)
                .order_by_desc(services::Column::Id)
                .all(&db_tx)
                .await?;

            models
                .into_iter()
                .map(|model| Service::try_from((model, current_odometer)))
                .collect()
        })
    }

    /// Applies a partial update to a service.
    ///
    /// An update that carries an odometer reading also moves the car's
    /// current odometer.
    pub async fn update_service(
        &self,
        car_id: Uuid,
        service_id: Uuid,
        update: ServiceUpdate,
    ) -> ResultEngine<()> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "service"))
            .transpose()?;
        let price = update
            .price
            .map(|value| ensure_non_negative(value, "price"))
            .transpose()?;
        let odometer = update
            .odometer
            .map(|value| ensure_non_negative(value, "odometer"))
            .transpose()?;
        let reminder_odometer = update
            .reminder_odometer
            .map(|value| ensure_non_negative(value, "reminder odometer"))
            .transpose()?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;
            self.require_service(&db_tx, car_id, service_id).await?;

            let mut active = services::ActiveModel {
                id: ActiveValue::Set(service_id.to_string()),
                ..Default::default()
            };
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(price) = price {
                active.price = ActiveValue::Set(price);
            }
            if let Some(odometer) = odometer {
                active.odometer = ActiveValue::Set(odometer);
            }
            if let Some(description) = update.description {
                active.description = ActiveValue::Set(description.trim().to_string());
            }
            if let Some(reminder_odometer) = reminder_odometer {
                active.reminder_odometer = ActiveValue::Set(reminder_odometer);
            }
            active.update(&db_tx).await?;

            if let Some(odometer) = odometer {
                self.touch_car_odometer(&db_tx, car_id, odometer, now)
                    .await?;
            }
            Ok(())
        })
    }

    /// Deletes a service.
    pub async fn delete_service(&self, car_id: Uuid, service_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;
            self.require_service(&db_tx, car_id, service_id).await?;

            services::Entity::delete_by_id(service_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
