use uuid::Uuid;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{FuelLog, FuelStatistics, ResultEngine, fuel_logs};

use super::{Engine, with_tx};

impl Engine {
    /// Computes a car's fuel statistics from its full fuel-log history.
    ///
    /// The computation itself is pure; this just loads the history. No
    /// ordering is requested from the database, the statistics sort by
    /// odometer internally.
    pub async fn fuel_statistics(&self, car_id: Uuid) -> ResultEngine<FuelStatistics> {
        with_tx!(self, |db_tx| {
            self.require_car(&db_tx, car_id).await?;

            let models = fuel_logs::Entity::find()
                .filter(fuel_logs::Column::CarId.eq(car_id.to_string()))
                .all(&db_tx)
                .await?;

            let logs = models
                .into_iter()
                .map(FuelLog::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(FuelStatistics::from_logs(&logs))
        })
    }
}
