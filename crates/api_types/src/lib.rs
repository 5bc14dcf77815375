use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod car {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CarNew {
        pub name: String,
        pub plate_number: Option<String>,
        #[serde(default)]
        pub initial_odometer: f64,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CarUpdate {
        pub name: Option<String>,
        pub plate_number: Option<String>,
        pub initial_odometer: Option<f64>,
        /// Manual correction of the maintained reading; last write wins.
        pub current_odometer: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CarView {
        pub id: Uuid,
        pub name: String,
        pub plate_number: String,
        pub initial_odometer: f64,
        pub current_odometer: f64,
        /// RFC3339 timestamp, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CarsResponse {
        pub cars: Vec<CarView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CarCreated {
        pub id: Uuid,
    }
}

pub mod fuel_log {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelLogNew {
        /// RFC3339 timestamp; if absent, the server uses now().
        pub date: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub amount_paid: f64,
        #[serde(default)]
        pub quantity: f64,
        #[serde(default)]
        pub odometer: f64,
        pub brand: Option<String>,
        pub notes: Option<String>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FuelLogUpdate {
        pub date: Option<DateTime<FixedOffset>>,
        pub amount_paid: Option<f64>,
        pub quantity: Option<f64>,
        pub odometer: Option<f64>,
        pub brand: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelLogView {
        pub id: Uuid,
        pub date: DateTime<FixedOffset>,
        pub amount_paid: f64,
        pub quantity: f64,
        pub odometer: f64,
        pub brand: String,
        pub notes: String,
    }

    /// Query parameters for the paginated fuel-log listing.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FuelLogListQuery {
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelLogListResponse {
        pub fuel_logs: Vec<FuelLogView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelLogCreated {
        pub id: Uuid,
    }
}

pub mod service {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServiceNew {
        pub name: String,
        #[serde(default)]
        pub price: f64,
        #[serde(default)]
        pub odometer: f64,
        pub description: Option<String>,
        /// Future odometer threshold; 0 or absent means no reminder.
        #[serde(default)]
        pub reminder_odometer: f64,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ServiceUpdate {
        pub name: Option<String>,
        pub price: Option<f64>,
        pub odometer: Option<f64>,
        pub description: Option<String>,
        pub reminder_odometer: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServiceView {
        pub id: Uuid,
        pub name: String,
        pub price: f64,
        pub odometer: f64,
        pub description: String,
        pub reminder_odometer: f64,
        /// Derived on every read from the car's current odometer.
        pub needs_attention: bool,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServicesResponse {
        pub services: Vec<ServiceView>,
        /// How many services are currently due.
        pub needs_attention_count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServiceCreated {
        pub id: Uuid,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: String,
        #[serde(default)]
        pub amount: f64,
        /// RFC3339 timestamp; if absent, the server uses now().
        pub date: Option<DateTime<FixedOffset>>,
        /// Odometer reading, if one was taken. 0 counts as absent.
        pub odometer: Option<f64>,
        pub description: Option<String>,
        /// Display category name; unknown values fall back to "Other".
        pub category: Option<String>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub name: Option<String>,
        pub amount: Option<f64>,
        pub date: Option<DateTime<FixedOffset>>,
        /// Present-but-zero clears the stored reading.
        pub odometer: Option<f64>,
        pub description: Option<String>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub name: String,
        pub amount: f64,
        pub date: DateTime<FixedOffset>,
        pub odometer: Option<f64>,
        pub description: String,
        pub category: String,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }
}

pub mod stats {
    use super::*;

    /// Computed fuel statistics for one car.
    ///
    /// Ratio fields are `null` whenever their denominator is missing; totals
    /// are always present.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelStatistics {
        pub avg_liters_per_100km: Option<f64>,
        pub avg_km_per_liter: Option<f64>,
        pub avg_cost_per_100km: Option<f64>,
        pub avg_cost_per_liter: Option<f64>,
        pub avg_cost_per_km: Option<f64>,
        pub total_distance: f64,
        pub total_liters: f64,
        pub total_cost: f64,
        pub total_fill_ups: u64,
        pub best_fuel_economy: Option<f64>,
        pub worst_fuel_economy: Option<f64>,
    }
}
