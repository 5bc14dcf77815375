pub use cars::{Car, CarUpdate};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseCategory, ExpenseUpdate};
pub use fuel_logs::{FuelLog, FuelLogUpdate};
pub use ops::{Engine, EngineBuilder, FuelLogPage};
pub use services::{Service, ServiceUpdate, needs_attention};
pub use stats::FuelStatistics;

mod cars;
mod error;
mod expenses;
mod fuel_logs;
mod ops;
mod services;
mod stats;

type ResultEngine<T> = Result<T, EngineError>;
