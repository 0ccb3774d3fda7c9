pub mod ledger;
pub mod lot;
pub mod persistence;
pub mod registry;

pub use crate::domain::model::{EarningsSnapshot, ExitReceipt, MapSnapshot, ParkReceipt, Slot, Vehicle};
pub use crate::domain::ports::{Clock, ConfigProvider, Storage};
pub use crate::utils::error::Result;
