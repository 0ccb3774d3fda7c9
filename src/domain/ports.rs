use crate::core::persistence::StoreNames;
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use rust_decimal::Decimal;

/// Named-blob storage. Every call opens, reads or writes in full, and closes.
pub trait Storage {
    /// `Ok(None)` when the named store does not exist yet.
    fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn total_slots(&self) -> usize;
    fn hourly_rate(&self) -> Decimal;
    fn currency_symbol(&self) -> &str;
    fn store_names(&self) -> &StoreNames;
}

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}
