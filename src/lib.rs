pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, LotSettings};
pub use crate::core::{
    ledger::LedgerEngine,
    lot::{Committed, ParkingLot},
    persistence::{LotStore, StoreNames},
    registry::SlotRegistry,
};
pub use domain::clock::{ManualClock, SystemClock};
pub use utils::error::{LotError, Result};
