pub mod cli;
pub mod toml_config;

use crate::core::ledger::default_hourly_rate;
use crate::core::persistence::StoreNames;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use rust_decimal::Decimal;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "P";
pub const DEFAULT_DATA_DIR: &str = ".";

/// Fully resolved settings the lot runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotSettings {
    pub total_slots: usize,
    pub hourly_rate: Decimal,
    pub currency_symbol: String,
    pub data_dir: String,
    pub store_names: StoreNames,
    pub log_filter: Option<String>,
}

impl LotSettings {
    pub fn new(total_slots: usize) -> Self {
        Self {
            total_slots,
            hourly_rate: default_hourly_rate(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
            store_names: StoreNames::default(),
            log_filter: None,
        }
    }
}

impl ConfigProvider for LotSettings {
    fn total_slots(&self) -> usize {
        self.total_slots
    }

    fn hourly_rate(&self) -> Decimal {
        self.hourly_rate
    }

    fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    fn store_names(&self) -> &StoreNames {
        &self.store_names
    }
}

impl Validate for LotSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("total_slots", self.total_slots, 1)?;
        validation::validate_non_negative_amount("hourly_rate", self.hourly_rate)?;
        validation::validate_non_empty_string("currency_symbol", &self.currency_symbol)?;
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_path("storage.slot_file", &self.store_names.slot_file)?;
        validation::validate_path(
            "storage.total_earnings_file",
            &self.store_names.total_earnings_file,
        )?;
        validation::validate_path(
            "storage.weekly_earnings_file",
            &self.store_names.weekly_earnings_file,
        )?;
        validation::validate_path(
            "storage.monthly_earnings_file",
            &self.store_names.monthly_earnings_file,
        )?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "parking-lot")]
#[command(about = "Parking lot console: slots, check-in/check-out and earnings")]
pub struct CliConfig {
    /// Number of parking slots; prompted for when neither flag nor file sets it
    #[arg(long)]
    pub slots: Option<usize>,

    #[arg(long, help = "Fee charged per hour parked")]
    pub hourly_rate: Option<Decimal>,

    #[arg(long, help = "Prefix printed before amounts")]
    pub currency: Option<String>,

    #[arg(long, help = "Directory holding the slot and earnings files")]
    pub data_dir: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Print a JSON report of the lot and exit")]
    pub report: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Flags win over the file, the file wins over defaults. `prompt_slots`
    /// runs only when no slot count is configured anywhere.
    pub fn resolve<F>(&self, file: Option<&TomlConfig>, prompt_slots: F) -> Result<LotSettings>
    where
        F: FnOnce() -> Result<usize>,
    {
        let configured_slots = self
            .slots
            .or_else(|| file.and_then(|f| f.lot.total_slots));
        let total_slots = match configured_slots {
            Some(n) => n,
            None => prompt_slots()?,
        };

        let mut settings = LotSettings::new(total_slots);
        if let Some(file) = file {
            if let Some(rate) = file.pricing.hourly_rate {
                settings.hourly_rate = rate;
            }
            if let Some(symbol) = &file.pricing.currency_symbol {
                settings.currency_symbol = symbol.clone();
            }
            if let Some(dir) = &file.storage.data_dir {
                settings.data_dir = dir.clone();
            }
            settings.store_names = file.storage.names.clone();
            settings.log_filter = file.logging.filter.clone();
        }

        if let Some(rate) = self.hourly_rate {
            settings.hourly_rate = rate;
        }
        if let Some(symbol) = &self.currency {
            settings.currency_symbol = symbol.clone();
        }
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}
