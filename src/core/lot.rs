use crate::core::ledger::{duration_hours, LedgerEngine};
use crate::core::persistence::{LoadReport, LotStore};
use crate::core::registry::SlotRegistry;
use crate::core::{Clock, ConfigProvider, Storage};
use crate::domain::model::{
    EarningsSnapshot, ExitReceipt, MapSnapshot, ParkReceipt, Slot, Vehicle,
};
use crate::utils::error::{LotError, Result};

/// Result of a state change that has already been applied in memory.
///
/// A failed save does not undo the change; it is carried here so the caller
/// can tell the user.
#[derive(Debug)]
pub struct Committed<T> {
    pub snapshot: T,
    pub persistence_failure: Option<LotError>,
}

impl<T> Committed<T> {
    pub fn is_durable(&self) -> bool {
        self.persistence_failure.is_none()
    }
}

pub struct ParkingLot<S: Storage, K: Clock> {
    registry: SlotRegistry,
    ledger: LedgerEngine,
    store: LotStore<S>,
    clock: K,
    currency_symbol: String,
    load_report: LoadReport,
}

impl<S: Storage, K: Clock> ParkingLot<S, K> {
    /// Builds the slot table, then overlays saved occupancy and earnings.
    pub fn open<C: ConfigProvider>(config: &C, storage: S, clock: K) -> Result<Self> {
        let mut registry = SlotRegistry::new(config.total_slots())?;
        let store = LotStore::new(storage, config.store_names().clone());
        let load_report = store.load_slots(&mut registry)?;
        let earnings = store.load_earnings()?;
        let ledger = LedgerEngine::with_earnings(config.hourly_rate(), earnings);

        tracing::info!(
            slots = registry.len(),
            occupied = registry.map_snapshot().occupied_count(),
            total = %earnings.total,
            "parking lot opened"
        );

        Ok(Self {
            registry,
            ledger,
            store,
            clock,
            currency_symbol: config.currency_symbol().to_string(),
            load_report,
        })
    }

    pub fn park(&mut self, license_plate: &str, label: &str) -> Result<Committed<ParkReceipt>> {
        let vehicle = Vehicle::new(license_plate, self.clock.now());
        let snapshot = ParkReceipt {
            label: label.to_string(),
            license_plate: vehicle.license_plate.clone(),
            entry_time: vehicle.entry_time,
        };
        self.registry.park(vehicle, label)?;

        let persistence_failure = self.store.save_slots(&self.registry).err();
        if let Some(e) = &persistence_failure {
            tracing::warn!(slot = label, "park applied but not saved: {}", e);
        }
        tracing::info!(slot = label, plate = license_plate, "vehicle parked");

        Ok(Committed {
            snapshot,
            persistence_failure,
        })
    }

    /// Charges and frees the slot. The fee is settled before the slot is
    /// vacated, so a fee that cannot be recorded leaves the vehicle parked.
    pub fn exit(&mut self, label: &str) -> Result<Committed<ExitReceipt>> {
        let entry_time = self
            .registry
            .find_slot(label)
            .and_then(Slot::occupant)
            .map(|vehicle| vehicle.entry_time)
            .ok_or_else(|| LotError::SlotNotFoundOrEmpty {
                label: label.to_string(),
            })?;
        let exit_time = self.clock.now();
        let duration = exit_time - entry_time;
        if duration < chrono::TimeDelta::zero() {
            tracing::warn!(
                slot = label,
                entry = %entry_time,
                "entry time is in the future, charging zero hours"
            );
        }
        let fee = self.ledger.compute_fee(duration)?;
        self.ledger.record_earning(fee)?;
        let vehicle = self.registry.exit(label)?;

        let slot_failure = self.store.save_slots(&self.registry).err();
        let earnings_failure = self.store.save_earnings(&self.ledger.snapshot()).err();
        for e in slot_failure.iter().chain(earnings_failure.iter()) {
            tracing::warn!(slot = label, "exit applied but not saved: {}", e);
        }
        tracing::info!(slot = label, plate = %vehicle.license_plate, %fee, "vehicle exited");

        Ok(Committed {
            snapshot: ExitReceipt {
                label: label.to_string(),
                license_plate: vehicle.license_plate,
                entry_time: vehicle.entry_time,
                exit_time,
                duration_hours: duration_hours(duration),
                fee,
            },
            persistence_failure: slot_failure.or(earnings_failure),
        })
    }

    pub fn map_snapshot(&self) -> MapSnapshot {
        self.registry.map_snapshot()
    }

    pub fn earnings(&self) -> EarningsSnapshot {
        self.ledger.snapshot()
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &LedgerEngine {
        &self.ledger
    }

    pub fn store(&self) -> &LotStore<S> {
        &self.store
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// What the start-up load restored, ignored and skipped.
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }
}
