use chrono::{DateTime, Local};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Slots per rendered map row.
pub const MAP_ROW_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub license_plate: String,
    pub entry_time: DateTime<Local>,
}

impl Vehicle {
    pub fn new(license_plate: impl Into<String>, entry_time: DateTime<Local>) -> Self {
        Self {
            license_plate: license_plate.into(),
            entry_time,
        }
    }
}

/// A labelled space. Occupancy is derived from the occupant, so a slot can
/// never be marked occupied without a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    label: String,
    occupant: Option<Vehicle>,
}

impl Slot {
    pub(crate) fn new(label: String) -> Self {
        Self {
            label,
            occupant: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&Vehicle> {
        self.occupant.as_ref()
    }

    pub(crate) fn occupy(&mut self, vehicle: Vehicle) {
        self.occupant = Some(vehicle);
    }

    pub(crate) fn vacate(&mut self) -> Option<Vehicle> {
        self.occupant.take()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkReceipt {
    pub label: String,
    pub license_plate: String,
    pub entry_time: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReceipt {
    pub label: String,
    pub license_plate: String,
    pub entry_time: DateTime<Local>,
    pub exit_time: DateTime<Local>,
    pub duration_hours: Decimal,
    pub fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCell {
    pub label: String,
    pub occupied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSnapshot {
    pub cells: Vec<SlotCell>,
}

impl MapSnapshot {
    /// Cells in creation order, grouped `width` per row.
    pub fn rows(&self, width: usize) -> std::slice::Chunks<'_, SlotCell> {
        self.cells.chunks(width.max(1))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    pub fn free_count(&self) -> usize {
        self.cells.len() - self.occupied_count()
    }

    pub fn is_occupied(&self, label: &str) -> Option<bool> {
        self.cells
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.occupied)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EarningsSnapshot {
    pub total: Decimal,
    pub weekly: Decimal,
    pub monthly: Decimal,
}

/// Rounds half away from zero to cents and always prints two decimals.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

pub fn format_display_time(time: &DateTime<Local>) -> String {
    time.format(DISPLAY_TIME_FORMAT).to_string()
}
