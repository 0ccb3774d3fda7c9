use crate::domain::model::{MapSnapshot, Slot, SlotCell, Vehicle};
use crate::utils::error::{LotError, Result};
use std::collections::HashMap;

const COLUMNS_PER_ROW: usize = 10;

/// Generates `A1..A10, B1..B10, ...` for `total_slots` slots.
///
/// The row letter keeps counting past `Z` the way a character increment
/// would; an error is returned only once no valid character remains.
pub fn slot_labels(total_slots: usize) -> Result<Vec<String>> {
    (0..total_slots)
        .map(|i| {
            let row = i / COLUMNS_PER_ROW;
            let column = i % COLUMNS_PER_ROW + 1;
            u32::try_from(row)
                .ok()
                .and_then(|row| ('A' as u32).checked_add(row))
                .and_then(char::from_u32)
                .map(|letter| format!("{}{}", letter, column))
                .ok_or_else(|| LotError::InvalidConfigValueError {
                    field: "total_slots".to_string(),
                    value: total_slots.to_string(),
                    reason: format!("row letter for slot {} is out of range", i + 1),
                })
        })
        .collect()
}

/// The fixed set of slots, in creation order.
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl SlotRegistry {
    pub fn new(total_slots: usize) -> Result<Self> {
        let slots: Vec<Slot> = slot_labels(total_slots)?
            .into_iter()
            .map(Slot::new)
            .collect();
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.label().to_string(), i))
            .collect();
        Ok(Self { slots, index })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn find_slot(&self, label: &str) -> Option<&Slot> {
        self.index.get(label).map(|&i| &self.slots[i])
    }

    fn find_slot_mut(&mut self, label: &str) -> Option<&mut Slot> {
        let i = *self.index.get(label)?;
        self.slots.get_mut(i)
    }

    /// Free -> Occupied. On failure nothing changes.
    pub fn park(&mut self, vehicle: Vehicle, label: &str) -> Result<&Slot> {
        let slot = self
            .find_slot_mut(label)
            .ok_or_else(|| LotError::SlotNotFound {
                label: label.to_string(),
            })?;
        if slot.is_occupied() {
            return Err(LotError::SlotOccupied {
                label: label.to_string(),
            });
        }
        tracing::debug!(slot = label, plate = %vehicle.license_plate, "slot occupied");
        slot.occupy(vehicle);
        Ok(&*slot)
    }

    /// Occupied -> Free, handing back the vehicle that left.
    pub fn exit(&mut self, label: &str) -> Result<Vehicle> {
        let vehicle = self
            .find_slot_mut(label)
            .and_then(Slot::vacate)
            .ok_or_else(|| LotError::SlotNotFoundOrEmpty {
                label: label.to_string(),
            })?;
        tracing::debug!(slot = label, plate = %vehicle.license_plate, "slot freed");
        Ok(vehicle)
    }

    /// Overwrites a slot with persisted state. Returns `false` for labels
    /// this registry does not have.
    pub fn restore(&mut self, label: &str, occupant: Option<Vehicle>) -> bool {
        match self.find_slot_mut(label) {
            Some(slot) => {
                slot.vacate();
                if let Some(vehicle) = occupant {
                    slot.occupy(vehicle);
                }
                true
            }
            None => false,
        }
    }

    pub fn map_snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            cells: self
                .slots
                .iter()
                .map(|slot| SlotCell {
                    label: slot.label().to_string(),
                    occupied: slot.is_occupied(),
                })
                .collect(),
        }
    }
}
