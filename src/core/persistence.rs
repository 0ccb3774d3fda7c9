use crate::core::registry::SlotRegistry;
use crate::domain::model::{format_amount, EarningsSnapshot, Slot, Vehicle};
use crate::domain::ports::Storage;
use crate::utils::error::{LotError, Result};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const NULL_TOKEN: &str = "null";
const SLOT_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreNames {
    pub slot_file: String,
    pub total_earnings_file: String,
    pub weekly_earnings_file: String,
    pub monthly_earnings_file: String,
}

impl Default for StoreNames {
    fn default() -> Self {
        Self {
            slot_file: "ParkingLotData.txt".to_string(),
            total_earnings_file: "TotalEarnings.txt".to_string(),
            weekly_earnings_file: "WeeklyEarnings.txt".to_string(),
            monthly_earnings_file: "MonthlyEarnings.txt".to_string(),
        }
    }
}

/// One line of the slot file after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    pub label: String,
    pub occupant: Option<Vehicle>,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub restored: usize,
    pub ignored_labels: Vec<String>,
    pub skipped: Vec<LotError>,
}

pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Accepts RFC 3339 with any offset, or an offset-less timestamp taken as
/// local time.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn encode_slots(slots: &[Slot]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for slot in slots {
        let (plate, entry) = match slot.occupant() {
            Some(vehicle) => (
                vehicle.license_plate.clone(),
                format_timestamp(&vehicle.entry_time),
            ),
            None => (NULL_TOKEN.to_string(), NULL_TOKEN.to_string()),
        };
        let occupied = if slot.is_occupied() { "True" } else { "False" };
        writer.write_record([slot.label(), occupied, plate.as_str(), entry.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| LotError::IoError(e.into_error()))
}

fn parse_slot_record(store: &str, line: usize, record: &csv::StringRecord) -> Result<SlotRecord> {
    if record.len() != SLOT_FIELDS {
        return Err(LotError::malformed(
            store,
            line,
            format!("expected {} fields, found {}", SLOT_FIELDS, record.len()),
        ));
    }

    let label = record[0].to_string();
    let occupied = parse_bool(&record[1]).ok_or_else(|| {
        LotError::malformed(store, line, format!("invalid boolean '{}'", &record[1]))
    })?;
    if !occupied {
        return Ok(SlotRecord {
            label,
            occupant: None,
        });
    }

    // The occupied flag decides how the remaining fields are read, so a plate
    // spelled like the null token is still a plate here.
    let plate = &record[2];
    let entry = &record[3];
    if entry == NULL_TOKEN {
        return Err(LotError::malformed(
            store,
            line,
            format!("slot {} is occupied but has no entry time", label),
        ));
    }
    let entry_time = parse_timestamp(entry).ok_or_else(|| {
        LotError::malformed(store, line, format!("invalid entry time '{}'", entry))
    })?;

    Ok(SlotRecord {
        label,
        occupant: Some(Vehicle::new(plate, entry_time)),
    })
}

/// Line in the file where a record starts. The reader's position is taken
/// before it skips blank lines, so those are counted here.
fn physical_line(data: &[u8], position: Option<&csv::Position>, record_index: usize) -> usize {
    let Some(position) = position else {
        return record_index + 1;
    };
    let start = usize::try_from(position.byte()).map_or(data.len(), |b| b.min(data.len()));
    let blank_lines = data[start..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count();
    usize::try_from(position.line()).map_or(record_index + 1, |line| line + blank_lines)
}

/// Parses every record it can. Bad records come back as errors alongside the
/// good ones instead of aborting the load.
pub fn decode_slots(store: &str, data: &[u8]) -> (Vec<SlotRecord>, Vec<LotError>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let parsed = match result {
            Ok(record) => {
                let line = physical_line(data, record.position(), i);
                parse_slot_record(store, line, &record)
            }
            Err(e) => {
                let line = physical_line(data, e.position(), i);
                Err(LotError::malformed(store, line, e.to_string()))
            }
        };
        match parsed {
            Ok(record) => records.push(record),
            Err(e) => errors.push(e),
        }
    }
    (records, errors)
}

fn parse_amount(store: &str, data: &[u8]) -> Result<Decimal> {
    let text = std::str::from_utf8(data)
        .map_err(|e| LotError::malformed(store, 1, e.to_string()))?
        .trim();
    let amount = Decimal::from_str(text)
        .map_err(|e| LotError::malformed(store, 1, format!("invalid amount '{}': {}", text, e)))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LotError::malformed(
            store,
            1,
            format!("negative amount '{}'", text),
        ));
    }
    Ok(amount)
}

fn as_persistence_failure(store: &str, err: LotError) -> LotError {
    match err {
        LotError::PersistenceFailure { .. } => err,
        other => LotError::persistence(store, other),
    }
}

/// Durable home of the slot table and the three earnings totals.
#[derive(Debug, Clone)]
pub struct LotStore<S: Storage> {
    storage: S,
    names: StoreNames,
}

impl<S: Storage> LotStore<S> {
    pub fn new(storage: S, names: StoreNames) -> Self {
        Self { storage, names }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn names(&self) -> &StoreNames {
        &self.names
    }

    pub fn save_slots(&self, registry: &SlotRegistry) -> Result<()> {
        let store = &self.names.slot_file;
        let data = encode_slots(registry.slots()).map_err(|e| as_persistence_failure(store, e))?;
        self.storage
            .write_file(store, &data)
            .map_err(|e| as_persistence_failure(store, e))?;
        tracing::debug!(store = %store, slots = registry.len(), "slot state saved");
        Ok(())
    }

    pub fn load_slots(&self, registry: &mut SlotRegistry) -> Result<LoadReport> {
        let store = &self.names.slot_file;
        let mut report = LoadReport::default();
        let Some(data) = self.storage.read_file(store)? else {
            tracing::info!(store = %store, "no saved slot state, starting with a free lot");
            return Ok(report);
        };

        let (records, errors) = decode_slots(store, &data);
        for error in &errors {
            tracing::warn!("skipping slot record: {}", error);
        }
        report.skipped = errors;

        for record in records {
            if registry.restore(&record.label, record.occupant) {
                report.restored += 1;
            } else {
                tracing::debug!(label = %record.label, "ignoring saved slot not in this lot");
                report.ignored_labels.push(record.label);
            }
        }

        tracing::info!(
            store = %store,
            restored = report.restored,
            ignored = report.ignored_labels.len(),
            skipped = report.skipped.len(),
            "slot state loaded"
        );
        Ok(report)
    }

    /// Writes all three totals, attempting each even if an earlier one fails.
    pub fn save_earnings(&self, earnings: &EarningsSnapshot) -> Result<()> {
        let writes = [
            (&self.names.total_earnings_file, earnings.total),
            (&self.names.weekly_earnings_file, earnings.weekly),
            (&self.names.monthly_earnings_file, earnings.monthly),
        ];

        let mut first_failure = None;
        for (store, amount) in writes {
            if let Err(e) = self
                .storage
                .write_file(store, format_amount(amount).as_bytes())
            {
                let failure = as_persistence_failure(store, e);
                tracing::warn!("{}", failure);
                first_failure.get_or_insert(failure);
            }
        }

        match first_failure {
            Some(failure) => Err(failure),
            None => {
                tracing::debug!(total = %earnings.total, "earnings saved");
                Ok(())
            }
        }
    }

    pub fn load_earnings(&self) -> Result<EarningsSnapshot> {
        Ok(EarningsSnapshot {
            total: self.load_amount(&self.names.total_earnings_file)?,
            weekly: self.load_amount(&self.names.weekly_earnings_file)?,
            monthly: self.load_amount(&self.names.monthly_earnings_file)?,
        })
    }

    fn load_amount(&self, store: &str) -> Result<Decimal> {
        match self.storage.read_file(store)? {
            Some(data) => parse_amount(store, &data),
            None => Ok(Decimal::ZERO),
        }
    }
}
