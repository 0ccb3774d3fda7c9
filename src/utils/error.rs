use thiserror::Error;

#[derive(Error, Debug)]
pub enum LotError {
    #[error("Invalid slot: {label}")]
    SlotNotFound { label: String },

    #[error("Slot {label} is already occupied")]
    SlotOccupied { label: String },

    #[error("Slot is empty or invalid slot number: {label}")]
    SlotNotFoundOrEmpty { label: String },

    #[error("Amount out of range while {operation}")]
    AmountOverflow { operation: String },

    #[error("Malformed record in {store} (line {line}): {reason}")]
    MalformedPersistedRecord {
        store: String,
        line: usize,
        reason: String,
    },

    #[error("Failed to persist {store}: {message}")]
    PersistenceFailure { store: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected request against current lot state; nothing changed.
    Operation,
    Persistence,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LotError {
    pub fn persistence(store: impl Into<String>, err: impl std::fmt::Display) -> Self {
        LotError::PersistenceFailure {
            store: store.into(),
            message: err.to_string(),
        }
    }

    pub fn malformed(store: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        LotError::MalformedPersistedRecord {
            store: store.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LotError::SlotNotFound { .. }
            | LotError::SlotOccupied { .. }
            | LotError::SlotNotFoundOrEmpty { .. }
            | LotError::AmountOverflow { .. } => ErrorCategory::Operation,
            LotError::MalformedPersistedRecord { .. }
            | LotError::PersistenceFailure { .. }
            | LotError::IoError(_)
            | LotError::CsvError(_) => ErrorCategory::Persistence,
            LotError::ConfigError { .. }
            | LotError::ConfigValidationError { .. }
            | LotError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LotError::SlotNotFound { .. }
            | LotError::SlotOccupied { .. }
            | LotError::SlotNotFoundOrEmpty { .. } => ErrorSeverity::Low,
            LotError::AmountOverflow { .. } | LotError::PersistenceFailure { .. } => {
                ErrorSeverity::Medium
            }
            LotError::ConfigError { .. }
            | LotError::ConfigValidationError { .. }
            | LotError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            LotError::MalformedPersistedRecord { .. }
            | LotError::IoError(_)
            | LotError::CsvError(_) => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the person at the console.
    pub fn user_friendly_message(&self) -> String {
        match self {
            LotError::SlotNotFound { .. } => "Invalid slot.".to_string(),
            LotError::SlotOccupied { label } => format!("Slot {} is already occupied.", label),
            LotError::SlotNotFoundOrEmpty { .. } => {
                "Slot is empty or invalid slot number.".to_string()
            }
            LotError::AmountOverflow { .. } => {
                "The fee is too large to record. The vehicle is still parked.".to_string()
            }
            LotError::MalformedPersistedRecord { store, .. } => {
                format!("Saved data in {} could not be read.", store)
            }
            LotError::PersistenceFailure { store, .. } => format!(
                "The change was applied but could not be saved to {}.",
                store
            ),
            LotError::IoError(e) => format!("File access failed: {}", e),
            LotError::CsvError(e) => format!("Slot data could not be processed: {}", e),
            LotError::ConfigError { message } => format!("Configuration problem: {}", message),
            LotError::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            LotError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LotError::SlotNotFound { .. } => "Use a label shown on the parking lot map, e.g. A1.",
            LotError::SlotOccupied { .. } => "Pick a slot marked [O] on the parking lot map.",
            LotError::SlotNotFoundOrEmpty { .. } => {
                "Check the map for the slot the vehicle is parked in."
            }
            LotError::AmountOverflow { .. } => "Lower the configured hourly rate, then restart.",
            LotError::MalformedPersistedRecord { .. } => {
                "Fix or remove the offending data file, then restart."
            }
            LotError::PersistenceFailure { .. } | LotError::IoError(_) | LotError::CsvError(_) => {
                "Check that the data directory exists, is writable and has free space."
            }
            LotError::ConfigError { .. }
            | LotError::ConfigValidationError { .. }
            | LotError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and configuration file."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LotError>;
