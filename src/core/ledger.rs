use crate::domain::model::EarningsSnapshot;
use crate::utils::error::{LotError, Result};
use chrono::TimeDelta;
use rust_decimal::Decimal;

const NANOS_PER_HOUR: i64 = 3_600_000_000_000;
const MILLIS_PER_HOUR: i64 = 3_600_000;

pub fn default_hourly_rate() -> Decimal {
    Decimal::from(50)
}

/// Exact elapsed hours. Negative spans count as zero.
pub fn duration_hours(duration: TimeDelta) -> Decimal {
    if duration <= TimeDelta::zero() {
        return Decimal::ZERO;
    }
    match duration.num_nanoseconds() {
        Some(nanos) => Decimal::from(nanos) / Decimal::from(NANOS_PER_HOUR),
        // Spans beyond ~292 years overflow i64 nanoseconds.
        None => Decimal::from(duration.num_milliseconds()) / Decimal::from(MILLIS_PER_HOUR),
    }
}

/// Fee computation plus the three running earnings totals.
///
/// The weekly and monthly totals never roll over; they move in lockstep with
/// the overall total.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    hourly_rate: Decimal,
    earnings: EarningsSnapshot,
}

impl LedgerEngine {
    pub fn new(hourly_rate: Decimal) -> Self {
        Self::with_earnings(hourly_rate, EarningsSnapshot::default())
    }

    pub fn with_earnings(hourly_rate: Decimal, earnings: EarningsSnapshot) -> Self {
        Self {
            hourly_rate,
            earnings,
        }
    }

    pub fn hourly_rate(&self) -> Decimal {
        self.hourly_rate
    }

    /// `hourly_rate * hours`, proportional to the exact elapsed time.
    pub fn compute_fee(&self, duration: TimeDelta) -> Result<Decimal> {
        self.hourly_rate
            .checked_mul(duration_hours(duration))
            .ok_or_else(|| overflow("computing the fee"))
    }

    /// Adds `fee` to all three totals, or to none of them if any would
    /// overflow.
    pub fn record_earning(&mut self, fee: Decimal) -> Result<()> {
        debug_assert!(!fee.is_sign_negative() || fee.is_zero());
        let add = |amount: Decimal| {
            amount
                .checked_add(fee)
                .ok_or_else(|| overflow("recording the earning"))
        };
        self.earnings = EarningsSnapshot {
            total: add(self.earnings.total)?,
            weekly: add(self.earnings.weekly)?,
            monthly: add(self.earnings.monthly)?,
        };
        tracing::debug!(%fee, total = %self.earnings.total, "earning recorded");
        Ok(())
    }

    pub fn snapshot(&self) -> EarningsSnapshot {
        self.earnings
    }
}

fn overflow(operation: &str) -> LotError {
    LotError::AmountOverflow {
        operation: operation.to_string(),
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new(default_hourly_rate())
    }
}
