use crate::domain::model::{
    format_amount, format_display_time, EarningsSnapshot, ExitReceipt, MapSnapshot, ParkReceipt,
    SlotCell, MAP_ROW_WIDTH,
};
use serde::Serialize;
use std::fmt::Write;

const DIVIDER: &str = "+----------------------+----------------------+";
const HEADER: &str = "|       Details        |       Values         |";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarningsKind {
    Total,
    Weekly,
    Monthly,
}

impl EarningsKind {
    pub fn title(&self) -> &'static str {
        match self {
            EarningsKind::Total => "Total Earnings",
            EarningsKind::Weekly => "Weekly Earnings",
            EarningsKind::Monthly => "Monthly Earnings",
        }
    }

    pub fn pick(&self, earnings: &EarningsSnapshot) -> rust_decimal::Decimal {
        match self {
            EarningsKind::Total => earnings.total,
            EarningsKind::Weekly => earnings.weekly,
            EarningsKind::Monthly => earnings.monthly,
        }
    }
}

fn table(rows: &[(&str, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", DIVIDER);
    let _ = writeln!(out, "{}", HEADER);
    let _ = writeln!(out, "{}", DIVIDER);
    for (name, value) in rows {
        let _ = writeln!(out, "| {:<21}| {:<20}|", name, value);
    }
    let _ = writeln!(out, "{}", DIVIDER);
    out
}

pub fn render_park_receipt(receipt: &ParkReceipt) -> String {
    table(&[
        ("Slot Label", receipt.label.clone()),
        ("Vehicle License Plate", receipt.license_plate.clone()),
        ("Entry Time", format_display_time(&receipt.entry_time)),
    ])
}

pub fn render_exit_receipt(receipt: &ExitReceipt, currency: &str) -> String {
    table(&[
        ("Slot Label", receipt.label.clone()),
        ("Vehicle License Plate", receipt.license_plate.clone()),
        ("Entry Time", format_display_time(&receipt.entry_time)),
        ("Exit Time", format_display_time(&receipt.exit_time)),
        ("Duration (hours)", format_amount(receipt.duration_hours)),
        (
            "Parking Fee",
            format!("{}{}", currency, format_amount(receipt.fee)),
        ),
    ])
}

/// `| A1 [O] | A2 [X] ...|`, ten cells per line.
pub fn render_map(snapshot: &MapSnapshot) -> String {
    let mut out = String::from("\nParking Lot Map:\n");
    for row in snapshot.rows(MAP_ROW_WIDTH) {
        for cell in row {
            let marker = if cell.occupied { "X" } else { "O" };
            let _ = write!(out, "| {} [{}] ", cell.label, marker);
        }
        out.push_str("|\n");
    }
    out
}

pub fn render_earnings(kind: EarningsKind, earnings: &EarningsSnapshot, currency: &str) -> String {
    format!(
        "{}: {}{}",
        kind.title(),
        currency,
        format_amount(kind.pick(earnings))
    )
}

#[derive(Debug, Serialize)]
struct EarningsReport {
    total: String,
    weekly: String,
    monthly: String,
}

#[derive(Debug, Serialize)]
struct LotReport<'a> {
    currency: &'a str,
    occupied: usize,
    free: usize,
    slots: &'a [SlotCell],
    earnings: EarningsReport,
}

pub fn render_report(
    snapshot: &MapSnapshot,
    earnings: &EarningsSnapshot,
    currency: &str,
) -> serde_json::Result<String> {
    let report = LotReport {
        currency,
        occupied: snapshot.occupied_count(),
        free: snapshot.free_count(),
        slots: &snapshot.cells,
        earnings: EarningsReport {
            total: format_amount(earnings.total),
            weekly: format_amount(earnings.weekly),
            monthly: format_amount(earnings.monthly),
        },
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn cells(states: &[bool]) -> MapSnapshot {
        MapSnapshot {
            cells: states
                .iter()
                .enumerate()
                .map(|(i, &occupied)| SlotCell {
                    label: format!("A{}", i + 1),
                    occupied,
                })
                .collect(),
        }
    }

    #[test]
    fn test_map_marks_occupied_slots() {
        let rendered = render_map(&cells(&[false, true, false]));
        assert_eq!(
            rendered,
            "\nParking Lot Map:\n| A1 [O] | A2 [X] | A3 [O] |\n"
        );
    }

    #[test]
    fn test_map_wraps_every_ten_slots() {
        let rendered = render_map(&cells(&[false; 12]));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("| A1 [O] "));
        assert!(lines[2].ends_with("| A10 [O] |"));
        assert_eq!(lines[3], "| A11 [O] | A12 [O] |");
    }

    #[test]
    fn test_park_receipt_layout() {
        let receipt = ParkReceipt {
            label: "A2".to_string(),
            license_plate: "XYZ123".to_string(),
            entry_time: Local.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap(),
        };
        let rendered = render_park_receipt(&receipt);
        assert!(rendered.contains("| Slot Label           | A2                  |"));
        assert!(rendered.contains("| Vehicle License Plate| XYZ123              |"));
        assert!(rendered.contains("| Entry Time           | 2024-05-01 09:05:00 |"));
    }

    #[test]
    fn test_exit_receipt_shows_fee_with_currency() {
        let entry = Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let receipt = ExitReceipt {
            label: "A2".to_string(),
            license_plate: "XYZ123".to_string(),
            entry_time: entry,
            exit_time: entry + chrono::TimeDelta::hours(2),
            duration_hours: Decimal::from(2),
            fee: Decimal::from(100),
        };
        let rendered = render_exit_receipt(&receipt, "P");
        assert!(rendered.contains("| Duration (hours)     | 2.00                |"));
        assert!(rendered.contains("| Parking Fee          | P100.00             |"));
        assert!(rendered.contains("| Exit Time            | 2024-05-01 11:00:00 |"));
    }

    #[test]
    fn test_earnings_lines() {
        let earnings = EarningsSnapshot {
            total: Decimal::from_str("100").unwrap(),
            weekly: Decimal::from_str("7.5").unwrap(),
            monthly: Decimal::ZERO,
        };
        assert_eq!(
            render_earnings(EarningsKind::Total, &earnings, "P"),
            "Total Earnings: P100.00"
        );
        assert_eq!(
            render_earnings(EarningsKind::Weekly, &earnings, "P"),
            "Weekly Earnings: P7.50"
        );
        assert_eq!(
            render_earnings(EarningsKind::Monthly, &earnings, "$"),
            "Monthly Earnings: $0.00"
        );
    }

    #[test]
    fn test_report_is_json() {
        let earnings = EarningsSnapshot {
            total: Decimal::from(100),
            ..EarningsSnapshot::default()
        };
        let json = render_report(&cells(&[true, false]), &earnings, "P").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["occupied"], 1);
        assert_eq!(value["free"], 1);
        assert_eq!(value["slots"][0]["label"], "A1");
        assert_eq!(value["slots"][0]["occupied"], true);
        assert_eq!(value["earnings"]["total"], "100.00");
        assert_eq!(value["earnings"]["weekly"], "0.00");
    }
}
