use chrono::{Local, TimeDelta};
use parking_lot_system::app::render::{render_earnings, render_map, EarningsKind};
use parking_lot_system::{LocalStorage, LotError, LotSettings, ManualClock, ParkingLot};
use rust_decimal::Decimal;
use tempfile::TempDir;

fn local_storage(dir: &TempDir) -> LocalStorage {
    LocalStorage::new(dir.path().to_str().unwrap().to_string())
}

#[test]
fn test_end_to_end_park_and_exit() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Local::now());
    let mut lot = ParkingLot::open(&LotSettings::new(3), local_storage(&temp_dir), &clock).unwrap();

    let labels: Vec<&str> = lot.registry().slots().iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["A1", "A2", "A3"]);

    let parked = lot.park("XYZ123", "A2").unwrap();
    assert!(parked.is_durable());

    let map = lot.map_snapshot();
    assert_eq!(map.is_occupied("A1"), Some(false));
    assert_eq!(map.is_occupied("A2"), Some(true));
    assert_eq!(map.is_occupied("A3"), Some(false));
    assert_eq!(
        render_map(&map),
        "\nParking Lot Map:\n| A1 [O] | A2 [X] | A3 [O] |\n"
    );

    clock.advance(TimeDelta::hours(2));
    let exited = lot.exit("A2").unwrap();
    assert!(exited.is_durable());
    assert_eq!(exited.snapshot.license_plate, "XYZ123");
    assert_eq!(exited.snapshot.duration_hours, Decimal::from(2));
    assert_eq!(exited.snapshot.fee, Decimal::from(100));

    let earnings = lot.earnings();
    assert_eq!(earnings.total, Decimal::from(100));
    assert_eq!(earnings.weekly, Decimal::from(100));
    assert_eq!(earnings.monthly, Decimal::from(100));
    assert_eq!(
        render_earnings(EarningsKind::Total, &earnings, lot.currency_symbol()),
        "Total Earnings: P100.00"
    );
    assert_eq!(lot.map_snapshot().occupied_count(), 0);

    let saved_total = std::fs::read_to_string(temp_dir.path().join("TotalEarnings.txt")).unwrap();
    assert_eq!(saved_total, "100.00");
    let saved_slots =
        std::fs::read_to_string(temp_dir.path().join("ParkingLotData.txt")).unwrap();
    assert_eq!(
        saved_slots,
        "A1,False,null,null\nA2,False,null,null\nA3,False,null,null\n"
    );
}

#[test]
fn test_unknown_slot_leaves_earnings_at_zero() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Local::now());
    let mut lot = ParkingLot::open(&LotSettings::new(3), local_storage(&temp_dir), &clock).unwrap();

    let err = lot.park("AAA111", "Z9").unwrap_err();
    assert!(matches!(err, LotError::SlotNotFound { ref label } if label == "Z9"));
    assert_eq!(lot.map_snapshot().occupied_count(), 0);

    let earnings = lot.earnings();
    assert_eq!(
        render_earnings(EarningsKind::Total, &earnings, "P"),
        "Total Earnings: P0.00"
    );
    assert_eq!(
        render_earnings(EarningsKind::Weekly, &earnings, "P"),
        "Weekly Earnings: P0.00"
    );
    assert_eq!(
        render_earnings(EarningsKind::Monthly, &earnings, "P"),
        "Monthly Earnings: P0.00"
    );
    assert!(!temp_dir.path().join("TotalEarnings.txt").exists());
}

#[test]
fn test_only_successful_exits_move_the_ledger() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Local::now());
    let mut lot = ParkingLot::open(&LotSettings::new(12), local_storage(&temp_dir), &clock).unwrap();

    lot.park("CAR001", "A1").unwrap();
    lot.park("CAR002", "B2").unwrap();
    assert!(matches!(
        lot.park("CAR003", "B2").unwrap_err(),
        LotError::SlotOccupied { .. }
    ));
    assert!(matches!(
        lot.exit("B1").unwrap_err(),
        LotError::SlotNotFoundOrEmpty { .. }
    ));
    assert_eq!(lot.earnings().total, Decimal::ZERO);

    clock.advance(TimeDelta::minutes(30));
    let first = lot.exit("A1").unwrap().snapshot.fee;
    clock.advance(TimeDelta::minutes(30));
    let second = lot.exit("B2").unwrap().snapshot.fee;

    assert_eq!(first, Decimal::from(25));
    assert_eq!(second, Decimal::from(50));
    assert_eq!(lot.earnings().total, Decimal::from(75));
    assert_eq!(lot.earnings().weekly, lot.earnings().total);
    assert_eq!(lot.earnings().monthly, lot.earnings().total);
    assert!(matches!(
        lot.exit("B2").unwrap_err(),
        LotError::SlotNotFoundOrEmpty { .. }
    ));
    assert_eq!(lot.earnings().total, Decimal::from(75));
}

#[test]
fn test_custom_rate_and_currency() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Local::now());
    let settings = LotSettings {
        hourly_rate: Decimal::from(20),
        currency_symbol: "$".to_string(),
        ..LotSettings::new(1)
    };
    let mut lot = ParkingLot::open(&settings, local_storage(&temp_dir), &clock).unwrap();

    lot.park("RATE01", "A1").unwrap();
    clock.advance(TimeDelta::minutes(90));
    let receipt = lot.exit("A1").unwrap().snapshot;
    assert_eq!(receipt.fee, Decimal::from(30));
    assert_eq!(
        render_earnings(EarningsKind::Total, &lot.earnings(), lot.currency_symbol()),
        "Total Earnings: $30.00"
    );
}

#[test]
fn test_oversized_rate_rejects_exit_without_panicking() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Local::now());
    let settings = LotSettings {
        hourly_rate: Decimal::MAX,
        ..LotSettings::new(1)
    };
    let mut lot = ParkingLot::open(&settings, local_storage(&temp_dir), &clock).unwrap();

    lot.park("BIG001", "A1").unwrap();
    clock.advance(TimeDelta::hours(2));
    assert!(matches!(
        lot.exit("A1").unwrap_err(),
        LotError::AmountOverflow { .. }
    ));
    assert_eq!(lot.map_snapshot().is_occupied("A1"), Some(true));
    assert_eq!(lot.earnings().total, Decimal::ZERO);
    assert!(!temp_dir.path().join("TotalEarnings.txt").exists());
}
