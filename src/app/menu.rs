use crate::app::render::{self, EarningsKind};
use crate::core::lot::ParkingLot;
use crate::core::{Clock, Storage};
use crate::utils::error::LotError;
use std::io::{self, BufRead, Write};

const MENU: &str = "\n1. Park Vehicle\n2. Exit Vehicle\n3. Display Parking Lot Map\n4. Display Total Earnings\n5. Display Weekly Earnings\n6. Display Monthly Earnings\n0. Exit\n";

/// Reads one line as typed, minus its terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> io::Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;
    read_line(input)
}

/// Asks until a positive slot count is entered. `None` if input ends first.
pub fn prompt_slot_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<usize>> {
    loop {
        let Some(answer) = prompt(input, output, "Enter the number of parking slots: ")? else {
            return Ok(None);
        };
        match answer.trim().parse::<usize>() {
            Ok(n) if n > 0 => return Ok(Some(n)),
            _ => writeln!(output, "Please enter a whole number greater than zero.")?,
        }
    }
}

fn report_failure<W: Write>(output: &mut W, err: &LotError) -> io::Result<()> {
    tracing::debug!("operation rejected: {}", err);
    writeln!(output, "{}", err.user_friendly_message())
}

fn report_unsaved<W: Write>(output: &mut W, failure: &Option<LotError>) -> io::Result<()> {
    if let Some(err) = failure {
        writeln!(output, "Warning: {}", err.user_friendly_message())?;
        writeln!(output, "{}", err.recovery_suggestion())?;
    }
    Ok(())
}

/// Runs the interactive menu until `0` or end of input.
pub fn run_menu<S, K, R, W>(lot: &mut ParkingLot<S, K>, mut input: R, mut output: W) -> io::Result<()>
where
    S: Storage,
    K: Clock,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Welcome to the Parking Lot System!")?;

    loop {
        write!(output, "{}", MENU)?;
        let Some(option) = prompt(&mut input, &mut output, "\nChoose an option: ")? else {
            writeln!(output)?;
            return Ok(());
        };

        match option.as_str() {
            "1" => {
                let Some(plate) = prompt(&mut input, &mut output, "Enter vehicle license plate: ")? else {
                    return Ok(());
                };
                let Some(label) = prompt(
                    &mut input,
                    &mut output,
                    "Enter parking slot label (e.g., A1, B2, etc.): ",
                )?
                else {
                    return Ok(());
                };
                match lot.park(&plate, &label) {
                    Ok(committed) => {
                        write!(output, "{}", render::render_park_receipt(&committed.snapshot))?;
                        report_unsaved(&mut output, &committed.persistence_failure)?;
                    }
                    Err(e) => report_failure(&mut output, &e)?,
                }
            }
            "2" => {
                let Some(label) =
                    prompt(&mut input, &mut output, "Enter parking slot label to exit vehicle: ")?
                else {
                    return Ok(());
                };
                match lot.exit(&label) {
                    Ok(committed) => {
                        write!(
                            output,
                            "{}",
                            render::render_exit_receipt(&committed.snapshot, lot.currency_symbol())
                        )?;
                        report_unsaved(&mut output, &committed.persistence_failure)?;
                    }
                    Err(e) => report_failure(&mut output, &e)?,
                }
            }
            "3" => write!(output, "{}", render::render_map(&lot.map_snapshot()))?,
            "4" | "5" | "6" => {
                let kind = match option.as_str() {
                    "4" => EarningsKind::Total,
                    "5" => EarningsKind::Weekly,
                    _ => EarningsKind::Monthly,
                };
                writeln!(
                    output,
                    "{}",
                    render::render_earnings(kind, &lot.earnings(), lot.currency_symbol())
                )?;
            }
            "0" => {
                writeln!(output, "Exiting the system...")?;
                return Ok(());
            }
            _ => writeln!(output, "Invalid option! Please try again.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LotSettings;
    use crate::domain::clock::ManualClock;
    use crate::utils::error::Result;
    use chrono::Local;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.files.lock().unwrap().get(path).cloned())
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn run(script: &str, slots: usize) -> String {
        let clock = ManualClock::new(Local::now());
        let mut lot =
            ParkingLot::open(&LotSettings::new(slots), MockStorage::default(), &clock).unwrap();
        let mut output = Vec::new();
        run_menu(&mut lot, Cursor::new(script.to_string()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_park_and_show_map() {
        let output = run("1\nXYZ123\nA2\n3\n0\n", 3);
        assert!(output.contains("| Vehicle License Plate| XYZ123              |"));
        assert!(output.contains("| A1 [O] | A2 [X] | A3 [O] |"));
        assert!(output.ends_with("Exiting the system...\n"));
    }

    #[test]
    fn test_invalid_option_reprompts() {
        let output = run("9\nabc\n4\n0\n", 2);
        assert_eq!(output.matches("Invalid option! Please try again.").count(), 2);
        assert!(output.contains("Total Earnings: P0.00"));
    }

    #[test]
    fn test_failures_are_reported_and_loop_continues() {
        let output = run("1\nAAA111\nZ9\n2\nA1\n1\nB\nA1\n1\nC\nA1\n5\n0\n", 2);
        assert!(output.contains("Invalid slot."));
        assert!(output.contains("Slot is empty or invalid slot number."));
        assert!(output.contains("Slot A1 is already occupied."));
        assert!(output.contains("Weekly Earnings: P0.00"));
    }

    #[test]
    fn test_exit_shows_receipt() {
        let output = run("1\nXYZ123\nA1\n2\nA1\n6\n0\n", 1);
        assert!(output.contains("| Parking Fee          | P0.00               |"));
        assert!(output.contains("Monthly Earnings: P0.00"));
    }

    #[test]
    fn test_labels_and_plates_are_taken_as_typed() {
        let output = run("1\n PAD01 \n A1\n1\r\n PAD01 \r\nA1\r\n3\n0\n", 1);
        assert!(output.contains("Invalid slot."));
        assert!(output.contains("| Vehicle License Plate|  PAD01              |"));
        assert!(output.contains("| A1 [X] |"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let output = run("3\n", 1);
        assert!(output.contains("| A1 [O] |"));
        assert!(!output.contains("Exiting the system..."));
    }

    #[test]
    fn test_prompt_slot_count_retries() {
        let mut input = Cursor::new("zero\n0\n-4\n 15 \r\n");
        let mut output = Vec::new();
        let slots = prompt_slot_count(&mut input, &mut output).unwrap();
        assert_eq!(slots, Some(15));
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text.matches("Please enter a whole number greater than zero.")
                .count(),
            3
        );
    }

    #[test]
    fn test_prompt_slot_count_end_of_input() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(prompt_slot_count(&mut input, &mut output).unwrap(), None);
    }
}
