use anyhow::Context;
use clap::Parser;
use parking_lot_system::app::{menu, render};
use parking_lot_system::utils::error::ErrorSeverity;
use parking_lot_system::utils::{logger, validation::Validate};
use parking_lot_system::{CliConfig, LocalStorage, LotError, ParkingLot, SystemClock, TomlConfig};

fn exit_with(e: &LotError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置
    let file = match &cli.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            config
                .validate()
                .with_context(|| format!("invalid config file '{}'", path))?;
            Some(config)
        }
        None => None,
    };

    // 初始化日誌
    let filter = file.as_ref().and_then(|f| f.logging.filter.as_deref());
    if cli.log_json {
        logger::init_json_logger(cli.verbose, filter);
    } else {
        logger::init_cli_logger(cli.verbose, filter);
    }
    tracing::info!("Starting parking lot console");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = cli
        .resolve(file.as_ref(), || {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            menu::prompt_slot_count(&mut stdin.lock(), &mut stdout)?.ok_or_else(|| {
                LotError::ConfigError {
                    message: "no slot count was entered".to_string(),
                }
            })
        })
        .unwrap_or_else(|e| exit_with(&e));

    let storage = LocalStorage::new(settings.data_dir.clone());
    let mut lot =
        ParkingLot::open(&settings, storage, SystemClock).unwrap_or_else(|e| exit_with(&e));

    let skipped = lot.load_report().skipped.len();
    if skipped > 0 {
        eprintln!(
            "⚠️  Skipped {} unreadable record(s) in {}",
            skipped, settings.store_names.slot_file
        );
    }

    if cli.report {
        let report = render::render_report(
            &lot.map_snapshot(),
            &lot.earnings(),
            lot.currency_symbol(),
        )?;
        println!("{}", report);
        return Ok(());
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    menu::run_menu(&mut lot, stdin.lock(), stdout.lock()).context("console I/O failed")?;

    tracing::info!("Parking lot console closed");
    Ok(())
}
