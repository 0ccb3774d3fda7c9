use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "parking_lot_system=warn";
const VERBOSE_FILTER: &str = "parking_lot_system=debug,info";

fn build_filter(verbose: bool, configured: Option<&str>) -> EnvFilter {
    let fallback = match configured {
        Some(filter) if !filter.trim().is_empty() => filter.to_string(),
        _ if verbose => VERBOSE_FILTER.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

// Logs go to stderr; stdout belongs to the menu.
pub fn init_cli_logger(verbose: bool, configured: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, configured))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, configured: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, configured))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
