use colored::{Colorize, CustomColor};

pub const CANOPY_GREEN: CustomColor = CustomColor {
    r: 34,
    g: 139,
    b: 34,
};

const TAG: &str = "risk-dashboard";

pub fn print_err(err_message: &str) {
    eprintln!(
        "[{}] {}: {}",
        TAG.custom_color(CANOPY_GREEN),
        "error".red().bold(),
        err_message
    );
}

#[macro_export]
macro_rules! print_err {
    ($($arg:tt)*) => {
        $crate::logging::print_err(&format!($($arg)*));
    };
}

pub fn print_warn(warn_message: &str) {
    println!(
        "[{}] {}: {}",
        TAG.custom_color(CANOPY_GREEN),
        "warning".yellow().bold(),
        warn_message
    );
}

#[macro_export]
macro_rules! print_warn {
    ($($arg:tt)*) => {
        $crate::logging::print_warn(&format!($($arg)*));
    };
}

pub fn print_info(info_message: &str) {
    println!(
        "[{}] {}: {}",
        TAG.custom_color(CANOPY_GREEN),
        "info".cyan().bold(),
        info_message
    );
}

#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {
        $crate::logging::print_info(&format!($($arg)*));
    };
}

pub fn print_success(success_message: &str) {
    println!(
        "[{}] {}: {}",
        TAG.custom_color(CANOPY_GREEN),
        "success".green().bold(),
        success_message
    );
}

#[macro_export]
macro_rules! print_success {
    ($($arg:tt)*) => {
        $crate::logging::print_success(&format!($($arg)*));
    };
}

/// Installs the process-wide tracing subscriber.
///
/// `level` takes an `EnvFilter` directive such as `debug` or
/// `risk_dashboard=debug,tower=warn`; without it `RUST_LOG` applies, falling
/// back to `info`. Records emitted through the `log` facade are forwarded.
/// Output goes to stderr; stdout is reserved for command results.
pub fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
