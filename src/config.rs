//! Logging setup

use tracing::log::LevelFilter;

/// Dependencies that only get loud under `--debug`.
const NOISY_MODULES: [&str; 7] = [
    "tracing",
    "rustls",
    "hyper_util",
    "h2",
    "reqwest",
    "sqlx",
    "sea_orm",
];

/// Per-module levels. `--debug` turns this crate up to `Debug` while the
/// dependencies stay at `Info`; otherwise the dependencies only warn.
fn module_levels(debug: bool) -> Vec<(&'static str, LevelFilter)> {
    let (ours, theirs) = if debug {
        (LevelFilter::Debug, LevelFilter::Info)
    } else {
        (LevelFilter::Info, LevelFilter::Warn)
    };
    std::iter::once((env!("CARGO_CRATE_NAME"), ours))
        .chain(NOISY_MODULES.iter().map(|module| (*module, theirs)))
        .collect()
}

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let logger = module_levels(debug).into_iter().fold(
        simple_logger::SimpleLogger::new().with_level(LevelFilter::Info),
        |logger, (module, level)| logger.with_module_level(module, level),
    );
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}
