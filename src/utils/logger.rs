use chrono::Local;
use eyre::{Result, WrapErr};
use fern::Dispatch;
use log::LevelFilter;

/// Sets up the process-wide logger, writing to stdout.
///
/// # Returns
/// * `Result<()>` - Success or failure of logger setup
///
/// # Errors
/// * If a logger was already installed
pub fn setup_logger() -> Result<()> {
    Dispatch::new()
        .level(level_from(std::env::var("RUST_LOG").ok().as_deref()))
        .chain(std::io::stdout())
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ));
        })
        .apply()
        .wrap_err("failed to install logger")?;
    Ok(())
}

/// Parses a `RUST_LOG` value, falling back to Info when it is missing or not a level name.
fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from() {
        assert_eq!(level_from(None), LevelFilter::Info);
        assert_eq!(level_from(Some("debug")), LevelFilter::Debug);
        assert_eq!(level_from(Some("WARN")), LevelFilter::Warn);
        assert_eq!(level_from(Some("arbloop=trace")), LevelFilter::Info);
    }
}
