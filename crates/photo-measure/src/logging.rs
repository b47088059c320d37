//! Log setup for the `photo-measure` binary.
//!
//! The engine emits `log` records at every stage boundary. `-v` raises the
//! level for the measurement crates only; dependencies stay at `warn`.
//! `RUST_LOG`, when set, replaces the generated directives.

use log::LevelFilter;

/// Log targets whose level follows the `-v` count.
pub const MEASURE_TARGETS: [&str; 2] = ["photo_measure_core", "photo_measure"];

/// Level for the measurement crates at a given `-v` count.
pub fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `RUST_LOG`-style directives for a `-v` count, e.g.
/// `warn,photo_measure_core=debug,photo_measure=debug`.
pub fn log_directives(verbose: u8) -> String {
    let level = verbosity_level(verbose).to_string().to_ascii_lowercase();
    MEASURE_TARGETS
        .iter()
        .fold(String::from("warn"), |mut dirs, target| {
            dirs.push(',');
            dirs.push_str(target);
            dirs.push('=');
            dirs.push_str(&level);
            dirs
        })
}

/// Install `env_logger` on stderr. Later calls are ignored.
#[cfg(feature = "cli")]
pub fn init_logging(verbose: u8) {
    let env = env_logger::Env::default().default_filter_or(log_directives(verbose));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

/// Install a `tracing` fmt subscriber on stderr; its `log` bridge forwards
/// the engine's records. Later calls are ignored.
#[cfg(feature = "tracing")]
pub fn init_tracing(verbose: u8, json: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(verbose)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
