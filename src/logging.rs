use std::env;

use log::{LevelFilter, Metadata, Record};

const LOG_ENV_VAR: &str = "CHMVIEW_LOG";

struct StderrLogger;

impl log::Log for StderrLogger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record) {
		if self.enabled(record.metadata()) {
			eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
		}
	}

	fn flush(&self) {}
}

/// Installs the stderr logger. Calling it twice leaves the first logger in place.
pub fn init() {
	static LOGGER: StderrLogger = StderrLogger;
	let _ = log::set_logger(&LOGGER);
	log::set_max_level(level_from_env(env::var(LOG_ENV_VAR).ok().as_deref()));
}

fn level_from_env(value: Option<&str>) -> LevelFilter {
	match value.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
		Some("error") => LevelFilter::Error,
		Some("warn") => LevelFilter::Warn,
		Some("debug") => LevelFilter::Debug,
		Some("trace") => LevelFilter::Trace,
		Some("off") => LevelFilter::Off,
		_ => LevelFilter::Info,
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(None, LevelFilter::Info)]
	#[case(Some("debug"), LevelFilter::Debug)]
	#[case(Some(" WARN "), LevelFilter::Warn)]
	#[case(Some("off"), LevelFilter::Off)]
	#[case(Some("verbose"), LevelFilter::Info)]
	fn test_level_from_env(#[case] value: Option<&str>, #[case] expected: LevelFilter) {
		assert_eq!(level_from_env(value), expected);
	}
}
