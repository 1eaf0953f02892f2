use std::fmt;
use std::str::FromStr;

use clap::ArgMatches;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLevel {
	pub level: usize,
}

impl FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel{level: 0}),
            "warn" => Ok(LogLevel{level: 1}),
            "info" => Ok(LogLevel{level: 2}),
            "debug" => Ok(LogLevel{level: 3}),
            "trace" => Ok(LogLevel{level: 4}),
            "none" => Ok(LogLevel{level: 5}),
            _ => Err("no match"),
        }
    }
}

impl LogLevel {
	pub fn is_none(&self) -> bool {
		self.level > 4 
	}
	pub fn get_level(&self) -> usize {
		if self.level > 4 { 0 } else { self.level }
	}
	// Raise the level to at least `min` (unless logging is switched off)
	pub fn at_least(self, min: LogLevel) -> LogLevel {
		if self.is_none() || self.level >= min.level { self } else { min }
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let level_str = ["error", "warn", "info", "debug", "trace", "none" ];
		if self.level < 6 { write!(f, "{}", level_str[self.level]) }
		else { write!(f, "unknown") }
	}
}

/// Set up stderrlog from the `loglevel`, `quiet` and `timestamp` arguments.
/// `min_level` lets a subcommand ask for more detail than the global setting.
pub fn init_log(m: &ArgMatches, min_level: Option<LogLevel>) -> Result<(LogLevel, bool), String> {
	let mut verbose = m.get_one::<LogLevel>("loglevel").copied().unwrap_or(LogLevel{level: 2});
	if let Some(min) = min_level { verbose = verbose.at_least(min) }
	let quiet = verbose.is_none() || m.get_flag("quiet");
	let ts = match m.get_one::<String>("timestamp") {
		Some(v) => stderrlog::Timestamp::from_str(v).map_err(|_| format!("invalid value for 'timestamp': {}", v))?,
		None => stderrlog::Timestamp::Off,
	};
    stderrlog::new()
        .quiet(quiet)
        .verbosity(verbose.get_level())
        .timestamp(ts)
        .init()
        .map_err(|e| format!("Couldn't initialize logging: {}", e))?;
	Ok((verbose, quiet))
}
