use std::path::PathBuf;

use clap::ArgMatches;

use crate::config::{Config, CONFIG_KEYS};

/// Parse `KEY=VALUE` (leading dashes on KEY are dropped)
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
	let (k, v) = s.split_once('=').ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
	let k = k.trim_start_matches('-');
	if k.is_empty() { Err(format!("invalid KEY=VALUE: empty key in '{}'", s)) }
	else { Ok((k.to_owned(), v.to_owned())) }
}

/// Tool locations from the config file (if any) with command line overrides applied
pub fn get_config(m: &ArgMatches) -> Result<Config, String> {
	let mut config = match m.get_one::<PathBuf>("config") {
		Some(f) => Config::from_file(f).map_err(|e| format!("{}", e))?,
		None => Config::new(),
	};
	for key in CONFIG_KEYS.iter() {
		if let Ok(Some(p)) = m.try_get_one::<PathBuf>(key) {
			config.set(key, p.clone()).map_err(|e| format!("{}", e))?;
		}
	}
	Ok(config)
}

pub fn get_path(m: &ArgMatches, opt: &str) -> Option<PathBuf> {
	m.get_one::<PathBuf>(opt).cloned()
}
