// Tool location configuration
//
// Read from an optional JSON file, then overridden from the command line.
// Every entry is optional: a program with no configured folder is looked up on PATH.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::error::VarflowError;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub bcftools_folder: Option<PathBuf>,
	pub tabix_folder: Option<PathBuf>,
	pub gatk_folder: Option<PathBuf>,
	pub bgzip_folder: Option<PathBuf>,
	pub snptools_folder: Option<PathBuf>,
	pub java: Option<PathBuf>,
}

pub const CONFIG_KEYS: &[&str] = &["bcftools_folder", "tabix_folder", "gatk_folder", "bgzip_folder", "snptools_folder", "java"];

impl Config {
	pub fn new() -> Self { Config::default() }
	
	pub fn from_file(path: &Path) -> Result<Self, VarflowError> {
		let file = fs::File::open(path).map_err(|e| VarflowError::Config{path: path.display().to_string(), desc: format!("{}", e)})?;
		let cfg: Config = serde_json::from_reader(BufReader::new(file))
			.map_err(|e| VarflowError::Config{path: path.display().to_string(), desc: format!("{}", e)})?;
		trace!("Configuration read from {}: {:?}", path.display(), cfg);
		Ok(cfg)
	}
	
	pub fn set(&mut self, name: &str, val: PathBuf) -> Result<(), VarflowError> {
		debug!("Setting {} to {}", name, val.display());
		let slot = match name {
			"bcftools_folder" => &mut self.bcftools_folder,
			"tabix_folder" => &mut self.tabix_folder,
			"gatk_folder" => &mut self.gatk_folder,
			"bgzip_folder" => &mut self.bgzip_folder,
			"snptools_folder" => &mut self.snptools_folder,
			"java" => &mut self.java,
			_ => return Err(VarflowError::invalid("configuration key", name, CONFIG_KEYS)),
		};
		*slot = Some(val);
		Ok(())
	}

	pub fn java_path(&self) -> PathBuf {
		match &self.java {
			Some(j) => j.clone(),
			None => get_exec_path(None, "java"),
		}
	}
}

/// Location of executable `name`: inside `folder` if given, otherwise the first match on PATH,
/// otherwise the bare name (so that a launch error names the missing program).
pub fn get_exec_path(folder: Option<&Path>, name: &str) -> PathBuf {
	match folder {
		Some(f) => f.join(name),
		None => utils::find_exec_path(name).unwrap_or_else(|| {
			debug!("{} not found on PATH", name);
			PathBuf::from(name)
		}),
	}
}
