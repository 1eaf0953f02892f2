// One module per subcommand.  Each command builds its typed options from the
// command line, runs the operation and emits a dataflow record with the outputs.

use std::path::{Path, PathBuf};

use crate::common::dry_run::Dataflow;
use crate::common::pipeline::Runner;
use crate::config::Config;

pub mod filter;
pub mod filter_type;
pub mod poprob;
pub mod select;
pub mod subset;
pub mod train;
pub mod ug;

/// Settings shared by all subcommands
#[derive(Debug, Clone)]
pub struct Context {
	pub config: Config,
	runner: Runner,
	json: Option<PathBuf>,
}

impl Context {
	pub fn new(config: Config, dry_run: bool, json: Option<PathBuf>) -> Self {
		let runner = if dry_run { Runner::dry_run() } else { Runner::default() };
		Context{config, runner, json}
	}
	pub fn runner(&self) -> Runner { self.runner.clone() }
	pub fn is_dry_run(&self) -> bool { self.runner.is_dry_run() }
	pub fn json_file(&self) -> Option<&Path> { self.json.as_deref() }
	
	pub fn dataflow(&self, command: &str) -> Dataflow {
		Dataflow::new(command, self.is_dry_run())
	}
	pub fn emit(&self, df: &Dataflow) -> Result<(), String> {
		df.emit(self.json_file())
	}
}
