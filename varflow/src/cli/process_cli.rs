use std::{fs, io, path::PathBuf, str::FromStr};

use clap::ArgMatches;
use clap_complete::{generate, Shell};
use utils::log_level::{init_log, LogLevel};

use super::cli_model::cli_model;
use super::utils::get_config;
use crate::commands::{self, Context};

fn generate_completions(m: &ArgMatches) -> Result<(), String> {
	let gen = *m.get_one::<Shell>("shell").ok_or("Missing shell")?;
	let mut cmd = cli_model();
	match m.get_one::<PathBuf>("output") {
		Some(ofile) => {
			eprintln!("Generating completion file for {}...", gen);
			let mut file = fs::File::create(ofile).map_err(|e| format!("Couldn't create shell completion file {}: {}", ofile.display(), e))?;
			generate(gen, &mut cmd, "varflow", &mut file);
		},
		None => generate(gen, &mut cmd, "varflow", &mut io::stdout()),
	}
	Ok(())
}

// poprob --verbose asks for at least debug level logging
fn min_log_level(m: &ArgMatches) -> Option<LogLevel> {
	match m.subcommand() {
		Some(("poprob", m_sub)) if m_sub.get_flag("verbose") => LogLevel::from_str("debug").ok(),
		_ => None,
	}
}

pub fn process_cli() -> Result<(), String> {
	let m = cli_model().get_matches();
	// Interpret global command line flags and set up logging
	init_log(&m, min_log_level(&m))?;
	if let Some(("completions", m_sub)) = m.subcommand() { return generate_completions(m_sub) }
	
	let config = get_config(&m)?;
	let ctx = Context::new(config, m.get_flag("dry_run"), m.get_one::<PathBuf>("json").cloned());
	if ctx.is_dry_run() { debug!("Dry run: commands will be printed, not executed") }
	
	// Now handle subcommands
	match m.subcommand() {
		Some(("subset", m_sub)) => commands::subset::subset_command(m_sub, &ctx),
		Some(("filter", m_sub)) => commands::filter::filter_command(m_sub, &ctx),
		Some(("filter-type", m_sub)) => commands::filter_type::filter_type_command(m_sub, &ctx),
		Some(("select-variants", m_sub)) => commands::select::select_command(m_sub, &ctx),
		Some(("ug", m_sub)) => commands::ug::ug_command(m_sub, &ctx),
		Some(("poprob", m_sub)) => commands::poprob::poprob_command(m_sub, &ctx),
		Some(("train", m_sub)) => commands::train::train_command(m_sub, &ctx),
		_ => Err("Unknown or missing subcommand".to_string()),
	}
}
