use std::path::Path;

use clap::ArgMatches;

use super::Context;
use crate::cli::utils::get_path;
use crate::common::dry_run::Dataflow;
use crate::common::error::VarflowError;
use crate::tools::snptools::{PoprobConfig, SnpTools};

// Only the final component of the prefix is used; the output goes to the work directory
fn prefix_name(outprefix: &Path) -> Result<String, VarflowError> {
	outprefix.file_name().map(|s| s.to_string_lossy().to_string())
		.ok_or_else(|| VarflowError::BadOutputPrefix{prefix: outprefix.display().to_string(), desc: "no file name".to_string()})
}

fn poprob(m: &ArgMatches, ctx: &Context) -> Result<Dataflow, VarflowError> {
	let vcf = get_path(m, "vcf_file").ok_or_else(|| VarflowError::missing("vcf_file"))?;
	let outprefix = get_path(m, "outprefix").ok_or_else(|| VarflowError::missing("outprefix"))?;
	let rawlist = get_path(m, "rawlist").ok_or_else(|| VarflowError::missing("rawlist"))?;
	let work_dir = get_path(m, "work_dir").ok_or_else(|| VarflowError::missing("work_dir"))?;
	let folder = get_path(m, "snptools_folder").or_else(|| ctx.config.snptools_folder.clone());
	
	let cfg = PoprobConfig::new(&prefix_name(&outprefix)?, &rawlist, &work_dir);
	let snp = SnpTools::new(&vcf, folder.as_deref())?.with_runner(ctx.runner());
	let prob_f = snp.run_poprob(&cfg)?;
	debug!("Work is done!");
	let mut df = ctx.dataflow("poprob");
	df.add_path("prob_f", &prob_f);
	Ok(df)
}

pub fn poprob_command(m: &ArgMatches, ctx: &Context) -> Result<(), String> {
	let df = poprob(m, ctx).map_err(|e| format!("{}", e))?;
	ctx.emit(&df)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefix_directory_dropped() {
		assert_eq!(prefix_name(Path::new("/data/run1/chr20")).unwrap(), "chr20");
		assert_eq!(prefix_name(Path::new("chr20")).unwrap(), "chr20");
		assert!(prefix_name(Path::new("/")).is_err());
	}
}
