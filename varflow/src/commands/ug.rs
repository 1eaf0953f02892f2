use clap::ArgMatches;

use super::Context;
use crate::cli::utils::get_path;
use crate::common::defs::{GenotypingMode, Glm};
use crate::common::dry_run::Dataflow;
use crate::common::error::VarflowError;
use crate::tools::gatk::{Gatk, UgConfig};

fn ug(m: &ArgMatches, ctx: &Context) -> Result<Dataflow, VarflowError> {
	let bam = get_path(m, "bam").ok_or_else(|| VarflowError::missing("bam"))?;
	let reference = get_path(m, "reference").ok_or_else(|| VarflowError::missing("reference"))?;
	let outprefix = m.get_one::<String>("outprefix").ok_or_else(|| VarflowError::missing("outprefix"))?;
	let gatk_folder = ctx.config.gatk_folder.as_deref().ok_or_else(|| VarflowError::missing("gatk_folder"))?;
	
	let mut cfg = UgConfig::new(outprefix)
		.glm(m.get_one::<Glm>("glm").copied().unwrap_or_default())
		.nt(m.get_one::<usize>("nt").copied().unwrap_or(1))
		.compress(!m.get_flag("no_compress"));
	if let Some(x) = m.get_one::<String>("intervals") { cfg = cfg.intervals(x) }
	if let Some(x) = get_path(m, "alleles") { cfg = cfg.alleles(x) }
	if let Some(x) = m.get_one::<GenotypingMode>("genotyping_mode") { cfg = cfg.genotyping_mode(*x) }
	if let Some(v) = m.get_many::<(String, String)>("gatk_arg") {
		for (key, val) in v { cfg = cfg.extra_arg(key, val) }
	}
	
	let gatk = Gatk::new(&bam, &reference, gatk_folder, ctx.config.bgzip_folder.as_deref())?
		.with_java(ctx.config.java_path())
		.with_runner(ctx.runner());
	let out = gatk.run_ug(&cfg)?;
	let mut df = ctx.dataflow("ug");
	df.add_path("out_vcf", &out);
	Ok(df)
}

pub fn ug_command(m: &ArgMatches, ctx: &Context) -> Result<(), String> {
	let df = ug(m, ctx).map_err(|e| format!("{}", e))?;
	ctx.emit(&df)
}
