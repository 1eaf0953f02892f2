use clap::ArgMatches;

use super::Context;
use crate::cli::utils::get_path;
use crate::common::defs::SiteAction;
use crate::common::dry_run::Dataflow;
use crate::common::error::VarflowError;
use crate::tools::bcftools::{tabix_index_path, BcfTools, SubsetConfig};

fn subset(m: &ArgMatches, ctx: &Context) -> Result<Dataflow, VarflowError> {
	let vcf = get_path(m, "vcf").ok_or_else(|| VarflowError::missing("vcf"))?;
	let outprefix = m.get_one::<String>("outprefix").ok_or_else(|| VarflowError::missing("outprefix"))?;
	let mut cfg = SubsetConfig::new(outprefix)
		.action(m.get_one::<SiteAction>("action").copied().unwrap_or_default())
		.threads(m.get_one::<usize>("threads").copied().unwrap_or(1))
		.create_index(m.get_flag("create_index"));
	if let Some(bed) = get_path(m, "bed") { cfg = cfg.bed(bed) }
	if let Some(region) = m.get_one::<String>("region") { cfg = cfg.region(region) }
	if let Some(dir) = get_path(m, "outdir") { cfg = cfg.outdir(dir) }
	if let Some(filters) = m.get_one::<String>("apply_filters") { cfg = cfg.apply_filters(filters) }
	
	let bcf = BcfTools::new(&vcf, ctx.config.bcftools_folder.as_deref(), ctx.config.tabix_folder.as_deref())?
		.with_runner(ctx.runner());
	let out = bcf.subset_vcf(&cfg)?;
	let mut df = ctx.dataflow("subset");
	df.add_path("out_vcf", &out);
	if m.get_flag("create_index") { df.add_path("out_tbi", &tabix_index_path(&out)); }
	Ok(df)
}

pub fn subset_command(m: &ArgMatches, ctx: &Context) -> Result<(), String> {
	let df = subset(m, ctx).map_err(|e| format!("{}", e))?;
	ctx.emit(&df)
}
