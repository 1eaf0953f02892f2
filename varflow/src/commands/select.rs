use clap::ArgMatches;

use super::Context;
use crate::cli::utils::get_path;
use crate::common::defs::Uncalled;
use crate::common::dry_run::Dataflow;
use crate::common::error::VarflowError;
use crate::tools::bcftools::{BcfTools, SelectConfig};

fn select(m: &ArgMatches, ctx: &Context) -> Result<Dataflow, VarflowError> {
	let vcf = get_path(m, "vcf").ok_or_else(|| VarflowError::missing("vcf"))?;
	let outprefix = m.get_one::<String>("outprefix").ok_or_else(|| VarflowError::missing("outprefix"))?;
	let cfg = SelectConfig::new(outprefix)
		.uncalled(m.get_one::<Uncalled>("uncalled").copied())
		.threads(m.get_one::<usize>("threads").copied().unwrap_or(1));
	let bcf = BcfTools::new(&vcf, ctx.config.bcftools_folder.as_deref(), None)?.with_runner(ctx.runner());
	let out = bcf.select_variants(&cfg)?;
	let mut df = ctx.dataflow("select-variants");
	df.add_path("out_vcf", &out);
	Ok(df)
}

pub fn select_command(m: &ArgMatches, ctx: &Context) -> Result<(), String> {
	let df = select(m, ctx).map_err(|e| format!("{}", e))?;
	ctx.emit(&df)
}
