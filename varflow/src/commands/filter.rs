use clap::ArgMatches;

use super::Context;
use crate::cli::utils::get_path;
use crate::common::dry_run::Dataflow;
use crate::common::error::VarflowError;
use crate::tools::BcfTools;

fn filter(m: &ArgMatches, ctx: &Context) -> Result<Dataflow, VarflowError> {
	let vcf = get_path(m, "vcf").ok_or_else(|| VarflowError::missing("vcf"))?;
	let name = m.get_one::<String>("name").ok_or_else(|| VarflowError::missing("name"))?;
	let expression = m.get_one::<String>("expression").ok_or_else(|| VarflowError::missing("expression"))?;
	let bcf = BcfTools::new(&vcf, ctx.config.bcftools_folder.as_deref(), None)?.with_runner(ctx.runner());
	let out = bcf.filter(name, expression)?;
	let mut df = ctx.dataflow("filter");
	df.add_path("out_vcf", &out);
	Ok(df)
}

pub fn filter_command(m: &ArgMatches, ctx: &Context) -> Result<(), String> {
	let df = filter(m, ctx).map_err(|e| format!("{}", e))?;
	ctx.emit(&df)
}
