use clap::ArgMatches;

use super::Context;
use crate::cli::utils::get_path;
use crate::common::defs::{TypeAction, VariantType};
use crate::common::dry_run::Dataflow;
use crate::common::error::VarflowError;
use crate::tools::bcftools::{BcfTools, TypeFilterConfig};

fn filter_type(m: &ArgMatches, ctx: &Context) -> Result<Dataflow, VarflowError> {
	let vcf = get_path(m, "vcf").ok_or_else(|| VarflowError::missing("vcf"))?;
	let outprefix = m.get_one::<String>("outprefix").ok_or_else(|| VarflowError::missing("outprefix"))?;
	let v_type = m.get_one::<VariantType>("v_type").copied().unwrap_or(VariantType::Snps);
	let action = m.get_one::<TypeAction>("action").copied().unwrap_or(TypeAction::Select);
	let cfg = TypeFilterConfig::new(outprefix)
		.v_type(v_type)
		.action(action)
		.biallelic(m.get_flag("biallelic"))
		.compress(Some(!m.get_flag("no_compress")));
	let bcf = BcfTools::new(&vcf, ctx.config.bcftools_folder.as_deref(), None)?.with_runner(ctx.runner());
	let out = bcf.filter_by_variant_type(&cfg)?;
	let mut df = ctx.dataflow("filter-type");
	df.add_path("out_vcf", &out);
	Ok(df)
}

pub fn filter_type_command(m: &ArgMatches, ctx: &Context) -> Result<(), String> {
	let df = filter_type(m, ctx).map_err(|e| format!("{}", e))?;
	ctx.emit(&df)
}
