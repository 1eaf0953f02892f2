use clap::ArgMatches;

use super::Context;
use crate::classifier::{Classifier, TrainConfig};
use crate::cli::utils::get_path;
use crate::common::dry_run::Dataflow;
use crate::common::error::VarflowError;

fn train(m: &ArgMatches, ctx: &Context) -> Result<Dataflow, VarflowError> {
	let tp = get_path(m, "tp").ok_or_else(|| VarflowError::missing("tp"))?;
	let fp = get_path(m, "fp").ok_or_else(|| VarflowError::missing("fp"))?;
	let outprefix = m.get_one::<String>("outprefix").ok_or_else(|| VarflowError::missing("outprefix"))?;
	let mut cfg = TrainConfig::new(outprefix);
	if let Some(x) = m.get_one::<f64>("test_size") { cfg = cfg.test_size(*x) }
	if let Some(x) = m.get_one::<u64>("seed") { cfg = cfg.seed(*x) }
	if let Some(x) = m.get_one::<f64>("c") { cfg = cfg.c(*x) }
	if let Some(x) = m.get_one::<usize>("max_iter") { cfg = cfg.max_iter(*x) }
	
	let mut df = ctx.dataflow("train");
	// No external programs involved, so a dry run only reports where the model would go
	if ctx.is_dry_run() {
		df.add_path("fitted_model", &cfg.model_path()?);
		return Ok(df)
	}
	let mut classifier = Classifier::new();
	let model = classifier.train(&tp, &fp, &cfg)?;
	df.add_path("fitted_model", &model);
	if let Some(score) = classifier.score { df.add("score", score); }
	Ok(df)
}

pub fn train_command(m: &ArgMatches, ctx: &Context) -> Result<(), String> {
	let df = train(m, ctx).map_err(|e| format!("{}", e))?;
	ctx.emit(&df)
}
