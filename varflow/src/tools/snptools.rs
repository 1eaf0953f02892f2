// SNPTools genotype probability estimation

use std::path::{Path, PathBuf};

use crate::common::check_file_exists;
use crate::common::command::Invocation;
use crate::common::error::VarflowError;
use crate::common::pipeline::{Pipeline, Runner};
use crate::config::get_exec_path;

#[derive(Debug, Clone)]
pub struct PoprobConfig {
	outprefix: String,
	rawlist: PathBuf,
	outdir: PathBuf,
}

impl PoprobConfig {
	/// `rawlist` is the list of `.raw` files produced by SNPTools bamodel
	pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(outprefix: &str, rawlist: P, outdir: Q) -> Self {
		PoprobConfig{outprefix: outprefix.to_owned(), rawlist: rawlist.as_ref().to_owned(), outdir: outdir.as_ref().to_owned()}
	}
	
	pub fn output_path(&self) -> Result<PathBuf, VarflowError> {
		if self.outprefix.is_empty() { return Err(VarflowError::missing("outprefix")) }
		Ok(self.outdir.join(format!("{}.prob", self.outprefix)))
	}
}

pub struct SnpTools {
	vcf: PathBuf,
	snptools_folder: Option<PathBuf>,
	runner: Runner,
}

impl SnpTools {
	pub fn new<P: AsRef<Path>>(vcf: P, snptools_folder: Option<&Path>) -> Result<Self, VarflowError> {
		check_file_exists("VCF", vcf.as_ref())?;
		Ok(SnpTools{vcf: vcf.as_ref().to_owned(), snptools_folder: snptools_folder.map(|p| p.to_owned()), runner: Runner::default()})
	}
	pub fn with_runner(mut self, runner: Runner) -> Self {
		self.runner = runner;
		self
	}
	
	pub fn make_poprob_pipeline(&self, cfg: &PoprobConfig) -> Result<(Pipeline, PathBuf), VarflowError> {
		let outfile = cfg.output_path()?;
		let mut inv = Invocation::new(get_exec_path(self.snptools_folder.as_deref(), "poprob"));
		inv.param(self.vcf.to_string_lossy())
			.param(cfg.rawlist.to_string_lossy())
			.param(outfile.to_string_lossy());
		Ok((Pipeline::new(inv), outfile))
	}
	
	/// Run poprob on a VCF with biallelic SNPs.  Returns the path of the `.prob` file.
	pub fn run_poprob(&self, cfg: &PoprobConfig) -> Result<PathBuf, VarflowError> {
		let (pipeline, outfile) = self.make_poprob_pipeline(cfg)?;
		self.runner.checkoutput(&pipeline)?;
		debug!("poprob output written to {}", outfile.display());
		Ok(outfile)
	}
}
