// GATK variant calling (UnifiedGenotyper)

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::check_file_exists;
use crate::common::command::Invocation;
use crate::common::defs::{GenotypingMode, Glm};
use crate::common::error::VarflowError;
use crate::common::pipeline::{Pipeline, ProcessOutput, Runner};
use crate::config::get_exec_path;

pub const GATK_JAR: &str = "GenomeAnalysisTK.jar";

/// Options for `Gatk::run_ug`
#[derive(Debug, Clone)]
pub struct UgConfig {
	outprefix: String,
	glm: Glm,
	compress: bool,
	nt: usize,
	intervals: Option<String>,
	alleles: Option<PathBuf>,
	genotyping_mode: Option<GenotypingMode>,
	extra: Vec<(String, String)>,
}

impl UgConfig {
	pub fn new(outprefix: &str) -> Self {
		UgConfig{outprefix: outprefix.to_owned(), glm: Glm::Snp, compress: true, nt: 1, intervals: None, 
			alleles: None, genotyping_mode: None, extra: Vec::new()}
	}
	pub fn glm(mut self, glm: Glm) -> Self { self.glm = glm; self }
	pub fn compress(mut self, flag: bool) -> Self { self.compress = flag; self }
	// Number of data threads
	pub fn nt(mut self, nt: usize) -> Self { self.nt = nt; self }
	// Interval file or coordinates (chr1:100-200)
	pub fn intervals(mut self, intervals: &str) -> Self { self.intervals = Some(intervals.to_owned()); self }
	// VCF with the alleles to genotype in GENOTYPE_GIVEN_ALLELES mode
	pub fn alleles<P: AsRef<Path>>(mut self, alleles: P) -> Self { self.alleles = Some(alleles.as_ref().to_owned()); self }
	pub fn genotyping_mode(mut self, mode: GenotypingMode) -> Self { self.genotyping_mode = Some(mode); self }
	// Any other UnifiedGenotyper option, passed as --<key> <value>
	pub fn extra_arg(mut self, key: &str, value: &str) -> Self {
		self.extra.push((key.trim_start_matches('-').to_owned(), value.to_owned()));
		self
	}
	
	pub fn output_path(&self) -> Result<PathBuf, VarflowError> {
		if self.outprefix.is_empty() { return Err(VarflowError::missing("outprefix")) }
		if self.nt == 0 { return Err(VarflowError::invalid("nt", 0, &["a positive number of threads"])) }
		if self.genotyping_mode == Some(GenotypingMode::GenotypeGivenAlleles) && self.alleles.is_none() {
			return Err(VarflowError::missing("alleles"))
		}
		if let Some((k, _)) = self.extra.iter().find(|(k, _)| k.is_empty()) {
			return Err(VarflowError::invalid("extra argument", k, &["--<key> <value>"]))
		}
		let ext = if self.compress { "vcf.gz" } else { "vcf" };
		Ok(PathBuf::from(format!("{}.{}", self.outprefix, ext)))
	}
}

pub struct Gatk {
	bam: PathBuf,
	reference: PathBuf,
	gatk_folder: PathBuf,
	bgzip_folder: Option<PathBuf>,
	java: PathBuf,
	runner: Runner,
}

impl Gatk {
	pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(bam: P, reference: Q, gatk_folder: &Path, bgzip_folder: Option<&Path>) -> Result<Self, VarflowError> {
		check_file_exists("BAM", bam.as_ref())?;
		check_file_exists("Reference", reference.as_ref())?;
		Ok(Gatk{bam: bam.as_ref().to_owned(), reference: reference.as_ref().to_owned(), gatk_folder: gatk_folder.to_owned(),
			bgzip_folder: bgzip_folder.map(|p| p.to_owned()), java: PathBuf::from("java"), runner: Runner::default()})
	}
	pub fn with_java<P: AsRef<Path>>(mut self, java: P) -> Self {
		self.java = java.as_ref().to_owned();
		self
	}
	pub fn with_runner(mut self, runner: Runner) -> Self {
		self.runner = runner;
		self
	}
	
	pub fn make_ug_pipeline(&self, cfg: &UgConfig) -> Result<(Pipeline, PathBuf), VarflowError> {
		let outfile = cfg.output_path()?;
		let mut inv = Invocation::new(&self.java);
		inv.sub("-jar").sub(self.gatk_folder.join(GATK_JAR).to_string_lossy());
		inv.arg("-T", "UnifiedGenotyper")
			.arg("-R", self.reference.display())
			.arg("-I", self.bam.display())
			.arg("-glm", cfg.glm)
			.arg("-nt", cfg.nt);
		if let Some(x) = &cfg.intervals { inv.arg("--intervals", x); }
		if let Some(x) = &cfg.alleles { inv.arg("--alleles", x.display()); }
		if let Some(x) = cfg.genotyping_mode { inv.arg("--genotyping_mode", x); }
		for (k, v) in cfg.extra.iter() { inv.arg(format!("--{}", k), v); }
		let pipeline = if cfg.compress {
			let mut bgzip = Invocation::new(get_exec_path(self.bgzip_folder.as_deref(), "bgzip"));
			bgzip.sub("-c");
			let mut p = Pipeline::new(inv);
			p.pipe_to(bgzip).out_filepath(&outfile);
			p
		} else {
			inv.arg("-o", outfile.display());
			Pipeline::new(inv)
		};
		Ok((pipeline, outfile))
	}
	
	/// Run GATK UnifiedGenotyper, returning the path to the output VCF
	pub fn run_ug(&self, cfg: &UgConfig) -> Result<PathBuf, VarflowError> {
		let (pipeline, outfile) = self.make_ug_pipeline(cfg)?;
		let output = self.runner.run(&pipeline)?;
		check_gatk_output("GATK UnifiedGenotyper", &output)?;
		Ok(outfile)
	}
}

// GATK reports most failures as a `##### ERROR` banner on stderr
pub fn has_error_banner(stderr: &str) -> bool {
	lazy_static! { static ref RE: Regex = Regex::new(r"^#* ERROR").unwrap(); }
	stderr.lines().any(|l| RE.is_match(l))
}

pub fn check_gatk_output(tool: &str, output: &ProcessOutput) -> Result<(), VarflowError> {
	if has_error_banner(&output.stderr) {
		error!("Something went wrong while running {}", tool);
		return Err(VarflowError::ToolError{tool: tool.to_owned(), stderr: output.stderr.clone()})
	}
	if let Some((com, st)) = output.failed_stage() {
		return Err(VarflowError::ProcessFailed{command: com.to_owned(), status: format!("{}", st)})
	}
	Ok(())
}
