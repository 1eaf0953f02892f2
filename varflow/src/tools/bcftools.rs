// Filtering and subsetting of VCF files with bcftools
// https://samtools.github.io/bcftools/bcftools.html

use std::path::{Path, PathBuf};

use crate::common::check_file_exists;
use crate::common::command::Invocation;
use crate::common::defs::{SiteAction, TypeAction, Uncalled, VariantType};
use crate::common::error::VarflowError;
use crate::common::naming::{TypeFilterName, VcfName};
use crate::common::pipeline::{Pipeline, Runner};
use crate::config::get_exec_path;

/// Options for `BcfTools::subset_vcf`
#[derive(Debug, Clone)]
pub struct SubsetConfig {
	outprefix: String,
	bed: Option<PathBuf>,
	region: Option<String>,
	outdir: Option<PathBuf>,
	create_index: bool,
	action: SiteAction,
	apply_filters: Option<String>,
	threads: usize,
}

impl SubsetConfig {
	pub fn new(outprefix: &str) -> Self {
		SubsetConfig{outprefix: outprefix.to_owned(), bed: None, region: None, outdir: None, create_index: false,
			action: SiteAction::Exclude, apply_filters: None, threads: 1}
	}
	// BED file with the coordinates to exclude/include
	pub fn bed<P: AsRef<Path>>(mut self, bed: P) -> Self { self.bed = Some(bed.as_ref().to_owned()); self }
	// Region such as chr1 or chr1:1000-1500.  Also changes the output name.
	pub fn region(mut self, region: &str) -> Self { self.region = Some(region.to_owned()); self }
	pub fn outdir<P: AsRef<Path>>(mut self, dir: P) -> Self { self.outdir = Some(dir.as_ref().to_owned()); self }
	pub fn create_index(mut self, flag: bool) -> Self { self.create_index = flag; self }
	pub fn action(mut self, action: SiteAction) -> Self { self.action = action; self }
	// FILTER values to keep, e.g. "PASS,."
	pub fn apply_filters(mut self, filters: &str) -> Self { self.apply_filters = Some(filters.to_owned()); self }
	// Output compression threads in addition to the main thread
	pub fn threads(mut self, threads: usize) -> Self { self.threads = threads; self }
	
	/// Validate and return the output path
	pub fn output_path(&self) -> Result<PathBuf, VarflowError> {
		if self.outprefix.is_empty() { return Err(VarflowError::missing("outprefix")) }
		let name = match &self.region {
			Some(region) => VcfName::parse(&self.outprefix)?.with_region(region).filtered(self.apply_filters.is_some()).to_path(),
			None => PathBuf::from(&self.outprefix),
		};
		Ok(match &self.outdir {
			Some(dir) => dir.join(name),
			None => name,
		})
	}
}

/// Options for `BcfTools::filter_by_variant_type`
#[derive(Debug, Clone)]
pub struct TypeFilterConfig {
	outprefix: String,
	v_type: VariantType,
	compress: Option<bool>,
	biallelic: bool,
	action: TypeAction,
}

impl TypeFilterConfig {
	pub fn new(outprefix: &str) -> Self {
		TypeFilterConfig{outprefix: outprefix.to_owned(), v_type: VariantType::Snps, compress: Some(true), biallelic: false, action: TypeAction::Select}
	}
	pub fn v_type(mut self, v_type: VariantType) -> Self { self.v_type = v_type; self }
	// Compression must be chosen explicitly: None is rejected by output_path()
	pub fn compress(mut self, compress: Option<bool>) -> Self { self.compress = compress; self }
	pub fn biallelic(mut self, flag: bool) -> Self { self.biallelic = flag; self }
	pub fn action(mut self, action: TypeAction) -> Self { self.action = action; self }
	
	pub fn output_path(&self) -> Result<PathBuf, VarflowError> {
		if self.outprefix.is_empty() { return Err(VarflowError::missing("outprefix")) }
		let compress = self.compress.ok_or_else(|| VarflowError::missing("compress"))?;
		Ok(TypeFilterName::new(&self.outprefix, self.v_type, self.action, self.biallelic, compress).to_path())
	}
}

/// Options for `BcfTools::select_variants`
#[derive(Debug, Clone)]
pub struct SelectConfig {
	outprefix: String,
	uncalled: Option<Uncalled>,
	threads: usize,
}

impl SelectConfig {
	pub fn new(outprefix: &str) -> Self { SelectConfig{outprefix: outprefix.to_owned(), uncalled: None, threads: 1} }
	pub fn uncalled(mut self, uncalled: Option<Uncalled>) -> Self { self.uncalled = uncalled; self }
	pub fn threads(mut self, threads: usize) -> Self { self.threads = threads; self }
	
	pub fn output_path(&self) -> Result<PathBuf, VarflowError> {
		if self.outprefix.is_empty() { return Err(VarflowError::missing("outprefix")) }
		Ok(PathBuf::from(format!("{}.onlyvariants.vcf.gz", self.outprefix)))
	}
}

// `x.vcf.gz` -> `x.vcf.gz.tbi`
pub fn tabix_index_path(vcf_gz: &Path) -> PathBuf {
	let mut s = vcf_gz.as_os_str().to_owned();
	s.push(".tbi");
	PathBuf::from(s)
}

pub struct BcfTools {
	vcf: PathBuf,
	bcftools_folder: Option<PathBuf>,
	tabix_folder: Option<PathBuf>,
	runner: Runner,
}

impl BcfTools {
	pub fn new<P: AsRef<Path>>(vcf: P, bcftools_folder: Option<&Path>, tabix_folder: Option<&Path>) -> Result<Self, VarflowError> {
		check_file_exists("VCF", vcf.as_ref())?;
		Ok(BcfTools{vcf: vcf.as_ref().to_owned(), bcftools_folder: bcftools_folder.map(|p| p.to_owned()), 
			tabix_folder: tabix_folder.map(|p| p.to_owned()), runner: Runner::default()})
	}
	pub fn with_runner(mut self, runner: Runner) -> Self {
		self.runner = runner;
		self
	}
	pub fn vcf(&self) -> &Path { &self.vcf }
	
	fn bcftools(&self, sub: &str) -> Invocation {
		let mut inv = Invocation::new(get_exec_path(self.bcftools_folder.as_deref(), "bcftools"));
		inv.sub(sub);
		inv
	}
	fn input(&self) -> String { self.vcf.to_string_lossy().to_string() }
	
	pub fn make_subset_pipeline(&self, cfg: &SubsetConfig) -> Result<(Pipeline, PathBuf), VarflowError> {
		let outfile = cfg.output_path()?;
		let mut inv = self.bcftools("view");
		if let Some(bed) = &cfg.bed {
			if cfg.region.is_some() { warn!("Both a BED file and a region were given: sites are taken from {}", bed.display()) }
			match cfg.action {
				SiteAction::Exclude => inv.arg("-T", format!("^{}", bed.display())),
				SiteAction::Include => inv.arg("-T", bed.display()),
			};
		} else if let Some(region) = &cfg.region {
			match cfg.action {
				SiteAction::Exclude => inv.arg("-t", format!("^{}", region)),
				SiteAction::Include => inv.arg("-r", region),
			};
		}
		inv.arg("-o", outfile.display()).arg("-O", "z").arg("--threads", cfg.threads);
		if let Some(filters) = &cfg.apply_filters { inv.arg("-f", filters); }
		inv.param(self.input());
		Ok((Pipeline::new(inv), outfile))
	}
	
	/// Subset the VCF using a BED file or region with the coordinates of the
	/// variants to exclude/include.  Returns the path of the gzipped output VCF.
	pub fn subset_vcf(&self, cfg: &SubsetConfig) -> Result<PathBuf, VarflowError> {
		let (pipeline, outfile) = self.make_subset_pipeline(cfg)?;
		self.runner.checkoutput(&pipeline)?;
		if cfg.create_index { self.tabix_index(&outfile)?; }
		Ok(outfile)
	}
	
	pub fn make_tabix_pipeline(&self, vcf_gz: &Path) -> (Pipeline, PathBuf) {
		let mut inv = Invocation::new(get_exec_path(self.tabix_folder.as_deref(), "tabix"));
		inv.arg("-p", "vcf").param(vcf_gz.to_string_lossy());
		(Pipeline::new(inv), tabix_index_path(vcf_gz))
	}
	
	/// Tabix index for a bgzipped VCF
	pub fn tabix_index(&self, vcf_gz: &Path) -> Result<PathBuf, VarflowError> {
		let (pipeline, index) = self.make_tabix_pipeline(vcf_gz);
		self.runner.checkoutput(&pipeline)?;
		Ok(index)
	}
	
	pub fn make_filter_pipeline(&self, name: &str, expression: &str) -> Result<(Pipeline, PathBuf), VarflowError> {
		if name.is_empty() { return Err(VarflowError::missing("name")) }
		if expression.is_empty() { return Err(VarflowError::missing("expression")) }
		let outfile = PathBuf::from(format!("{}.filtered.vcf.gz", self.vcf.display()));
		let mut inv = self.bcftools("filter");
		inv.arg("-s", name).arg("-e", expression).arg("-o", outfile.display()).arg("-O", "z").param(self.input());
		Ok((Pipeline::new(inv), outfile))
	}
	
	/// Run bcftools filter, annotating the FILTER column with `name` for sites where
	/// `expression` (e.g. `INFO/DP>24304 | MQ<34`) is true
	pub fn filter(&self, name: &str, expression: &str) -> Result<PathBuf, VarflowError> {
		let (pipeline, outfile) = self.make_filter_pipeline(name, expression)?;
		self.runner.checkoutput(&pipeline)?;
		Ok(outfile)
	}
	
	pub fn make_variant_type_pipeline(&self, cfg: &TypeFilterConfig) -> Result<(Pipeline, PathBuf), VarflowError> {
		let outfile = cfg.output_path()?;
		let mut inv = self.bcftools("view");
		if let Some(t) = cfg.v_type.type_token() {
			match cfg.action {
				TypeAction::Select => inv.arg("-v", t),
				TypeAction::Exclude => inv.arg("-V", t),
			};
		}
		let otype = if cfg.compress == Some(true) { "z" } else { "v" };
		inv.arg("-o", outfile.display()).arg("-O", otype);
		if cfg.biallelic { inv.param("-m2").param("-M2"); }
		inv.param(self.input());
		Ok((Pipeline::new(inv), outfile))
	}
	
	/// Extract (or remove) one variant type, e.g. only the SNPs
	pub fn filter_by_variant_type(&self, cfg: &TypeFilterConfig) -> Result<PathBuf, VarflowError> {
		let (pipeline, outfile) = self.make_variant_type_pipeline(cfg)?;
		self.runner.checkoutput(&pipeline)?;
		Ok(outfile)
	}
	
	pub fn make_select_pipeline(&self, cfg: &SelectConfig) -> Result<(Pipeline, PathBuf), VarflowError> {
		let outfile = cfg.output_path()?;
		let mut inv = self.bcftools("view");
		inv.arg("-o", outfile.display()).arg("-O", "z").arg("--threads", cfg.threads);
		if let Some(u) = cfg.uncalled { inv.param(u.flag()); }
		inv.param(self.input());
		Ok((Pipeline::new(inv), outfile))
	}
	
	/// Keep only the variant sites (drop sites where all genotypes are 0|0)
	pub fn select_variants(&self, cfg: &SelectConfig) -> Result<PathBuf, VarflowError> {
		let (pipeline, outfile) = self.make_select_pipeline(cfg)?;
		self.runner.checkoutput(&pipeline)?;
		Ok(outfile)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn setup() -> (tempfile::TempDir, BcfTools) {
		let dir = tempfile::tempdir().unwrap();
		let vcf = dir.path().join("in.vcf.gz");
		fs::write(&vcf, b"").unwrap();
		let bcf = BcfTools::new(&vcf, Some(Path::new("/opt/bcftools")), Some(Path::new("/opt/htslib"))).unwrap();
		(dir, bcf)
	}

	#[test]
	fn missing_vcf() {
		match BcfTools::new("/nonexistent/in.vcf.gz", None, None) {
			Err(VarflowError::MissingFile{kind, ..}) => assert_eq!(kind, "VCF"),
			_ => panic!("Expected MissingFile"),
		}
	}

	#[test]
	fn subset_by_region() {
		let (_dir, bcf) = setup();
		let input = bcf.vcf().display().to_string();
		let cfg = SubsetConfig::new("sample.vcf.gz").region("chr1");
		let (p, out) = bcf.make_subset_pipeline(&cfg).unwrap();
		assert_eq!(out, PathBuf::from("sample_chr1.vcf.gz"));
		assert_eq!(p.command_line(), format!("/opt/bcftools/bcftools view -t ^chr1 -o sample_chr1.vcf.gz -O z --threads 1 {}", input));
		
		let cfg = SubsetConfig::new("sample.vcf.gz").region("chr1").action(SiteAction::Include).apply_filters("PASS,.").outdir("/out").threads(4);
		let (p, out) = bcf.make_subset_pipeline(&cfg).unwrap();
		assert_eq!(out, PathBuf::from("/out/sample_chr1.filt.vcf.gz"));
		assert_eq!(p.command_line(), format!("/opt/bcftools/bcftools view -r chr1 -o /out/sample_chr1.filt.vcf.gz -O z --threads 4 -f PASS,. {}", input));
	}

	#[test]
	fn subset_bed_takes_precedence() {
		let (_dir, bcf) = setup();
		let cfg = SubsetConfig::new("sample.vcf.gz").bed("mask.bed").region("chr2");
		let (p, out) = bcf.make_subset_pipeline(&cfg).unwrap();
		// region still names the output
		assert_eq!(out, PathBuf::from("sample_chr2.vcf.gz"));
		let argv = p.stages()[0].argv();
		assert_eq!(&argv[..3], &["view", "-T", "^mask.bed"]);
		assert!(!argv.contains(&"-t") && !argv.contains(&"-r"));
		
		let cfg = SubsetConfig::new("kept.vcf.gz").bed("mask.bed").action(SiteAction::Include);
		let (p, out) = bcf.make_subset_pipeline(&cfg).unwrap();
		assert_eq!(out, PathBuf::from("kept.vcf.gz"));
		assert_eq!(&p.stages()[0].argv()[..3], &["view", "-T", "mask.bed"]);
	}

	#[test]
	fn subset_region_needs_vcf_segment() {
		let (_dir, bcf) = setup();
		let cfg = SubsetConfig::new("sample.bcf").region("chr1");
		assert!(bcf.make_subset_pipeline(&cfg).unwrap_err().is_precondition());
	}

	#[test]
	fn filter_command() {
		let (_dir, bcf) = setup();
		let (p, out) = bcf.make_filter_pipeline("LowQual", "INFO/DP>24304 | MQ<34").unwrap();
		assert_eq!(out, PathBuf::from(format!("{}.filtered.vcf.gz", bcf.vcf().display())));
		let argv = p.stages()[0].argv();
		assert_eq!(&argv[..5], &["filter", "-s", "LowQual", "-e", "INFO/DP>24304 | MQ<34"]);
		assert!(bcf.make_filter_pipeline("", "QUAL<10").is_err());
		assert!(bcf.make_filter_pipeline("x", "").is_err());
	}

	#[test]
	fn variant_type_commands() {
		let (_dir, bcf) = setup();
		let input = bcf.vcf().display().to_string();
		let cfg = TypeFilterConfig::new("out/test").biallelic(true);
		let (p, out) = bcf.make_variant_type_pipeline(&cfg).unwrap();
		assert_eq!(out, PathBuf::from("out/test.snps.biallelic.vcf.gz"));
		assert_eq!(p.command_line(), format!("/opt/bcftools/bcftools view -v snps -o out/test.snps.biallelic.vcf.gz -O z -m2 -M2 {}", input));
		
		let cfg = TypeFilterConfig::new("out/test").v_type(VariantType::Indels).action(TypeAction::Exclude).compress(Some(false));
		let (p, out) = bcf.make_variant_type_pipeline(&cfg).unwrap();
		assert_eq!(out, PathBuf::from("out/test.noindels.vcf"));
		assert_eq!(p.command_line(), format!("/opt/bcftools/bcftools view -V indels -o out/test.noindels.vcf -O v {}", input));
		
		let cfg = TypeFilterConfig::new("out/test").v_type(VariantType::Both);
		let (p, _) = bcf.make_variant_type_pipeline(&cfg).unwrap();
		assert_eq!(&p.stages()[0].argv()[..2], &["view", "-o"]);
	}

	#[test]
	fn compress_must_be_chosen() {
		let dir = tempfile::tempdir().unwrap();
		let vcf = dir.path().join("in.vcf.gz");
		fs::write(&vcf, b"").unwrap();
		let prefix = dir.path().join("test").display().to_string();
		// Would fail loudly if it tried to run: bcftools lives nowhere
		let bcf = BcfTools::new(&vcf, Some(Path::new("/nonexistent")), None).unwrap();
		let cfg = TypeFilterConfig::new(&prefix).compress(None);
		match bcf.filter_by_variant_type(&cfg) {
			Err(VarflowError::MissingParameter{name}) => assert_eq!(name, "compress"),
			x => panic!("Unexpected result {:?}", x),
		}
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
	}

	#[test]
	fn select_variants_suffix() {
		let (_dir, bcf) = setup();
		let input = bcf.vcf().display().to_string();
		for prefix in &["a", "dir/b.vcf", "c.onlyvariants"] {
			let (_, out) = bcf.make_select_pipeline(&SelectConfig::new(prefix)).unwrap();
			assert_eq!(out, PathBuf::from(format!("{}.onlyvariants.vcf.gz", prefix)));
		}
		let cfg = SelectConfig::new("s").uncalled(Some(Uncalled::Exclude)).threads(2);
		let (p, _) = bcf.make_select_pipeline(&cfg).unwrap();
		assert_eq!(p.command_line(), format!("/opt/bcftools/bcftools view -o s.onlyvariants.vcf.gz -O z --threads 2 -U {}", input));
	}

	#[test]
	fn tabix_command() {
		let (_dir, bcf) = setup();
		let (p, idx) = bcf.make_tabix_pipeline(Path::new("x.vcf.gz"));
		assert_eq!(p.command_line(), "/opt/htslib/tabix -p vcf x.vcf.gz");
		assert_eq!(idx, PathBuf::from("x.vcf.gz.tbi"));
	}
}
