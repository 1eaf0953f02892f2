// Drive the wrappers end to end with small shell scripts standing in for the real tools

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use varflow::common::defs::{SiteAction, TypeAction, VariantType};
use varflow::common::pipeline::Runner;
use varflow::tools::bcftools::{SelectConfig, SubsetConfig, TypeFilterConfig};
use varflow::tools::gatk::UgConfig;
use varflow::tools::snptools::PoprobConfig;
use varflow::tools::{BcfTools, Gatk, SnpTools};
use varflow::VarflowError;

// Records its arguments in calls.log and creates the file given with -o
const FAKE_BCFTOOLS: &str = r###"#!/bin/sh
echo "bcftools $*" >> "$(dirname "$0")/calls.log"
out=""
while [ $# -gt 0 ]; do
	if [ "$1" = "-o" ]; then out="$2"; fi
	shift
done
[ -n "$out" ] && echo "##fileformat=VCFv4.2" > "$out"
exit 0
"###;

const FAKE_TABIX: &str = r#"#!/bin/sh
echo "tabix $*" >> "$(dirname "$0")/calls.log"
for a in "$@"; do last="$a"; done
: > "$last.tbi"
"#;

const FAKE_POPROB: &str = r#"#!/bin/sh
echo "poprob $*" >> "$(dirname "$0")/calls.log"
echo "prob" > "$3"
"#;

const FAKE_JAVA: &str = r###"#!/bin/sh
echo "java $*" >> "$(dirname "$0")/calls.log"
echo "##fileformat=VCFv4.2"
"###;

const FAKE_BGZIP: &str = r#"#!/bin/sh
cat
"#;

const FAILING_TOOL: &str = "#!/bin/sh\necho 'something broke' >&2\nexit 3\n";

const JAVA_WITH_ERROR_BANNER: &str = r######"#!/bin/sh
echo "INFO  12:00:00,000 HelpFormatter - ---------" >&2
echo "##### ERROR MESSAGE: Invalid command line: Argument nt has a bad value" >&2
exit 0
"######;

fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, content).unwrap();
	fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
	path
}

struct Setup {
	dir: tempfile::TempDir,
	bin: PathBuf,
	vcf: PathBuf,
}

impl Setup {
	fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		let bin = dir.path().join("bin");
		fs::create_dir(&bin).unwrap();
		write_script(&bin, "bcftools", FAKE_BCFTOOLS);
		write_script(&bin, "tabix", FAKE_TABIX);
		write_script(&bin, "poprob", FAKE_POPROB);
		write_script(&bin, "java", FAKE_JAVA);
		write_script(&bin, "bgzip", FAKE_BGZIP);
		let vcf = dir.path().join("sample.vcf.gz");
		fs::write(&vcf, b"").unwrap();
		Setup{dir, bin, vcf}
	}
	fn bcftools(&self) -> BcfTools {
		BcfTools::new(&self.vcf, Some(&self.bin), Some(&self.bin)).unwrap()
	}
	fn calls(&self) -> Vec<String> {
		fs::read_to_string(self.bin.join("calls.log")).unwrap_or_default().lines().map(|s| s.to_owned()).collect()
	}
	fn out(&self, name: &str) -> String {
		self.dir.path().join(name).to_string_lossy().to_string()
	}
}

#[test]
fn subset_by_region_with_index() {
	let s = Setup::new();
	let cfg = SubsetConfig::new(&s.out("sample.vcf.gz")).region("chr1").apply_filters("PASS,.").create_index(true);
	let out = s.bcftools().subset_vcf(&cfg).unwrap();
	assert_eq!(out, s.dir.path().join("sample_chr1.filt.vcf.gz"));
	assert!(out.is_file());
	assert!(s.dir.path().join("sample_chr1.filt.vcf.gz.tbi").is_file());
	let calls = s.calls();
	assert_eq!(calls.len(), 2);
	assert!(calls[0].starts_with("bcftools view -t ^chr1 -o "));
	assert!(calls[0].contains("-O z --threads 1 -f PASS,."));
	assert!(calls[1].starts_with("tabix -p vcf "));
}

#[test]
fn subset_include_bed() {
	let s = Setup::new();
	let bed = s.dir.path().join("regions.bed");
	fs::write(&bed, "chr1\t0\t1000\n").unwrap();
	let cfg = SubsetConfig::new("subset.vcf.gz").outdir(s.dir.path()).bed(&bed).action(SiteAction::Include);
	let out = s.bcftools().subset_vcf(&cfg).unwrap();
	assert_eq!(out, s.dir.path().join("subset.vcf.gz"));
	assert!(s.calls()[0].starts_with(&format!("bcftools view -T {} -o", bed.display())));
}

#[test]
fn variant_type_outputs() {
	let s = Setup::new();
	let bcf = s.bcftools();
	let prefix = s.out("test");
	let out = bcf.filter_by_variant_type(&TypeFilterConfig::new(&prefix)).unwrap();
	assert_eq!(out, PathBuf::from(format!("{}.snps.vcf.gz", prefix)));
	let out = bcf.filter_by_variant_type(&TypeFilterConfig::new(&prefix).biallelic(true).compress(Some(false))).unwrap();
	assert_eq!(out, PathBuf::from(format!("{}.snps.biallelic.vcf", prefix)));
	assert!(out.is_file());
	let out = bcf.filter_by_variant_type(&TypeFilterConfig::new(&prefix).v_type(VariantType::Indels).action(TypeAction::Exclude)).unwrap();
	assert_eq!(out, PathBuf::from(format!("{}.noindels.vcf.gz", prefix)));
	let calls = s.calls();
	assert!(calls[1].contains("-O v -m2 -M2"));
	assert!(calls[2].starts_with("bcftools view -V indels"));
}

#[test]
fn invalid_options_spawn_nothing() {
	let s = Setup::new();
	let bcf = s.bcftools();
	let e = bcf.filter_by_variant_type(&TypeFilterConfig::new(&s.out("t")).compress(None)).unwrap_err();
	assert!(e.is_precondition());
	let e = bcf.subset_vcf(&SubsetConfig::new(&s.out("novcfhere")).region("chr2")).unwrap_err();
	assert!(matches!(e, VarflowError::BadOutputPrefix{..}));
	assert!(s.calls().is_empty());
}

#[test]
fn filter_and_select() {
	let s = Setup::new();
	let bcf = s.bcftools();
	let out = bcf.filter("LowQual", "QUAL<20 || INFO/DP>100").unwrap();
	assert_eq!(out, s.dir.path().join("sample.vcf.gz.filtered.vcf.gz"));
	let out = bcf.select_variants(&SelectConfig::new(&s.out("calls")).threads(2)).unwrap();
	assert_eq!(out, s.dir.path().join("calls.onlyvariants.vcf.gz"));
	let calls = s.calls();
	// The expression reaches bcftools as a single argument
	assert!(calls[0].starts_with("bcftools filter -s LowQual -e QUAL<20 || INFO/DP>100 -o"));
	assert!(calls[1].contains("--threads 2"));
}

#[test]
fn failing_tool_reported() {
	let s = Setup::new();
	let bad = s.dir.path().join("badbin");
	fs::create_dir(&bad).unwrap();
	write_script(&bad, "bcftools", FAILING_TOOL);
	let bcf = BcfTools::new(&s.vcf, Some(&bad), None).unwrap();
	match bcf.select_variants(&SelectConfig::new(&s.out("x"))) {
		Err(VarflowError::ProcessFailed{command, status}) => {
			assert!(command.ends_with("badbin/bcftools"));
			assert!(status.contains('3'));
		},
		x => panic!("Unexpected result {:?}", x),
	}
	let bcf = BcfTools::new(&s.vcf, Some(&s.dir.path().join("nobin")), None).unwrap();
	assert!(matches!(bcf.select_variants(&SelectConfig::new(&s.out("x"))), Err(VarflowError::Launch{..})));
}

#[test]
fn dry_run_spawns_nothing() {
	let s = Setup::new();
	let bcf = s.bcftools().with_runner(Runner::dry_run());
	let out = bcf.subset_vcf(&SubsetConfig::new(&s.out("sample.vcf.gz")).region("chr3").create_index(true)).unwrap();
	assert_eq!(out, s.dir.path().join("sample_chr3.vcf.gz"));
	assert!(!out.exists());
	assert!(s.calls().is_empty());
}

#[test]
fn gatk_compressed_call() {
	let s = Setup::new();
	let bam = s.dir.path().join("s.bam");
	let fasta = s.dir.path().join("ref.fa");
	fs::write(&bam, b"").unwrap();
	fs::write(&fasta, b"").unwrap();
	let gatk = Gatk::new(&bam, &fasta, Path::new("/opt/gatk"), Some(&s.bin)).unwrap().with_java(s.bin.join("java"));
	let out = gatk.run_ug(&UgConfig::new(&s.out("calls")).nt(2)).unwrap();
	assert_eq!(out, s.dir.path().join("calls.vcf.gz"));
	assert_eq!(fs::read_to_string(&out).unwrap(), "##fileformat=VCFv4.2\n");
	let calls = s.calls();
	assert!(calls[0].starts_with("java -jar /opt/gatk/GenomeAnalysisTK.jar -T UnifiedGenotyper -R "));
	assert!(calls[0].ends_with("-glm SNP -nt 2"));
}

#[test]
fn gatk_error_banner() {
	let s = Setup::new();
	let bam = s.dir.path().join("s.bam");
	fs::write(&bam, b"").unwrap();
	let java = write_script(s.dir.path(), "java_err", JAVA_WITH_ERROR_BANNER);
	let gatk = Gatk::new(&bam, &bam, Path::new("/opt/gatk"), Some(&s.bin)).unwrap().with_java(java);
	match gatk.run_ug(&UgConfig::new(&s.out("calls")).compress(false)) {
		Err(VarflowError::ToolError{tool, stderr}) => {
			assert_eq!(tool, "GATK UnifiedGenotyper");
			assert!(stderr.contains("Argument nt has a bad value"));
		},
		x => panic!("Unexpected result {:?}", x),
	}
}

#[test]
fn poprob_output() {
	let s = Setup::new();
	let work = s.dir.path().join("work");
	fs::create_dir(&work).unwrap();
	let snp = SnpTools::new(&s.vcf, Some(&s.bin)).unwrap();
	let out = snp.run_poprob(&PoprobConfig::new("chr20", "raw.list", &work)).unwrap();
	assert_eq!(out, work.join("chr20.prob"));
	assert!(out.is_file());
	assert_eq!(s.calls()[0], format!("poprob {} raw.list {}", s.vcf.display(), out.display()));
}
