use std::path::PathBuf;

use clap::{crate_version, value_parser, Arg, ArgAction, Command};
use clap_complete::Shell;

use utils::log_level::LogLevel;

use super::utils::parse_key_val;
use crate::common::defs::{GenotypingMode, Glm, SiteAction, TypeAction, Uncalled, VariantType};

fn vcf_arg() -> Arg {
	Arg::new("vcf")
		.long("vcf")
		.value_parser(value_parser!(PathBuf))
		.value_name("VCF")
		.required(true)
		.help("Input VCF file")
}

fn outprefix_arg() -> Arg {
	Arg::new("outprefix")
		.short('o')
		.long("outprefix")
		.value_parser(value_parser!(String))
		.value_name("PREFIX")
		.required(true)
		.help("Prefix for output file")
}

fn threads_arg() -> Arg {
	Arg::new("threads")
		.short('t')
		.long("threads")
		.value_parser(value_parser!(usize))
		.value_name("INT")
		.default_value("1")
		.help("Number of output compression threads")
}

fn tool_folder_arg(id: &'static str, long: &'static str, help: &'static str) -> Arg {
	Arg::new(id)
		.long(long)
		.value_parser(value_parser!(PathBuf))
		.value_name("DIR")
		.help(help)
}

pub(super) fn cli_model() -> Command {
	Command::new("varflow")
		.version(crate_version!())
		.about("Run bcftools, GATK and SNPTools steps of a variant calling workflow and train variant filtering models")
		.subcommand_required(true)
		.arg(
			Arg::new("loglevel")
				.short('v')
				.long("loglevel")
				.value_name("LOGLEVEL")
				.value_parser(value_parser!(LogLevel))
				.ignore_case(true)
				.default_value("info")
				.help("Set log level (none, error, warn, info, debug, trace)"),
		)
		.arg(
			Arg::new("quiet")
				.short('q')
				.long("quiet")
				.action(ArgAction::SetTrue)
				.help("Silence all output"),
		)
		.arg(
			Arg::new("timestamp")
				.short('X')
				.long("timestamp")
				.value_parser(["none", "sec", "ms", "us", "ns"])
				.value_name("GRANULARITY")
				.default_value("none")
				.help("Prepend log entries with a timestamp"),
		)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_parser(value_parser!(PathBuf))
				.value_name("FILE")
				.help("JSON file with tool locations"),
		)
		.arg(
			Arg::new("dry_run")
				.short('d')
				.long("dry-run")
				.action(ArgAction::SetTrue)
				.help("Print commands to be executed without running them"),
		)
		.arg(
			Arg::new("json")
				.short('j')
				.long("json")
				.value_parser(value_parser!(PathBuf))
				.value_name("FILE")
				.help("Write output parameters as JSON to FILE"),
		)
		.next_help_heading("tool locations")
		.arg(tool_folder_arg("bcftools_folder", "bcftools-folder", "Folder containing the bcftools binary"))
		.arg(tool_folder_arg("tabix_folder", "tabix-folder", "Folder containing the tabix binary"))
		.arg(tool_folder_arg("gatk_folder", "gatk-folder", "Folder containing GenomeAnalysisTK.jar"))
		.arg(tool_folder_arg("bgzip_folder", "bgzip-folder", "Folder containing the bgzip binary"))
		.arg(tool_folder_arg("snptools_folder", "snptools-folder", "Folder containing the SNPTools binaries"))
		.arg(
			Arg::new("java")
				.long("java")
				.value_parser(value_parser!(PathBuf))
				.value_name("PATH")
				.help("Java executable used to run GATK"),
		)
		.subcommand(
			Command::new("subset")
				.about("Select or exclude sites from a VCF by BED file or region")
				.arg(vcf_arg())
				.arg(outprefix_arg())
				.arg(
					Arg::new("bed")
						.short('b')
						.long("bed")
						.value_parser(value_parser!(PathBuf))
						.value_name("BED")
						.help("BED file with the sites to select/exclude"),
				)
				.arg(
					Arg::new("region")
						.short('r')
						.long("region")
						.value_parser(value_parser!(String))
						.value_name("REGION")
						.help("Region to select/exclude (chr1 or chr1:1000-2000)"),
				)
				.arg(
					Arg::new("outdir")
						.short('O')
						.long("outdir")
						.value_parser(value_parser!(PathBuf))
						.value_name("DIR")
						.help("Output directory"),
				)
				.arg(
					Arg::new("action")
						.short('a')
						.long("action")
						.value_parser(value_parser!(SiteAction))
						.value_name("ACTION")
						.default_value("exclude")
						.help("Include or exclude the given sites"),
				)
				.arg(
					Arg::new("apply_filters")
						.short('f')
						.long("apply-filters")
						.value_parser(value_parser!(String))
						.value_name("FILTERS")
						.help("Keep only sites with these FILTER values (e.g. PASS,.)"),
				)
				.arg(
					Arg::new("create_index")
						.short('i')
						.long("create-index")
						.action(ArgAction::SetTrue)
						.help("Index output with tabix"),
				)
				.arg(threads_arg()),
		)
		.subcommand(
			Command::new("filter")
				.about("Soft filter a VCF with a bcftools expression")
				.arg(vcf_arg())
				.arg(
					Arg::new("name")
						.short('n')
						.long("name")
						.value_parser(value_parser!(String))
						.value_name("NAME")
						.required(true)
						.help("Name of the filter, added to the FILTER column of failing sites"),
				)
				.arg(
					Arg::new("expression")
						.short('e')
						.long("expression")
						.value_parser(value_parser!(String))
						.value_name("EXPR")
						.required(true)
						.help("bcftools expression for sites to be filtered"),
				),
		)
		.subcommand(
			Command::new("filter-type")
				.about("Select or exclude variants of a given type")
				.arg(vcf_arg())
				.arg(outprefix_arg())
				.arg(
					Arg::new("v_type")
						.short('T')
						.long("type")
						.value_parser(value_parser!(VariantType))
						.value_name("TYPE")
						.default_value("snps")
						.help("Variant type (snps, indels, mnps, other, both)"),
				)
				.arg(
					Arg::new("action")
						.short('a')
						.long("action")
						.value_parser(value_parser!(TypeAction))
						.value_name("ACTION")
						.default_value("select")
						.help("Select or exclude variants of this type"),
				)
				.arg(
					Arg::new("biallelic")
						.short('b')
						.long("biallelic")
						.action(ArgAction::SetTrue)
						.help("Keep only biallelic sites"),
				)
				.arg(
					Arg::new("no_compress")
						.long("no-compress")
						.action(ArgAction::SetTrue)
						.help("Write uncompressed VCF"),
				),
		)
		.subcommand(
			Command::new("select-variants")
				.about("Keep only sites with a non-reference genotype")
				.arg(vcf_arg())
				.arg(outprefix_arg())
				.arg(
					Arg::new("uncalled")
						.short('u')
						.long("uncalled")
						.value_parser(value_parser!(Uncalled))
						.value_name("MODE")
						.help("Include or exclude sites without a called genotype"),
				)
				.arg(threads_arg()),
		)
		.subcommand(
			Command::new("ug")
				.about("Call variants with GATK UnifiedGenotyper")
				.arg(
					Arg::new("bam")
						.long("bam")
						.value_parser(value_parser!(PathBuf))
						.value_name("BAM")
						.required(true)
						.help("Input BAM file"),
				)
				.arg(
					Arg::new("reference")
						.short('R')
						.long("reference")
						.value_parser(value_parser!(PathBuf))
						.value_name("FASTA")
						.required(true)
						.help("Reference sequence"),
				)
				.arg(outprefix_arg())
				.arg(
					Arg::new("glm")
						.long("glm")
						.value_parser(value_parser!(Glm))
						.value_name("MODEL")
						.default_value("SNP")
						.help("Genotype likelihoods model (SNP, INDEL, BOTH)"),
				)
				.arg(
					Arg::new("nt")
						.long("nt")
						.value_parser(value_parser!(usize))
						.value_name("INT")
						.default_value("1")
						.help("Number of data threads"),
				)
				.arg(
					Arg::new("intervals")
						.short('L')
						.long("intervals")
						.value_parser(value_parser!(String))
						.value_name("INTERVALS")
						.help("Interval file or region to call"),
				)
				.arg(
					Arg::new("alleles")
						.long("alleles")
						.value_parser(value_parser!(PathBuf))
						.value_name("VCF")
						.help("Alleles to genotype in GENOTYPE_GIVEN_ALLELES mode"),
				)
				.arg(
					Arg::new("genotyping_mode")
						.long("genotyping-mode")
						.value_parser(value_parser!(GenotypingMode))
						.value_name("MODE")
						.help("DISCOVERY or GENOTYPE_GIVEN_ALLELES"),
				)
				.arg(
					Arg::new("gatk_arg")
						.short('x')
						.long("gatk-arg")
						.value_parser(parse_key_val)
						.action(ArgAction::Append)
						.value_name("KEY=VALUE")
						.help("Extra UnifiedGenotyper option, passed as --KEY VALUE"),
				)
				.arg(
					Arg::new("no_compress")
						.long("no-compress")
						.action(ArgAction::SetTrue)
						.help("Write uncompressed VCF"),
				),
		)
		.subcommand(
			Command::new("poprob")
				.about("Run SNPTools poprob on a VCF with biallelic SNPs")
				.arg(
					Arg::new("vcf_file")
						.long("vcf-file")
						.value_parser(value_parser!(PathBuf))
						.value_name("VCF")
						.required(true)
						.help("Input VCF file"),
				)
				.arg(tool_folder_arg("snptools_folder", "snptools-folder", "Folder containing the SNPTools binaries"))
				.arg(
					Arg::new("outprefix")
						.short('o')
						.long("outprefix")
						.value_parser(value_parser!(PathBuf))
						.value_name("PREFIX")
						.required(true)
						.help("Prefix for output file (any directory part is ignored)"),
				)
				.arg(
					Arg::new("rawlist")
						.long("rawlist")
						.value_parser(value_parser!(PathBuf))
						.value_name("FILE")
						.required(true)
						.help("List of .raw files from SNPTools bamodel"),
				)
				.arg(
					Arg::new("work_dir")
						.short('w')
						.long("work-dir")
						.value_parser(value_parser!(PathBuf))
						.value_name("DIR")
						.required(true)
						.help("Output directory"),
				)
				.arg(
					Arg::new("verbose")
						.long("verbose")
						.action(ArgAction::SetTrue)
						.help("Log details of the run (at least debug level)"),
				),
		)
		.subcommand(
			Command::new("train")
				.about("Train a logistic regression classifier for true/false positive calls")
				.arg(
					Arg::new("tp")
						.long("tp")
						.value_parser(value_parser!(PathBuf))
						.value_name("FILE")
						.required(true)
						.help("Annotations of true positive calls (tab separated)"),
				)
				.arg(
					Arg::new("fp")
						.long("fp")
						.value_parser(value_parser!(PathBuf))
						.value_name("FILE")
						.required(true)
						.help("Annotations of false positive calls (tab separated)"),
				)
				.arg(outprefix_arg())
				.arg(
					Arg::new("test_size")
						.long("test-size")
						.value_parser(value_parser!(f64))
						.value_name("FLOAT")
						.default_value("0.25")
						.help("Fraction of calls held back to assess the model"),
				)
				.arg(
					Arg::new("seed")
						.short('s')
						.long("seed")
						.value_parser(value_parser!(u64))
						.value_name("INT")
						.default_value("0")
						.help("Seed for the train/test split"),
				)
				.arg(
					Arg::new("c")
						.short('C')
						.value_parser(value_parser!(f64))
						.value_name("FLOAT")
						.default_value("1.0")
						.help("Inverse of regularization strength"),
				)
				.arg(
					Arg::new("max_iter")
						.long("max-iter")
						.value_parser(value_parser!(usize))
						.value_name("INT")
						.default_value("100")
						.help("Maximum number of iterations for the solver"),
				),
		)
		.subcommand(
			Command::new("completions")
				.about("Generate shell completion file")
				.arg(
					Arg::new("shell")
						.short('s')
						.long("shell")
						.value_parser(value_parser!(Shell))
						.value_name("SHELL")
						.required(true)
						.help("Shell type"),
				)
				.arg(
					Arg::new("output")
						.short('o')
						.long("output")
						.value_parser(value_parser!(PathBuf))
						.value_name("FILE")
						.help("Output file (default: stdout)"),
				),
		)
}
