// Run the varflow binary

use std::fmt::Write as _;
use std::fs;
use std::process::Command;

fn varflow() -> Command {
	let mut c = Command::new(env!("CARGO_BIN_EXE_varflow"));
	c.args(["--loglevel", "warn"]);
	c
}

#[test]
fn dry_run_prints_command_and_output() {
	let dir = tempfile::tempdir().unwrap();
	let vcf = dir.path().join("in.vcf.gz");
	fs::write(&vcf, b"").unwrap();
	let vcf_s = vcf.to_string_lossy().to_string();
	let out = varflow()
		.args(["--dry-run", "--bcftools-folder", "/nonexistent", "select-variants", "--vcf", vcf_s.as_str(), "-o", "calls", "-u", "exclude"])
		.output().unwrap();
	assert!(out.status.success());
	let stdout = String::from_utf8(out.stdout).unwrap();
	let lines: Vec<&str> = stdout.lines().collect();
	assert_eq!(lines, vec!(
		format!("/nonexistent/bcftools view -o calls.onlyvariants.vcf.gz -O z --threads 1 -U {}", vcf_s).as_str(),
		"calls.onlyvariants.vcf.gz",
	));
}

#[test]
fn subset_reports_vcf_before_index() {
	let dir = tempfile::tempdir().unwrap();
	let vcf = dir.path().join("in.vcf.gz");
	fs::write(&vcf, b"").unwrap();
	let out = varflow()
		.args(["--dry-run", "--bcftools-folder", "/x", "--tabix-folder", "/y", "subset", "--vcf", vcf.to_str().unwrap(),
			"-o", "sample.vcf.gz", "--region", "chr1", "--create-index"])
		.output().unwrap();
	assert!(out.status.success());
	let stdout = String::from_utf8(out.stdout).unwrap();
	let lines: Vec<&str> = stdout.lines().collect();
	assert_eq!(lines.len(), 4, "{}", stdout);
	assert!(lines[0].starts_with("/x/bcftools view -t ^chr1 -o sample_chr1.vcf.gz"));
	assert_eq!(lines[1], "/y/tabix -p vcf sample_chr1.vcf.gz");
	assert_eq!(&lines[2..], &["sample_chr1.vcf.gz", "sample_chr1.vcf.gz.tbi"]);
}

#[test]
fn json_dataflow() {
	let dir = tempfile::tempdir().unwrap();
	let vcf = dir.path().join("chr20.vcf.gz");
	fs::write(&vcf, b"").unwrap();
	let json = dir.path().join("out.json");
	let out = varflow()
		.args(["--dry-run", "--json", json.to_str().unwrap(), "--snptools-folder", "/opt/snptools", "poprob",
			"--vcf-file", vcf.to_str().unwrap(), "-o", "/somewhere/else/chr20", "--rawlist", "raw.list", "-w", "/work"])
		.output().unwrap();
	assert!(out.status.success());
	let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
	assert_eq!(v["command"], "poprob");
	assert_eq!(v["dry_run"], true);
	assert_eq!(v["params"]["prob_f"], "/work/chr20.prob");
}

#[test]
fn missing_input_fails() {
	let out = varflow().args(["filter", "--vcf", "/nonexistent/in.vcf.gz", "-n", "LowQual", "-e", "QUAL<20"]).output().unwrap();
	assert!(!out.status.success());
	let stderr = String::from_utf8_lossy(&out.stderr);
	assert!(stderr.contains("does not exist"), "{}", stderr);
}

#[test]
fn train_from_command_line() {
	let dir = tempfile::tempdir().unwrap();
	let header = "# [1]CHROM\t[2]POS\t[3]QD\t[4]FS\n";
	let (mut tp, mut fp) = (String::from(header), String::from(header));
	for i in 0..40 {
		writeln!(tp, "chr1\t{}\t{}\t{}", 100 + i, 20 + i % 6, 1 + i % 3).unwrap();
		writeln!(fp, "chr1\t{}\t{}\t{}", 5000 + i, 3 + i % 4, 30 + i % 9).unwrap();
	}
	let (tp_f, fp_f) = (dir.path().join("tp.tsv"), dir.path().join("fp.tsv"));
	fs::write(&tp_f, tp).unwrap();
	fs::write(&fp_f, fp).unwrap();
	let prefix = dir.path().join("model");
	let out = varflow()
		.args(["train", "--tp", tp_f.to_str().unwrap(), "--fp", fp_f.to_str().unwrap(), "-o", prefix.to_str().unwrap(), "--seed", "3"])
		.output().unwrap();
	assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
	let stdout = String::from_utf8(out.stdout).unwrap();
	let model = dir.path().join("model.sav");
	assert!(model.is_file());
	assert_eq!(stdout.lines().next(), Some(model.to_str().unwrap()));
	let m: serde_json::Value = serde_json::from_str(&fs::read_to_string(&model).unwrap()).unwrap();
	assert_eq!(m["features"], serde_json::json!(["[3]QD", "[4]FS"]));
}
