// Command line assembly for external programs
//
// An Invocation is a program plus, in order, its subcommand tokens, (option, value)
// pairs and bare parameters.  The same token sequence is used to launch the
// program and to render it for the log, dry runs and JSON reports.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
	pub option: String,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
	program: PathBuf,
	sub: Vec<String>,
	args: Vec<Argument>,
	params: Vec<String>,
}

impl Invocation {
	pub fn new<P: AsRef<Path>>(program: P) -> Self {
		Invocation{program: program.as_ref().to_owned(), sub: Vec::new(), args: Vec::new(), params: Vec::new()}
	}
	// Tokens placed straight after the program (`view` in `bcftools view`, `-jar x.jar` for java)
	pub fn sub<S: Into<String>>(&mut self, s: S) -> &mut Self {
		self.sub.push(s.into());
		self
	}
	// Option flag plus its value.  Repeated options are kept in order.
	pub fn arg<S: Into<String>, T: ToString>(&mut self, option: S, value: T) -> &mut Self {
		self.args.push(Argument{option: option.into(), value: value.to_string()});
		self
	}
	pub fn param<S: Into<String>>(&mut self, p: S) -> &mut Self {
		self.params.push(p.into());
		self
	}
	pub fn program(&self) -> &Path { &self.program }
	pub fn args(&self) -> &[Argument] { &self.args }
	pub fn params(&self) -> &[String] { &self.params }
	
	/// Arguments as passed to the program (everything after the program itself)
	pub fn argv(&self) -> Vec<&str> {
		let mut v: Vec<&str> = self.sub.iter().map(|s| s.as_str()).collect();
		for a in self.args.iter() {
			v.push(&a.option);
			v.push(&a.value);
		}
		v.extend(self.params.iter().map(|s| s.as_str()));
		v
	}
	/// `<program> <sub..> <flag1> <value1> ... <param1> ...` joined by single spaces.
	/// Nothing is escaped.
	pub fn render(&self) -> String {
		let mut s = self.program.to_string_lossy().to_string();
		for tok in self.argv() {
			s.push(' ');
			s.push_str(tok);
		}
		s
	}
}

impl fmt::Display for Invocation {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.render())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn render_keeps_order_and_duplicates() {
		let mut inv = Invocation::new("/opt/bin/bcftools");
		inv.sub("view").arg("-o", "out.vcf.gz").arg("-O", "z").arg("--threads", 4).arg("-O", "z").param("-m2").param("in.vcf.gz");
		assert_eq!(inv.render(), "/opt/bin/bcftools view -o out.vcf.gz -O z --threads 4 -O z -m2 in.vcf.gz");
		assert_eq!(inv.argv().len(), 11);
		assert_eq!(inv.args().len(), 4);
	}

	#[test]
	fn values_are_not_escaped() {
		let mut inv = Invocation::new("bcftools");
		inv.sub("filter").arg("-e", "INFO/DP>24304 | MQ<34").param("a.vcf");
		assert_eq!(format!("{}", inv), "bcftools filter -e INFO/DP>24304 | MQ<34 a.vcf");
		// but it stays a single token for the process
		assert_eq!(inv.argv()[2], "INFO/DP>24304 | MQ<34");
	}

	#[test]
	fn bare_program() {
		let inv = Invocation::new("poprob");
		assert_eq!(inv.render(), "poprob");
		assert!(inv.argv().is_empty());
	}
}
