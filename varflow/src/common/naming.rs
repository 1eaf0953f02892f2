// Output file naming
//
// Names are composed from explicit fields rather than by editing a caller supplied
// string in place.

use std::path::{Path, PathBuf};

use super::defs::{TypeAction, VariantType};
use super::error::VarflowError;

/// VCF file name split into `<stem>[_<region>][.filt].<suffix>`, where `suffix`
/// starts at the `vcf` segment (`vcf`, `vcf.gz`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct VcfName {
	dir: Option<PathBuf>,
	stem: String,
	region: Option<String>,
	filtered: bool,
	suffix: String,
}

impl VcfName {
	pub fn new(stem: &str, suffix: &str) -> Self {
		VcfName{dir: None, stem: stem.to_owned(), region: None, filtered: false, suffix: suffix.to_owned()}
	}
	
	/// Split an existing name such as `dir/sample.vcf.gz` into its fields.  Only the file
	/// name is examined, and the first dot-separated segment equal to `vcf` starts the suffix.
	pub fn parse(prefix: &str) -> Result<Self, VarflowError> {
		let bad = |desc: &str| VarflowError::BadOutputPrefix{prefix: prefix.to_owned(), desc: desc.to_owned()};
		let path = Path::new(prefix);
		let fname = path.file_name().and_then(|f| f.to_str()).ok_or_else(|| bad("no file name"))?;
		let bits: Vec<&str> = fname.split('.').collect();
		let ix = bits.iter().position(|b| *b == "vcf").ok_or_else(|| bad("no 'vcf' segment in file name"))?;
		if ix == 0 || bits[..ix].iter().all(|b| b.is_empty()) { return Err(bad("nothing precedes the 'vcf' segment")) }
		let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).map(|p| p.to_owned());
		Ok(VcfName{dir, stem: bits[..ix].join("."), region: None, filtered: false, suffix: bits[ix..].join(".")})
	}
	
	pub fn with_region(mut self, region: &str) -> Self {
		self.region = Some(region.to_owned());
		self
	}
	pub fn filtered(mut self, flag: bool) -> Self {
		self.filtered = flag;
		self
	}
	pub fn stem(&self) -> &str { &self.stem }
	pub fn suffix(&self) -> &str { &self.suffix }
	
	pub fn file_name(&self) -> String {
		let mut s = self.stem.clone();
		if let Some(r) = &self.region {
			s.push('_');
			s.push_str(r);
		}
		if self.filtered { s.push_str(".filt") }
		s.push('.');
		s.push_str(&self.suffix);
		s
	}
	
	pub fn to_path(&self) -> PathBuf {
		match &self.dir {
			Some(d) => d.join(self.file_name()),
			None => PathBuf::from(self.file_name()),
		}
	}
}

/// Output of a variant type filter: `<prefix>[.<type>|.no<type>][.biallelic].vcf[.gz]`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeFilterName {
	prefix: String,
	marker: Option<String>,
	biallelic: bool,
	compressed: bool,
}

impl TypeFilterName {
	pub fn new(prefix: &str, v_type: VariantType, action: TypeAction, biallelic: bool, compressed: bool) -> Self {
		let marker = v_type.type_token().map(|t| match action {
			TypeAction::Select => t.to_string(),
			TypeAction::Exclude => format!("no{}", t),
		});
		TypeFilterName{prefix: prefix.to_owned(), marker, biallelic, compressed}
	}
	
	pub fn marker(&self) -> Option<&str> { self.marker.as_deref() }

	pub fn to_path(&self) -> PathBuf {
		let mut s = self.prefix.clone();
		if let Some(m) = &self.marker {
			s.push('.');
			s.push_str(m);
		}
		if self.biallelic { s.push_str(".biallelic") }
		s.push_str(if self.compressed { ".vcf.gz" } else { ".vcf" });
		PathBuf::from(s)
	}
}
