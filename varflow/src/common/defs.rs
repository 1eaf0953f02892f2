use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::VarflowError;

/// Variant classes understood by `bcftools view -v/-V`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType { Snps, Indels, Mnps, Other, Both }

impl VariantType {
	pub const VALID: &'static [&'static str] = &["snps", "indels", "mnps", "other", "both"];

	// `both` means no restriction on type, so no flag is emitted for it
	pub fn type_token(&self) -> Option<&'static str> {
		match self {
			VariantType::Snps => Some("snps"),
			VariantType::Indels => Some("indels"),
			VariantType::Mnps => Some("mnps"),
			VariantType::Other => Some("other"),
			VariantType::Both => None,
		}
	}
}

impl FromStr for VariantType {
	type Err = VarflowError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"snps" => Ok(VariantType::Snps),
			"indels" => Ok(VariantType::Indels),
			"mnps" => Ok(VariantType::Mnps),
			"other" => Ok(VariantType::Other),
			"both" => Ok(VariantType::Both),
			_ => Err(VarflowError::invalid("v_type", s, Self::VALID)),
		}
	}
}

impl fmt::Display for VariantType {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.type_token().unwrap_or("both"))
	}
}

/// Whether the selected variant type is kept or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeAction { Select, Exclude }

impl TypeAction {
	pub const VALID: &'static [&'static str] = &["select", "exclude"];
}

impl FromStr for TypeAction {
	type Err = VarflowError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"select" => Ok(TypeAction::Select),
			"exclude" => Ok(TypeAction::Exclude),
			_ => Err(VarflowError::invalid("action", s, Self::VALID)),
		}
	}
}

impl fmt::Display for TypeAction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			TypeAction::Select => write!(f, "select"),
			TypeAction::Exclude => write!(f, "exclude"),
		}
	}
}

/// Include or exclude the sites named by a BED file or region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteAction { Include, Exclude }

impl SiteAction {
	pub const VALID: &'static [&'static str] = &["include", "exclude"];
}

impl Default for SiteAction {
	fn default() -> Self { SiteAction::Exclude }
}

impl FromStr for SiteAction {
	type Err = VarflowError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"include" => Ok(SiteAction::Include),
			"exclude" => Ok(SiteAction::Exclude),
			_ => Err(VarflowError::invalid("action", s, Self::VALID)),
		}
	}
}

impl fmt::Display for SiteAction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			SiteAction::Include => write!(f, "include"),
			SiteAction::Exclude => write!(f, "exclude"),
		}
	}
}

/// Handling of sites with an uncalled genotype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Uncalled { Include, Exclude }

impl Uncalled {
	pub const VALID: &'static [&'static str] = &["include", "exclude"];

	pub fn flag(&self) -> &'static str {
		match self {
			Uncalled::Include => "-u",
			Uncalled::Exclude => "-U",
		}
	}
}

impl FromStr for Uncalled {
	type Err = VarflowError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"include" => Ok(Uncalled::Include),
			"exclude" => Ok(Uncalled::Exclude),
			_ => Err(VarflowError::invalid("uncalled", s, Self::VALID)),
		}
	}
}

/// Genotype likelihood model for UnifiedGenotyper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glm { Snp, Indel, Both }

impl Glm {
	pub const VALID: &'static [&'static str] = &["SNP", "INDEL", "BOTH"];
}

impl Default for Glm {
	fn default() -> Self { Glm::Snp }
}

impl FromStr for Glm {
	type Err = VarflowError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_uppercase().as_str() {
			"SNP" => Ok(Glm::Snp),
			"INDEL" => Ok(Glm::Indel),
			"BOTH" => Ok(Glm::Both),
			_ => Err(VarflowError::invalid("glm", s, Self::VALID)),
		}
	}
}

impl fmt::Display for Glm {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Glm::Snp => write!(f, "SNP"),
			Glm::Indel => write!(f, "INDEL"),
			Glm::Both => write!(f, "BOTH"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenotypingMode { Discovery, GenotypeGivenAlleles }

impl GenotypingMode {
	pub const VALID: &'static [&'static str] = &["DISCOVERY", "GENOTYPE_GIVEN_ALLELES"];
}

impl FromStr for GenotypingMode {
	type Err = VarflowError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_uppercase().as_str() {
			"DISCOVERY" => Ok(GenotypingMode::Discovery),
			"GENOTYPE_GIVEN_ALLELES" => Ok(GenotypingMode::GenotypeGivenAlleles),
			_ => Err(VarflowError::invalid("genotyping_mode", s, Self::VALID)),
		}
	}
}

impl fmt::Display for GenotypingMode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			GenotypingMode::Discovery => write!(f, "DISCOVERY"),
			GenotypingMode::GenotypeGivenAlleles => write!(f, "GENOTYPE_GIVEN_ALLELES"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn variant_type_round_trip() {
		for s in VariantType::VALID {
			let vt = VariantType::from_str(s).unwrap();
			assert_eq!(format!("{}", vt), *s);
		}
		assert_eq!(VariantType::Both.type_token(), None);
		let e = VariantType::from_str("snv").unwrap_err();
		assert!(format!("{}", e).contains("'snps'/'indels'/'mnps'/'other'/'both'"));
	}

	#[test]
	fn case_handling() {
		// bcftools keywords are lower case only, GATK enums are case insensitive
		assert!(TypeAction::from_str("Select").is_err());
		assert_eq!(Glm::from_str("indel").unwrap(), Glm::Indel);
		assert_eq!(GenotypingMode::from_str("genotype_given_alleles").unwrap(), GenotypingMode::GenotypeGivenAlleles);
		assert_eq!(SiteAction::default(), SiteAction::Exclude);
		assert_eq!(Uncalled::from_str("exclude").unwrap().flag(), "-U");
	}
}
