pub mod bcftools;
pub mod gatk;
pub mod snptools;

pub use bcftools::BcfTools;
pub use gatk::Gatk;
pub use snptools::SnpTools;
