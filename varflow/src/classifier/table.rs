// Variant annotation tables as written by `bcftools query -H`
//
// Tab separated with a header line.  The first two columns identify the site
// (`# [1]CHROM`, `[2]POS`); every other column is a numeric annotation.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::common::error::VarflowError;

pub const CHROM_COL: &str = "# [1]CHROM";
pub const POS_COL: &str = "[2]POS";

// `[3]DP` -> `DP`.  The bcftools column number depends on the query format so is ignored when matching columns
pub fn annotation_name(col: &str) -> &str {
	match col.strip_prefix('[').and_then(|t| t.split_once(']')) {
		Some((n, name)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => name,
		_ => col,
	}
}

fn is_missing(s: &str) -> bool {
	matches!(s, "" | "." | "NA" | "nan" | "NaN")
}

#[derive(Debug, Clone)]
pub struct AnnotationTable {
	features: Vec<String>,
	rows: Vec<Vec<f64>>,
	n_dropped: usize,
}

impl AnnotationTable {
	/// Read table from file (may be compressed)
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, VarflowError> {
		let path = path.as_ref();
		let name = format!("{}", path.display());
		let rdr = utils::compress::open_bufreader(path)
			.map_err(|e| VarflowError::Table{path: name.clone(), desc: e.to_string()})?;
		let table = Self::from_reader(rdr, &name)?;
		debug!("Read {} complete rows from {} ({} rows with missing values dropped)", table.rows.len(), name, table.n_dropped);
		Ok(table)
	}
	
	pub fn from_reader<R: Read>(rdr: R, name: &str) -> Result<Self, VarflowError> {
		let table_err = |desc: String| VarflowError::Table{path: name.to_owned(), desc};
		let mut rdr = ReaderBuilder::new().delimiter(b'\t').quoting(false).from_reader(rdr);
		let header = rdr.headers().map_err(|e| table_err(e.to_string()))?.clone();
		let find_col = |col: &str| header.iter().position(|s| s.trim() == col)
			.ok_or_else(|| table_err(format!("missing column '{}'", col)));
		let id_cols = [find_col(CHROM_COL)?, find_col(POS_COL)?];
		let feature_ix: Vec<usize> = (0..header.len()).filter(|ix| !id_cols.contains(ix)).collect();
		if feature_ix.is_empty() { return Err(table_err("no annotation columns found".to_string())) }
		let features: Vec<String> = feature_ix.iter().map(|ix| header[*ix].trim().to_owned()).collect();
		
		let mut rows = Vec::new();
		let mut n_dropped = 0;
		let mut rec = StringRecord::new();
		let mut line = 1;
		while rdr.read_record(&mut rec).map_err(|e| table_err(e.to_string()))? {
			line += 1;
			if id_cols.iter().chain(feature_ix.iter()).any(|ix| is_missing(rec[*ix].trim())) {
				n_dropped += 1;
				continue
			}
			let mut row = Vec::with_capacity(feature_ix.len());
			for (ix, feat) in feature_ix.iter().zip(features.iter()) {
				let s = rec[*ix].trim();
				let x = s.parse::<f64>().map_err(|_| table_err(format!("non-numeric value '{}' for {} at line {}", s, feat, line)))?;
				row.push(x);
			}
			rows.push(row);
		}
		Ok(AnnotationTable{features, rows, n_dropped})
	}
	
	pub fn features(&self) -> &[String] { &self.features }
	pub fn rows(&self) -> &[Vec<f64>] { &self.rows }
	pub fn n_dropped(&self) -> usize { self.n_dropped }
	
	/// Rows with the columns rearranged to follow `features`.  None unless both
	/// tables have the same annotations (in any order).
	pub fn rows_ordered_as(&self, features: &[String]) -> Option<Vec<Vec<f64>>> {
		if features.len() != self.features.len() { return None }
		let map = features.iter().map(|f| self.features.iter().position(|g| annotation_name(g) == annotation_name(f)))
			.collect::<Option<Vec<usize>>>()?;
		Some(self.rows.iter().map(|r| map.iter().map(|ix| r[*ix]).collect()).collect())
	}
}
