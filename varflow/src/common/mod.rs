pub mod command;
pub mod defs;
pub mod dry_run;
pub mod error;
pub mod naming;
pub mod pipeline;

use std::path::Path;

use error::VarflowError;

// Precondition shared by all wrappers: an input named in a constructor must exist
pub fn check_file_exists(kind: &str, path: &Path) -> Result<(), VarflowError> {
	if path.is_file() { Ok(()) }
	else { Err(VarflowError::MissingFile{kind: kind.to_string(), path: path.display().to_string()}) }
}
