use custom_error::custom_error;

custom_error!{pub VarflowError
	MissingFile{kind: String, path: String} = "{kind} file {path} does not exist",
	MissingParameter{name: String} = "Required parameter '{name}' is not set",
	InvalidParameter{name: String, value: String, valid: String} = "Invalid value '{value}' for {name}. Valid values are {valid}",
	BadOutputPrefix{prefix: String, desc: String} = "Can not derive output name from '{prefix}': {desc}",
	Launch{command: String, desc: String} = "Error - problem launching command {command}: {desc}",
	ProcessFailed{command: String, status: String} = "Error from pipeline: {command} exited with {status}",
	ToolError{tool: String, stderr: String} = "Something went wrong while running {tool}. This was the error message: {stderr}",
	Table{path: String, desc: String} = "Error reading annotation table {path}: {desc}",
	Model{desc: String} = "Model fitting failed: {desc}",
	Config{path: String, desc: String} = "Error reading configuration file {path}: {desc}",
	Io{source: std::io::Error} = "IO error: {source}",
	Csv{source: csv::Error} = "CSV error: {source}",
	Json{source: serde_json::Error} = "JSON error: {source}",
}

impl VarflowError {
	pub fn invalid<S: ToString>(name: &str, value: S, valid: &[&str]) -> Self {
		let valid = valid.iter().map(|v| format!("'{}'", v)).collect::<Vec<_>>().join("/");
		VarflowError::InvalidParameter{name: name.to_string(), value: value.to_string(), valid}
	}
	pub fn missing(name: &str) -> Self {
		VarflowError::MissingParameter{name: name.to_string()}
	}
	// True for errors raised before any external program was started
	pub fn is_precondition(&self) -> bool {
		matches!(self, VarflowError::MissingFile{..} | VarflowError::MissingParameter{..}
			| VarflowError::InvalidParameter{..} | VarflowError::BadOutputPrefix{..})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_lists_choices() {
		let e = VarflowError::invalid("v_type", "snv", &["snps", "indels"]);
		assert_eq!(format!("{}", e), "Invalid value 'snv' for v_type. Valid values are 'snps'/'indels'");
		assert!(e.is_precondition());
		let e = VarflowError::ProcessFailed{command: "bcftools".to_string(), status: "exit status: 1".to_string()};
		assert!(!e.is_precondition());
	}
}
