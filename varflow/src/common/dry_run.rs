use std::fs;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::pipeline::Pipeline;

pub fn handle_dry_run(pipeline: &Pipeline) {
    println!("{}", pipeline.command_line());
}

/// Record of what an operation produced, handed on to whatever runs next
/// (written as JSON with `--json`, otherwise printed one value per line).
/// Values keep the order they were added in, main output first.
#[derive(Debug, Serialize)]
pub struct Dataflow {
    command: String,
    dry_run: bool,
    params: Map<String, Value>,
}

impl Dataflow {
    pub fn new(command: &str, dry_run: bool) -> Self {
        Dataflow {
            command: command.to_owned(),
            dry_run,
            params: Map::new(),
        }
    }
    pub fn add<V: Into<Value>>(&mut self, name: &str, val: V) -> &mut Self {
        self.params.insert(name.to_owned(), val.into());
        self
    }
    pub fn add_path(&mut self, name: &str, path: &Path) -> &mut Self {
        self.add(name, path.display().to_string())
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    fn write_json(&self, json_file: &Path) -> Result<(), String> {
        let ofile = fs::File::create(json_file)
            .map_err(|e| format!("Couldn't open {}: {}", json_file.display(), e))?;
        let writer = BufWriter::new(ofile);
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            format!(
                "Error: failed to write JSON output file {}: {}",
                json_file.display(),
                e
            )
        })
    }

    pub fn emit(&self, json_file: Option<&Path>) -> Result<(), String> {
        if let Some(file) = json_file {
            debug!("Writing dataflow for {} to {}", self.command, file.display());
            self.write_json(file)
        } else {
            for val in self.params.values() {
                match val {
                    Value::String(s) => println!("{}", s),
                    v => println!("{}", v),
                }
            }
            Ok(())
        }
    }
}
