use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

use super::command::Invocation;
use super::dry_run;
use super::error::VarflowError;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
	FilePath(PathBuf),
	Capture,
}

/// What came back from a pipeline run with `Pipeline::run`
#[derive(Debug)]
pub struct ProcessOutput {
	pub stdout: String,
	pub stderr: String,
	pub statuses: Vec<(String, ExitStatus)>,
}

impl ProcessOutput {
	pub fn success(&self) -> bool { self.statuses.iter().all(|(_, st)| st.success()) }
	// First stage (in pipeline order) that exited with an error
	pub fn failed_stage(&self) -> Option<(&str, &ExitStatus)> {
		self.statuses.iter().find(|(_, st)| !st.success()).map(|(c, st)| (c.as_str(), st))
	}
}

/// One or more commands with the stdout of each stage feeding the stdin of the next.
/// The final stdout is either captured or sent to a file.
#[derive(Debug, Clone)]
pub struct Pipeline {
	stages: Vec<Invocation>,
	output: PipelineOutput,
}

impl Pipeline {
	pub fn new(first: Invocation) -> Self {
		Pipeline{stages: vec!(first), output: PipelineOutput::Capture}
	}
	// Add downstream stage
	pub fn pipe_to(&mut self, next: Invocation) -> &mut Self {
		self.stages.push(next);
		self
	}
	// Send output of pipeline to file at Path
	pub fn out_filepath<P: AsRef<Path>>(&mut self, file: P) -> &mut Self {
		self.output = PipelineOutput::FilePath(file.as_ref().to_owned());
		self
	}
	pub fn stages(&self) -> &[Invocation] { &self.stages }
	pub fn output(&self) -> &PipelineOutput { &self.output }
	
	pub fn command_line(&self) -> String {
		let mut desc = self.stages.iter().map(|s| s.render()).collect::<Vec<_>>().join(" | ");
		if let PipelineOutput::FilePath(file) = &self.output {
			desc.push_str(format!(" > {}", file.display()).as_str());
		}
		desc
	}
	
	/// Run and return stdout.  Any stage exiting with an error fails the call.
	/// stderr is passed through to our own stderr.
	pub fn run_checkoutput(&self) -> Result<String, VarflowError> {
		let out = self.do_run(false)?;
		if let Some((com, st)) = out.failed_stage() {
			return Err(VarflowError::ProcessFailed{command: com.to_string(), status: format!("{}", st)})
		}
		Ok(out.stdout)
	}
	
	/// Run capturing stdout and stderr.  Exit statuses are returned to the caller
	/// and not checked here.
	pub fn run(&self) -> Result<ProcessOutput, VarflowError> {
		self.do_run(true)
	}
	
	fn do_run(&self, capture_stderr: bool) -> Result<ProcessOutput, VarflowError> {
		let last = self.stages.len() - 1;
		let mut cinfo: Vec<(Child, String)> = Vec::new();
		for (ix, stage) in self.stages.iter().enumerate() {
			let com = stage.program().to_string_lossy().to_string();
			let mut cc = Command::new(stage.program());
			cc.args(stage.argv());
			if let Some((child, _)) = cinfo.last_mut() {
				if let Some(pipe) = child.stdout.take() { cc.stdin(Stdio::from(pipe)); }
			} else { cc.stdin(Stdio::null()); }
			if capture_stderr { cc.stderr(Stdio::piped()); }
			if ix < last { cc.stdout(Stdio::piped()); } else {
				match &self.output {
					PipelineOutput::FilePath(file) => {
						let f = match fs::File::create(file) {
							Ok(f) => f,
							Err(e) => {
								kill_all(&mut cinfo);
								return Err(VarflowError::Launch{command: com, desc: format!("Couldn't open output file {}: {}", file.display(), e)})
							},
						};
						cc.stdout(Stdio::from(f));
					},
					PipelineOutput::Capture => { cc.stdout(Stdio::piped()); },
				}
			}
			match cc.spawn() {
				Ok(child) => {
					trace!("Launched pipeline command {}", com);
					cinfo.push((child, com));
				},
				Err(e) => {
					kill_all(&mut cinfo);
					return Err(VarflowError::Launch{command: com, desc: format!("{}", e)})
				},
			}
		}
		debug!("Launched: {}", self.command_line());
		
		// stderr from each stage is drained on its own thread so that no stage can block on a full pipe
		let readers: Vec<_> = cinfo.iter_mut().map(|(child, com)| {
			let com = com.clone();
			child.stderr.take().map(|mut pipe| thread::spawn(move || {
				let mut buf = Vec::new();
				if let Err(e) = pipe.read_to_end(&mut buf) { debug!("Error reading stderr of {}: {}", com, e) }
				buf
			}))
		}).collect();
		
		let last_out = cinfo.last_mut().and_then(|(child, com)| child.stdout.take().map(|pipe| (pipe, com.clone())));
		let stdout = match last_out {
			Some((pipe, com)) => drain_stdout(pipe, &com, &mut cinfo)?,
			None => Vec::new(),
		};
		let mut statuses = Vec::with_capacity(cinfo.len());
		for (mut child, com) in cinfo.drain(..) {
			trace!("Waiting for {} to finish", com);
			let st = child.wait().map_err(|e| VarflowError::Launch{command: com.clone(), desc: format!("{}", e)})?;
			if !st.success() { debug!("{} exited with {}", com, st) }
			statuses.push((com, st));
		}
		let mut stderr = Vec::new();
		for h in readers.into_iter().flatten() {
			if let Ok(buf) = h.join() { stderr.extend(buf) }
		}
		Ok(ProcessOutput{
			stdout: String::from_utf8_lossy(&stdout).into_owned(), 
			stderr: String::from_utf8_lossy(&stderr).into_owned(), 
			statuses,
		})
	}
}

// On a read error every stage is killed and reaped before returning
fn drain_stdout<R: Read>(mut pipe: R, com: &str, cinfo: &mut Vec<(Child, String)>) -> Result<Vec<u8>, VarflowError> {
	let mut buf = Vec::new();
	if let Err(e) = pipe.read_to_end(&mut buf) {
		kill_all(cinfo);
		return Err(VarflowError::Launch{command: com.to_owned(), desc: format!("Error reading from pipeline stdout: {}", e)})
	}
	Ok(buf)
}

fn kill_all(cinfo: &mut Vec<(Child, String)>) {
	for (child, com) in cinfo.iter_mut() {
		trace!("Sending kill signal to {} command", com);
		let _ = child.kill();
		let _ = child.wait();
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExecMode { Execute, DryRun }

/// Executes pipelines, or in dry-run mode only reports what would be run
#[derive(Debug, Clone)]
pub struct Runner {
	mode: ExecMode,
}

impl Default for Runner {
	fn default() -> Self { Runner{mode: ExecMode::Execute} }
}

impl Runner {
	pub fn new(mode: ExecMode) -> Self { Runner{mode} }
	pub fn dry_run() -> Self { Runner{mode: ExecMode::DryRun} }
	pub fn is_dry_run(&self) -> bool { self.mode == ExecMode::DryRun }
	
	pub fn checkoutput(&self, pipeline: &Pipeline) -> Result<String, VarflowError> {
		info!("Command line is: {}", pipeline.command_line());
		if self.is_dry_run() {
			dry_run::handle_dry_run(pipeline);
			Ok(String::new())
		} else { pipeline.run_checkoutput() }
	}
	
	// In dry-run mode this returns an empty, successful output
	pub fn run(&self, pipeline: &Pipeline) -> Result<ProcessOutput, VarflowError> {
		info!("Command line is: {}", pipeline.command_line());
		if self.is_dry_run() {
			dry_run::handle_dry_run(pipeline);
			Ok(ProcessOutput{stdout: String::new(), stderr: String::new(), statuses: Vec::new()})
		} else { pipeline.run() }
	}
}
