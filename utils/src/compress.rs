use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader, Error, ErrorKind, Result};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompressType {
    GZIP,
    COMPRESS,
    BZIP2,
    XZ,
    UNCOMPRESSED,
}

impl CompressType {
	// Decompression filter for this type
	fn filter(&self) -> Option<&'static str> {
		match self {
			CompressType::UNCOMPRESSED => None,
			CompressType::BZIP2 => Some("bzip2"),
			CompressType::XZ => Some("xz"),
			CompressType::GZIP | CompressType::COMPRESS => Some("gzip"),
		}
	}
}

pub enum ReadType {
	Pipe(FilterReader),
	File(File),	
}

/// Output of a decompression filter.  The exit status of the filter is checked
/// once its output is exhausted, so a corrupt or truncated input gives an error
/// rather than a short read.
pub struct FilterReader {
	prog: String,
	child: Child,
	stdout: ChildStdout,
	status: Option<ExitStatus>,
	err_msg: String,
}

impl FilterReader {
	fn check_status(&mut self) -> Result<()> {
		if self.status.is_none() {
			let status = self.child.wait()?;
			if !status.success() {
				if let Some(mut err) = self.child.stderr.take() {
					let _ = err.read_to_string(&mut self.err_msg);
				}
			}
			self.status = Some(status);
		}
		match self.status {
			Some(st) if !st.success() => Err(Error::new(ErrorKind::InvalidData,
				format!("'{} -d' exited with {}: {}", self.prog, st, self.err_msg.trim()))),
			_ => Ok(()),
		}
	}
}

impl Read for FilterReader {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		let n = self.stdout.read(buf)?;
		if n == 0 && !buf.is_empty() { self.check_status()? }
		Ok(n)
	}
}

impl Drop for FilterReader {
	fn drop(&mut self) {
		if self.status.is_none() {
			let _ = self.child.kill();
			let _ = self.child.wait();
		}
	}
}

pub fn new_read_filter_from_pipe<P: AsRef<Path>>(prog: P, pipe: Stdio) -> Result<FilterReader> {
	let path: &Path = prog.as_ref();
    match Command::new(path).arg("-d")
        .stdin(pipe)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn() {
            Ok(mut child) => match child.stdout.take() {
				Some(stdout) => Ok(FilterReader{prog: path.display().to_string(), child, stdout, status: None, err_msg: String::new()}),
				None => {
					let _ = child.kill();
					let _ = child.wait();
					Err(Error::new(ErrorKind::Other, format!("No stdout pipe from '{} -d'", path.display())))
				}
			},
            Err(error) => Err(Error::new(ErrorKind::Other, format!("Error executing pipe command '{} -d': {}", path.display(), error))),
        }
}

fn test_open_file(path: &Path) -> Result<File> {
    match File::open(path) {
        Ok(handle) => Ok(handle),
        Err(error) => Err(Error::new(error.kind(), format!("Error opening {} for input: {}", path.display(), error))),
    }
}

pub fn get_compress_type(path: &Path) -> Result<CompressType> {
    let mut f = test_open_file(path)?;
    let mut buf = [0; 6];
    let n = match f.read(&mut buf) {
        Ok(num) => num,
        Err(error) => return Err(Error::new(ErrorKind::Other, format!("Error reading from {}: {}", path.display(), error))),
    };
    
    let mut ctype = CompressType::UNCOMPRESSED;    
    if n == 6 {
        if buf[0] == 0x1f {
            if buf[1] == 0x9d {
                ctype = CompressType::COMPRESS;
            } else if buf[1] == 0x8b && buf[2] == 0x08 {
                ctype = CompressType::GZIP;
            }
        } else if buf[0] == b'B' && buf[1] == b'Z' && buf[2] == b'h' && buf[3] >= b'0' && buf[3] <= b'9' {
            ctype = CompressType::BZIP2;
        } else if buf[0] == 0xfd && buf[1] == b'7' && buf[2] == b'z' && buf[3] == b'X' && buf[4] == b'Z' && buf[5] == 0x00 {
            ctype = CompressType::XZ;
        }
    }
    Ok(ctype)
}

pub fn open_reader<P: AsRef<Path>>(name: P) -> Result<ReadType> {
	let ctype = get_compress_type(name.as_ref())?;
	let f = test_open_file(name.as_ref())?;
	match ctype.filter() {
		None => Ok(ReadType::File(f)),
		Some(prog) => {
			trace!("Reading {} through {} -d", name.as_ref().display(), prog);
			new_read_filter_from_pipe(prog, Stdio::from(f)).map(ReadType::Pipe)
		}
	}
}

pub fn open_bufreader<P: AsRef<Path>>(name: P) -> Result<Box<dyn BufRead>> {
	match open_reader(name)? {
		ReadType::File(file) => Ok(Box::new(BufReader::new(file))),
		ReadType::Pipe(pipe) => Ok(Box::new(BufReader::new(pipe))),
	}
}
