use std::env;
use std::ffi::{CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

pub mod compress;
pub mod log_level;

fn access(p: &Path) -> Result<bool, String> {
	let cstr = CString::new(p.as_os_str().as_bytes()).map_err(|e| format!("access(): error converting {}: {}", p.display(), e))?;
	unsafe { Ok(libc::access(cstr.as_ptr(), libc::X_OK) == 0) }
}

/// Search PATH for an executable called `prog`
pub fn find_exec_path<S: AsRef<OsStr>>(prog: S) -> Option<PathBuf> {
	let search_path = env::var_os("PATH").unwrap_or_else(|| OsString::from("/usr/bin:/usr/local/bin"));
	find_exec_in(prog, &search_path)
}

pub fn find_exec_in<S: AsRef<OsStr>, T: AsRef<OsStr> + ?Sized>(prog: S, search_path: &T) -> Option<PathBuf> {
	for path in env::split_paths(search_path) {
		let candidate = path.join(prog.as_ref());
		if candidate.is_file() {
			if let Ok(true) = access(&candidate) { return Some(candidate) }
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use std::os::unix::fs::PermissionsExt;

	#[test]
	fn finds_only_executables() {
		let dir = tempfile::tempdir().unwrap();
		let exe = dir.path().join("mytool");
		let plain = dir.path().join("notes");
		fs::write(&exe, "#!/bin/sh\n").unwrap();
		fs::write(&plain, "text").unwrap();
		fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
		fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

		let search = dir.path().as_os_str();
		assert_eq!(find_exec_in("mytool", search), Some(exe));
		assert_eq!(find_exec_in("notes", search), None);
		assert_eq!(find_exec_in("missing", search), None);
	}
}
