//! Path validation and remote/local path mapping

use std::path::{Component, Path, PathBuf};

use super::ValidationError;
use crate::protocol::REMOTE_SEPARATOR;

/// Map a remote tree-relative path onto `root`.
///
/// Both `\` and `/` separate components. Empty and `.` components are
/// dropped; `..`, and anything that looks like a root or drive prefix
/// (`C:`, `Root:`), is rejected so the result always stays under `root`.
pub fn remote_to_local(root: &Path, remote: &str) -> Result<PathBuf, ValidationError> {
	let mut out = root.to_path_buf();
	for part in remote.split(['\\', '/']) {
		match part {
			"" | "." => {}
			p if p == ".." || p.contains(':') || p.contains('\0') => {
				return Err(ValidationError::RemotePath {
					path: remote.to_string(),
					component: p.to_string(),
				})
			}
			p => out.push(p),
		}
	}
	Ok(out)
}

/// Render a local relative path for the wire, joining components with `\`.
///
/// An empty path renders as `.`.
pub fn local_to_remote(relative: &Path) -> String {
	let parts: Vec<String> = relative
		.components()
		.filter_map(|c| match c {
			Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
			_ => None,
		})
		.collect();
	if parts.is_empty() {
		".".to_string()
	} else {
		parts.join(&REMOTE_SEPARATOR.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_remote_to_local_backslashes() {
		let root = Path::new("/tmp/dl");
		let p = remote_to_local(root, "a\\b\\c.txt").unwrap();
		assert_eq!(p, Path::new("/tmp/dl/a/b/c.txt"));
	}

	#[test]
	fn test_remote_to_local_mixed_and_dots() {
		let root = Path::new("/tmp/dl");
		let p = remote_to_local(root, ".\\a/./b\\").unwrap();
		assert_eq!(p, Path::new("/tmp/dl/a/b"));
		assert_eq!(remote_to_local(root, ".").unwrap(), root);
	}

	#[test]
	fn test_remote_to_local_rejects_escape() {
		let root = Path::new("/tmp/dl");
		assert!(remote_to_local(root, "..\\etc").is_err());
		assert!(remote_to_local(root, "a\\..\\..\\x").is_err());
		assert!(remote_to_local(root, "Root:\\x").is_err());
		assert!(remote_to_local(root, "C:\\Windows").is_err());
	}

	#[test]
	fn test_local_to_remote() {
		assert_eq!(local_to_remote(Path::new("a/b/c.txt")), "a\\b\\c.txt");
		assert_eq!(local_to_remote(Path::new("")), ".");
		assert_eq!(local_to_remote(Path::new("top")), "top");
	}
}

// vim: ts=4
