//! Validation of user-supplied settings and server-supplied paths
//!
//! - [`config`]: endpoint addresses, timeouts and the progress threshold
//! - [`path`]: mapping remote tree paths under a local destination root

use std::error::Error;
use std::fmt;

pub mod config;
pub mod path;

pub use config::*;
pub use path::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// A setting holds a value the client cannot work with
	Setting { key: String, reason: String },
	/// A configuration source could not be read or parsed
	Source(String),
	/// A remote path contains a component that would leave the destination root
	RemotePath { path: String, component: String },
}

impl ValidationError {
	pub(crate) fn setting(key: &str, reason: impl Into<String>) -> Self {
		ValidationError::Setting { key: key.to_string(), reason: reason.into() }
	}
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::Setting { key, reason } => write!(f, "Invalid {}: {}", key, reason),
			ValidationError::Source(msg) => write!(f, "Cannot load configuration: {}", msg),
			ValidationError::RemotePath { path, component } => {
				write!(f, "Remote path {:?} contains disallowed component {:?}", path, component)
			}
		}
	}
}

impl Error for ValidationError {}

/// Types that can check their own values before use
pub trait Validator {
	fn validate(&self) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_setting_error_names_key() {
		let err = ValidationError::setting("idleTimeoutSecs", "must be greater than 0");
		assert_eq!(err.to_string(), "Invalid idleTimeoutSecs: must be greater than 0");
	}

	#[test]
	fn test_remote_path_error_display() {
		let err = ValidationError::RemotePath { path: "..\\x".to_string(), component: "..".to_string() };
		assert!(err.to_string().contains("disallowed component \"..\""));
	}
}

// vim: ts=4
