//! Client configuration
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (`--config`, else ~/.clouddrive/config.toml when present)
//! 3. Environment variables (CLOUDDRIVE_* prefix)
//! 4. CLI flags (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ClientError;
use crate::validation::{
	validate_addr, validate_progress_threshold, validate_timeout_secs, ValidationError, Validator,
};

/// Default command endpoint
pub const DEFAULT_SERVER_ADDR: &str = "clouddriveserver.duckdns.org:12345";

/// Default bulk-transfer endpoint
pub const DEFAULT_TRANSFER_ADDR: &str = "clouddriveserver.duckdns.org:12346";

/// Idle read deadline on data channels, in seconds
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 10;

/// Bytes read between two upload progress reports
pub const DEFAULT_PROGRESS_THRESHOLD: u64 = 1_000_000;

const CONFIG_DIR: &str = ".clouddrive";
const CONFIG_FILE: &str = "config.toml";

/// Unified configuration for the CloudDrive client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	// ========================================================================
	// ENDPOINTS
	// ========================================================================
	/// Address of the long-lived command connection
	pub server_addr: String,

	/// Address dialed once per transfer for the data connection
	pub transfer_addr: String,

	/// Timeout for establishing either connection
	pub connect_timeout_secs: u64,

	// ========================================================================
	// TIMEOUTS
	// ========================================================================
	/// Idle read deadline on data channels; elapsing ends a file body
	pub idle_timeout_secs: u64,

	/// Optional deadline for command replies (unset = wait indefinitely)
	pub control_timeout_secs: Option<u64>,

	// ========================================================================
	// REPORTING
	// ========================================================================
	/// Print upload progress and completion lines
	pub progress: bool,

	/// Bytes read between two progress reports
	pub progress_threshold: u64,

	// ========================================================================
	// SHUTDOWN
	// ========================================================================
	/// Wait for running transfers when input ends instead of dropping them
	pub wait_for_transfers: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			server_addr: DEFAULT_SERVER_ADDR.to_string(),
			transfer_addr: DEFAULT_TRANSFER_ADDR.to_string(),
			connect_timeout_secs: 10,
			idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
			control_timeout_secs: None,
			progress: true,
			progress_threshold: DEFAULT_PROGRESS_THRESHOLD,
			wait_for_transfers: false,
		}
	}
}

impl Config {
	/// Default config file location (~/.clouddrive/config.toml)
	pub fn default_path() -> Option<PathBuf> {
		std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(CONFIG_DIR).join(CONFIG_FILE))
	}

	/// Parse a TOML document
	pub fn from_toml(text: &str) -> Result<Self, ClientError> {
		toml::from_str(text)
			.map_err(|e| ClientError::Config(ValidationError::Source(e.to_string())))
	}

	/// Load defaults, then the config file, then environment overrides.
	///
	/// An explicit `path` must exist; the default location is optional.
	pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
		let mut config = match path {
			Some(p) => Self::read_file(p)?,
			None => match Self::default_path() {
				Some(p) if p.is_file() => Self::read_file(&p)?,
				_ => Config::default(),
			},
		};
		config.apply_env(|key| std::env::var(key).ok())?;
		Ok(config)
	}

	fn read_file(path: &Path) -> Result<Self, ClientError> {
		let text = std::fs::read_to_string(path).map_err(|e| {
			ClientError::Config(ValidationError::Source(format!(
				"cannot read {}: {}",
				path.display(),
				e
			)))
		})?;
		Self::from_toml(&text)
	}

	/// Apply CLOUDDRIVE_* overrides using `lookup` to read variables
	pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ClientError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(addr) = lookup("CLOUDDRIVE_SERVER") {
			self.server_addr = addr;
		}
		if let Some(addr) = lookup("CLOUDDRIVE_TRANSFER_SERVER") {
			self.transfer_addr = addr;
		}
		if let Some(secs) = lookup("CLOUDDRIVE_IDLE_TIMEOUT") {
			self.idle_timeout_secs = secs.trim().parse().map_err(|_| {
				ClientError::Config(ValidationError::Source(format!(
					"CLOUDDRIVE_IDLE_TIMEOUT must be a number of seconds, got {:?}",
					secs
				)))
			})?;
		}
		Ok(())
	}

	pub fn idle_timeout(&self) -> Duration {
		Duration::from_secs(self.idle_timeout_secs)
	}

	pub fn control_timeout(&self) -> Option<Duration> {
		self.control_timeout_secs.map(Duration::from_secs)
	}

	pub fn connect_timeout(&self) -> Duration {
		Duration::from_secs(self.connect_timeout_secs)
	}
}

impl Validator for Config {
	fn validate(&self) -> Result<(), ValidationError> {
		validate_addr("serverAddr", &self.server_addr)?;
		validate_addr("transferAddr", &self.transfer_addr)?;
		validate_timeout_secs("connectTimeoutSecs", self.connect_timeout_secs)?;
		validate_timeout_secs("idleTimeoutSecs", self.idle_timeout_secs)?;
		if let Some(secs) = self.control_timeout_secs {
			validate_timeout_secs("controlTimeoutSecs", secs)?;
		}
		validate_progress_threshold(self.progress_threshold)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_config_default() {
		let config = Config::default();
		assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR);
		assert_eq!(config.transfer_addr, DEFAULT_TRANSFER_ADDR);
		assert_eq!(config.idle_timeout(), Duration::from_secs(10));
		assert_eq!(config.control_timeout(), None);
		assert_eq!(config.progress_threshold, 1_000_000);
		assert!(!config.wait_for_transfers);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_config_from_toml_partial() {
		let config = Config::from_toml(
			r#"
serverAddr = "127.0.0.1:9000"
idleTimeoutSecs = 3
waitForTransfers = true
"#,
		)
		.unwrap();
		assert_eq!(config.server_addr, "127.0.0.1:9000");
		assert_eq!(config.idle_timeout_secs, 3);
		assert!(config.wait_for_transfers);
		// untouched fields keep defaults
		assert_eq!(config.transfer_addr, DEFAULT_TRANSFER_ADDR);
	}

	#[test]
	fn test_config_from_toml_invalid() {
		assert!(Config::from_toml("idleTimeoutSecs = \"soon\"").is_err());
	}

	#[test]
	fn test_config_env_overrides() {
		let mut config = Config::default();
		config
			.apply_env(|key| match key {
				"CLOUDDRIVE_SERVER" => Some("10.0.0.1:1".to_string()),
				"CLOUDDRIVE_IDLE_TIMEOUT" => Some("25".to_string()),
				_ => None,
			})
			.unwrap();
		assert_eq!(config.server_addr, "10.0.0.1:1");
		assert_eq!(config.idle_timeout_secs, 25);
		assert_eq!(config.transfer_addr, DEFAULT_TRANSFER_ADDR);
	}

	#[test]
	fn test_config_env_bad_timeout() {
		let mut config = Config::default();
		let result = config.apply_env(|key| {
			(key == "CLOUDDRIVE_IDLE_TIMEOUT").then(|| "ten".to_string())
		});
		assert!(result.is_err());
	}

	#[test]
	fn test_config_validate_rejects_zero_idle_timeout() {
		let config = Config { idle_timeout_secs: 0, ..Config::default() };
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_config_serialization() {
		let config = Config::default();
		let text = toml::to_string(&config).unwrap();
		assert!(text.contains("serverAddr"));
		let back = Config::from_toml(&text).unwrap();
		assert_eq!(back, config);
	}
}

// vim: ts=4
