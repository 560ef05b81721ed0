//! Configuration validation functions

use super::ValidationError;

/// Largest accepted timeout, in seconds
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Validate a `host:port` server address
pub fn validate_addr(name: &str, addr: &str) -> Result<(), ValidationError> {
	let addr = addr.trim();
	if addr.is_empty() {
		return Err(ValidationError::setting(name, "must not be empty"));
	}
	match addr.rsplit_once(':') {
		Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
		_ => Err(ValidationError::setting(
			name,
			format!("must have the form host:port, got {:?}", addr),
		)),
	}
}

/// Validate timeout in seconds
pub fn validate_timeout_secs(name: &str, timeout_secs: u64) -> Result<(), ValidationError> {
	if timeout_secs == 0 {
		return Err(ValidationError::setting(name, "must be greater than 0"));
	}
	if timeout_secs > MAX_TIMEOUT_SECS {
		return Err(ValidationError::setting(
			name,
			format!("too large: {} seconds (max {})", timeout_secs, MAX_TIMEOUT_SECS),
		));
	}
	Ok(())
}

/// Validate the progress reporting threshold
pub fn validate_progress_threshold(bytes: u64) -> Result<(), ValidationError> {
	if bytes == 0 {
		return Err(ValidationError::setting("progressThreshold", "must be greater than 0"));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validate_addr_valid() {
		assert!(validate_addr("serverAddr", "127.0.0.1:12345").is_ok());
		assert!(validate_addr("serverAddr", "clouddriveserver.duckdns.org:12346").is_ok());
	}

	#[test]
	fn test_validate_addr_invalid() {
		assert!(validate_addr("serverAddr", "").is_err());
		assert!(validate_addr("serverAddr", "localhost").is_err());
		assert!(validate_addr("serverAddr", ":80").is_err());
		let err = validate_addr("serverAddr", "host:port").unwrap_err();
		assert!(err.to_string().contains("host:port"));
	}

	#[test]
	fn test_validate_timeout_secs_valid() {
		assert!(validate_timeout_secs("idleTimeoutSecs", 1).is_ok());
		assert!(validate_timeout_secs("idleTimeoutSecs", 10).is_ok());
		assert!(validate_timeout_secs("idleTimeoutSecs", 3600).is_ok());
	}

	#[test]
	fn test_validate_timeout_secs_zero() {
		let result = validate_timeout_secs("idleTimeoutSecs", 0);
		assert!(result.unwrap_err().to_string().contains("greater than 0"));
	}

	#[test]
	fn test_validate_timeout_secs_too_large() {
		let result = validate_timeout_secs("idleTimeoutSecs", 3601);
		assert!(result.unwrap_err().to_string().contains("too large"));
	}

	#[test]
	fn test_validate_progress_threshold() {
		assert!(validate_progress_threshold(1_000_000).is_ok());
		assert!(validate_progress_threshold(0).is_err());
	}
}

// vim: ts=4
