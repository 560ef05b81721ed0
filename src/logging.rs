//! Tracing prelude and subscriber setup
//!
//! ```ignore
//! use crate::logging::*;
//!
//! debug!(chunk_size, "upload negotiated");
//! ```

pub use tracing::{debug, error, info, trace, warn};

use tracing_subscriber::EnvFilter;

const QUIET_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,clouddrive=debug";

/// Install the global subscriber.
///
/// Output goes to stderr; stdout belongs to the command prompt and its
/// replies. `RUST_LOG` wins over `verbose` when set:
///
/// ```bash
/// RUST_LOG=clouddrive::transfer=trace clouddrive
/// ```
pub fn init_tracing(verbose: bool) {
	let fallback = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(verbose)
		.with_writer(std::io::stderr)
		.init();
}

// vim: ts=4
