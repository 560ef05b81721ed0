//! Callback traits for progress reporting and transfer events

use std::path::{Path, PathBuf};

use crate::error::ClientError;
use crate::transfer::{TransferKind, TransferReport};

// Type aliases to reduce complexity
type ProgressFn = dyn Fn(&ProgressUpdate) + Send + Sync;
type FileDoneFn = dyn Fn(TransferKind, &Path) + Send + Sync;
type TransferDoneFn = dyn Fn(&TransferReport) + Send + Sync;
type WarningFn = dyn Fn(&str) + Send + Sync;
type ErrorFn = dyn Fn(TransferKind, &ClientError) + Send + Sync;

/// Upload progress of a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
	/// File being uploaded
	pub path: PathBuf,

	/// Bytes read from the file so far
	pub bytes_transferred: u64,

	/// Size of the file announced to the server
	pub bytes_total: u64,

	/// `bytes_transferred * 100 / bytes_total`, rounded down
	pub percent: u64,
}

impl ProgressUpdate {
	pub fn new(path: &Path, bytes_transferred: u64, bytes_total: u64) -> Self {
		let percent = if bytes_total == 0 { 100 } else { bytes_transferred * 100 / bytes_total };
		ProgressUpdate { path: path.to_path_buf(), bytes_transferred, bytes_total, percent }
	}
}

/// Observer of background transfers.
///
/// Every method has an empty default; implementations pick what they need.
/// Calls come from transfer tasks, so implementations must be thread safe.
pub trait TransferEvents: Send + Sync {
	/// Called each time another threshold's worth of bytes has been read
	fn on_progress(&self, _update: &ProgressUpdate) {}

	/// Called when a top-level single-file transfer completes
	fn on_file_done(&self, _kind: TransferKind, _path: &Path) {}

	/// Called when a transfer task finishes successfully
	fn on_transfer_done(&self, _report: &TransferReport) {}

	/// Called on a non-fatal problem inside a transfer (e.g. a folder that
	/// could not be created during a directory download)
	fn on_warning(&self, _message: &str) {}

	/// Called when a transfer task fails
	fn on_error(&self, _kind: TransferKind, _error: &ClientError) {}
}

/// Default events handler that does nothing
pub struct NoEvents;

impl TransferEvents for NoEvents {}

/// Builder for event handlers using function closures
pub struct EventsBuilder {
	progress: Option<Box<ProgressFn>>,
	file_done: Option<Box<FileDoneFn>>,
	transfer_done: Option<Box<TransferDoneFn>>,
	warning: Option<Box<WarningFn>>,
	error: Option<Box<ErrorFn>>,
}

impl EventsBuilder {
	pub fn new() -> Self {
		EventsBuilder { progress: None, file_done: None, transfer_done: None, warning: None, error: None }
	}

	pub fn on_progress<F>(mut self, callback: F) -> Self
	where
		F: Fn(&ProgressUpdate) + Send + Sync + 'static,
	{
		self.progress = Some(Box::new(callback));
		self
	}

	pub fn on_file_done<F>(mut self, callback: F) -> Self
	where
		F: Fn(TransferKind, &Path) + Send + Sync + 'static,
	{
		self.file_done = Some(Box::new(callback));
		self
	}

	pub fn on_transfer_done<F>(mut self, callback: F) -> Self
	where
		F: Fn(&TransferReport) + Send + Sync + 'static,
	{
		self.transfer_done = Some(Box::new(callback));
		self
	}

	pub fn on_warning<F>(mut self, callback: F) -> Self
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.warning = Some(Box::new(callback));
		self
	}

	pub fn on_error<F>(mut self, callback: F) -> Self
	where
		F: Fn(TransferKind, &ClientError) + Send + Sync + 'static,
	{
		self.error = Some(Box::new(callback));
		self
	}

	pub fn build(self) -> ClosureEvents {
		ClosureEvents {
			progress: self.progress,
			file_done: self.file_done,
			transfer_done: self.transfer_done,
			warning: self.warning,
			error: self.error,
		}
	}
}

impl Default for EventsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Events handler assembled by [`EventsBuilder`]
pub struct ClosureEvents {
	progress: Option<Box<ProgressFn>>,
	file_done: Option<Box<FileDoneFn>>,
	transfer_done: Option<Box<TransferDoneFn>>,
	warning: Option<Box<WarningFn>>,
	error: Option<Box<ErrorFn>>,
}

impl TransferEvents for ClosureEvents {
	fn on_progress(&self, update: &ProgressUpdate) {
		if let Some(ref callback) = self.progress {
			callback(update);
		}
	}

	fn on_file_done(&self, kind: TransferKind, path: &Path) {
		if let Some(ref callback) = self.file_done {
			callback(kind, path);
		}
	}

	fn on_transfer_done(&self, report: &TransferReport) {
		if let Some(ref callback) = self.transfer_done {
			callback(report);
		}
	}

	fn on_warning(&self, message: &str) {
		if let Some(ref callback) = self.warning {
			callback(message);
		}
	}

	fn on_error(&self, kind: TransferKind, error: &ClientError) {
		if let Some(ref callback) = self.error {
			callback(kind, error);
		}
	}
}


// vim: ts=4
