//! Console reporting for background transfers
//!
//! [`ConsoleReporter`] is the [`TransferEvents`] implementation used by the
//! command-line client. Upload progress redraws a single line in place:
//!
//! ```text
//! Upload Progress: 42% - ---------------------
//! ```

pub mod constants;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::callbacks::{ProgressUpdate, TransferEvents};
use crate::error::ClientError;
use crate::transfer::{TransferKind, TransferReport};

pub use constants::*;

/// Render the progress line for `percent` (without the redraw prefix)
pub fn progress_line(percent: u64) -> String {
	let bar: String =
		std::iter::repeat(BAR_CHAR).take((percent / PERCENT_PER_BAR_CHAR) as usize).collect();
	format!("Upload Progress: {}% - {}", percent, bar)
}

/// Prints transfer events as plain lines
pub struct ConsoleReporter<W: Write + Send = io::Stdout> {
	out: Mutex<W>,
}

impl ConsoleReporter<io::Stdout> {
	pub fn stdout() -> Self {
		ConsoleReporter { out: Mutex::new(io::stdout()) }
	}
}

impl<W: Write + Send> ConsoleReporter<W> {
	pub fn with_writer(writer: W) -> Self {
		ConsoleReporter { out: Mutex::new(writer) }
	}

	pub fn into_inner(self) -> W {
		self.out.into_inner().unwrap_or_else(|e| e.into_inner())
	}

	fn print(&self, text: &str) {
		let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
		let _ = writeln!(out, "{}", text);
		let _ = out.flush();
	}
}

impl<W: Write + Send> TransferEvents for ConsoleReporter<W> {
	fn on_progress(&self, update: &ProgressUpdate) {
		self.print(&format!("{}{}", REDRAW_PREVIOUS_LINE, progress_line(update.percent)));
	}

	fn on_file_done(&self, kind: TransferKind, path: &Path) {
		let verb = if kind.is_upload() { "uploaded" } else { "downloaded" };
		self.print(&format!("File {} has been {} successfully", path.display(), verb));
	}

	fn on_transfer_done(&self, report: &TransferReport) {
		match report.kind {
			TransferKind::UploadDirectory => self.print("Upload directory has finished"),
			TransferKind::DownloadDirectory => {
				self.print(&format!("Finished Downloading {} Path", report.path.display()))
			}
			TransferKind::UploadFile | TransferKind::DownloadFile => {}
		}
	}

	fn on_warning(&self, message: &str) {
		self.print(message);
	}

	fn on_error(&self, kind: TransferKind, error: &ClientError) {
		match (kind, error) {
			(TransferKind::DownloadDirectory, ClientError::UnconfirmedCompletion { .. }) => {
				self.print(&error.to_string())
			}
			(TransferKind::DownloadDirectory, _) => {
				self.print(&format!("{}\nDownload process has been stopped.", error))
			}
			_ => self.print(&error.to_string()),
		}
	}
}


// vim: ts=4
