//! Bulk transfers over a secondary connection
//!
//! A [`TransferSession`] owns one data connection for the lifetime of a single
//! file or directory transfer. File bodies move as raw chunks
//! ([`TransferSession::upload_file`], [`TransferSession::download_file`]);
//! directory transfers interleave control envelopes and file bodies on the
//! same connection, told apart only by the order of the exchange.

pub mod chunk;
pub mod directory;
pub mod session;

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

pub use chunk::create_empty_file;
pub use directory::dir_size;
pub use session::TransferSession;

/// Direction and shape of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
	UploadFile,
	DownloadFile,
	UploadDirectory,
	DownloadDirectory,
}

impl TransferKind {
	pub fn is_upload(self) -> bool {
		matches!(self, TransferKind::UploadFile | TransferKind::UploadDirectory)
	}
}

impl fmt::Display for TransferKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			TransferKind::UploadFile => "upload",
			TransferKind::DownloadFile => "download",
			TransferKind::UploadDirectory => "uploaddir",
			TransferKind::DownloadDirectory => "downloaddir",
		};
		write!(f, "{}", name)
	}
}

/// Outcome of a finished transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
	pub id: Uuid,
	pub kind: TransferKind,
	/// Local file or directory the transfer read from or wrote to
	pub path: PathBuf,
	/// File body bytes moved
	pub bytes: u64,
	/// Files moved (1 for single-file transfers)
	pub files: usize,
	/// Folders created, remotely for uploads or locally for downloads
	pub folders: usize,
}

impl TransferReport {
	pub fn new(id: Uuid, kind: TransferKind, path: impl Into<PathBuf>) -> Self {
		TransferReport { id, kind, path: path.into(), bytes: 0, files: 0, folders: 0 }
	}
}

// vim: ts=4
