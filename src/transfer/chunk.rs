//! Single-file chunk transfer
//!
//! Upload reads the local file `chunk_size` bytes at a time and writes every
//! read in full before the next one. The server already knows the byte count,
//! so nothing marks the end of an upload.
//!
//! Download appends each read to a buffered file writer until one of:
//! - no bytes arrive within the idle timeout,
//! - a read returns exactly the Stop-Transmission envelope,
//! - the peer closes the connection.
//!
//! All three end the body successfully. The writer is flushed once at the end.

use std::io;
use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

use super::session::TransferSession;
use crate::callbacks::ProgressUpdate;
use crate::error::ClientError;
use crate::logging::*;
use crate::protocol::STOP_TRANSMISSION_WIRE;

impl<S> TransferSession<S>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	/// Send the body of the local file at `path`, announced to the server as
	/// `size` bytes. With `report` set, progress updates and a completion event
	/// go to the session's events handler.
	///
	/// Returns the number of bytes sent.
	pub async fn upload_file(
		&mut self,
		path: &Path,
		size: u64,
		report: bool,
	) -> Result<u64, ClientError> {
		let mut file = File::open(path).await.map_err(|e| {
			let err = match e.kind() {
				io::ErrorKind::NotFound => ClientError::FileNotExist { path: path.to_path_buf() },
				_ => ClientError::Io(e),
			};
			self.fail(err)
		})?;

		if self.chunk_size == 0 && size > 0 {
			return Err(self.fail(ClientError::BadChunks { reply: "chunk size 0".to_string() }));
		}
		let mut chunk = vec![0u8; self.chunk_size.max(1)];

		let mut total: u64 = 0;
		let mut since_report: u64 = 0;
		loop {
			let n = match file.read(&mut chunk).await {
				Ok(0) => break,
				Ok(n) => n,
				Err(e) => return Err(self.fail(ClientError::Io(e))),
			};

			if let Err(e) = self.channel.send_chunk(&chunk[..n]).await {
				return Err(self.fail(e));
			}

			total += n as u64;
			since_report += n as u64;
			self.bytes += n as u64;

			if report && since_report >= self.progress_threshold {
				since_report = 0;
				self.events.on_progress(&ProgressUpdate::new(path, total, size));
			}
		}

		debug!(path = %path.display(), bytes = total, "upload body sent");
		if report {
			self.events.on_file_done(super::TransferKind::UploadFile, path);
		}
		Ok(total)
	}

	/// Receive a file body into `path`, replacing any existing file.
	///
	/// Returns the number of bytes written.
	pub async fn download_file(&mut self, path: &Path) -> Result<u64, ClientError> {
		let created = File::create(path)
			.await
			.map_err(|e| ClientError::CreateFile { path: path.to_path_buf(), source: e });
		match created {
			Ok(file) => drop(file),
			Err(e) => return Err(self.fail(e)),
		}

		let file = match OpenOptions::new().write(true).open(path).await {
			Ok(file) => file,
			Err(e) => {
				return Err(self.fail(ClientError::CreateFile { path: path.to_path_buf(), source: e }))
			}
		};
		let mut writer = BufWriter::new(file);

		if self.chunk_size == 0 {
			return Ok(0);
		}
		let mut chunk = vec![0u8; self.chunk_size];

		let mut total: u64 = 0;
		loop {
			let n = match tokio::time::timeout(self.idle_timeout, self.channel.read_raw(&mut chunk)).await
			{
				Err(_) => {
					debug!(path = %path.display(), "idle timeout ends download");
					break;
				}
				Ok(Ok(0)) => {
					debug!(path = %path.display(), "peer closed data channel");
					break;
				}
				Ok(Ok(n)) => n,
				Ok(Err(e)) => return Err(self.fail(ClientError::Receive { source: e })),
			};

			if &chunk[..n] == STOP_TRANSMISSION_WIRE {
				trace!(path = %path.display(), "stop transmission ends download");
				break;
			}

			if let Err(e) = writer.write_all(&chunk[..n]).await {
				return Err(self.fail(ClientError::WriteFile { path: path.to_path_buf(), source: e }));
			}
			total += n as u64;
			self.bytes += n as u64;
		}

		if let Err(e) = writer.flush().await {
			return Err(self.fail(ClientError::Flush { path: path.to_path_buf(), source: e }));
		}
		debug!(path = %path.display(), bytes = total, "download body written");
		Ok(total)
	}
}

/// Create (or truncate) `path` as an empty file
pub async fn create_empty_file(path: &Path) -> Result<(), ClientError> {
	File::create(path)
		.await
		.map(drop)
		.map_err(|e| ClientError::CreateFile { path: path.to_path_buf(), source: e })
}


// vim: ts=4
