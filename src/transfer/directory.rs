//! Directory transfers
//!
//! Both directions run over a single data connection that carries control
//! envelopes and raw file bodies alike. What comes next on the wire is always
//! known from the message just handled:
//!
//! Upload, per entry below the root (parents before children):
//! - folder: Create-Folder `{"Data": <relative path>}`, must be answered Valid
//! - file: Upload-File with its descriptor, answered `<label>:<chunk size>`,
//!   then the raw body
//!
//! followed by one Stop-Transmission once the walk is over.
//!
//! Download, until Stop-Transmission:
//! - Create-Folder `<relative path>`: create it, failures only warn
//! - Download-File `<descriptor json>`: one more reply with the chunk size,
//!   then the raw body ended by its own Stop-Transmission
//!   (empty files have no body)

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncWrite};
use walkdir::WalkDir;

use super::chunk::create_empty_file;
use super::session::TransferSession;
use crate::channel::into_reply;
use crate::error::ClientError;
use crate::logging::*;
use crate::protocol::{
	parse_chunk_size, ContentDescriptor, MessageType, Request, Response, REMOTE_SEPARATOR,
	ROOT_LABEL,
};
use crate::validation::{local_to_remote, remote_to_local};

/// Entries handled by a directory transfer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeCounts {
	pub files: usize,
	pub folders: usize,
}

impl<S> TransferSession<S>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	/// Upload every entry below `root`, then signal the end of the tree.
	///
	/// The first failure aborts the walk. Stop-Transmission is sent either way.
	pub async fn upload_directory(&mut self, root: &Path) -> Result<TreeCounts, ClientError> {
		let walked = self.upload_tree(root).await;
		let stopped = self
			.channel
			.send_request_info(&Request::empty(MessageType::StopTransmission), false)
			.await;

		let counts = match walked {
			Ok(counts) => counts,
			Err(e) => return Err(self.fail(e)),
		};
		if let Err(e) = stopped {
			return Err(self.fail(e));
		}
		debug!(root = %root.display(), files = counts.files, folders = counts.folders, "directory uploaded");
		Ok(counts)
	}

	async fn upload_tree(&mut self, root: &Path) -> Result<TreeCounts, ClientError> {
		let entries = WalkDir::new(root)
			.follow_links(false)
			.min_depth(1)
			.sort_by_file_name()
			.into_iter()
			.collect::<Result<Vec<_>, _>>()
			.map_err(|e| ClientError::Io(io::Error::from(e)))?;

		let mut counts = TreeCounts::default();
		for entry in entries {
			let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
			let file_type = entry.file_type();

			if file_type.is_dir() {
				let remote = local_to_remote(rel);
				trace!(folder = %remote, "create remote folder");
				self.channel.request(&Request::text(MessageType::CreateFolder, &remote)).await?;
				counts.folders += 1;
			} else if file_type.is_file() {
				let size = entry
					.metadata()
					.map_err(|_| ClientError::ReadFileInfo { path: entry.path().to_path_buf() })?
					.len();
				let parent = rel.parent().unwrap_or_else(|| Path::new(""));
				let descriptor = ContentDescriptor::new(
					entry.file_name().to_string_lossy(),
					local_to_remote(parent),
					u32::try_from(size).unwrap_or(u32::MAX),
				);
				trace!(file = %descriptor.name, path = %descriptor.path, size, "upload nested file");

				let reply = self.channel.request(&Request::json(MessageType::UploadFile, &descriptor)?).await?;
				self.chunk_size =
					parse_chunk_size(&reply).map_err(|_| ClientError::BadChunks { reply })?;
				self.upload_file(entry.path(), size, false).await?;
				counts.files += 1;
			} else {
				debug!(path = %entry.path().display(), "skipping entry that is neither file nor folder");
			}
		}
		Ok(counts)
	}

	/// Receive a tree announced by the server into the new directory `dest`
	pub async fn download_directory(&mut self, dest: &Path) -> Result<TreeCounts, ClientError> {
		match tokio::fs::create_dir(dest).await {
			Ok(()) => {}
			Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
			Err(e) => {
				return Err(self.fail(ClientError::CreateFolder { path: dest.to_path_buf(), source: e }))
			}
		}

		let mut counts = TreeCounts::default();
		loop {
			let response = self.next_envelope(dest).await?;
			match response.kind {
				MessageType::CreateFolder => match create_folder(dest, &response.data).await {
					Ok(()) => counts.folders += 1,
					Err(e) => {
						debug!(error = %e, "folder not created");
						self.events.on_warning(&e.to_string());
					}
				},
				MessageType::DownloadFile => {
					if let Err(e) = self.receive_file(dest, &response.data).await {
						return Err(self.fail(e));
					}
					counts.files += 1;
				}
				MessageType::StopTransmission => break,
				MessageType::ErrorResponse => {
					return Err(self.fail(ClientError::Server { message: response.data }));
				}
				other => debug!(kind = ?other, "ignoring message during directory download"),
			}
		}
		debug!(dest = %dest.display(), files = counts.files, folders = counts.folders, "directory downloaded");
		Ok(counts)
	}

	async fn next_envelope(&mut self, dest: &Path) -> Result<Response, ClientError> {
		match self.channel.receive_within(self.idle_timeout).await {
			Ok(response) => Ok(response),
			Err(e) if e.is_timeout() => {
				Err(self.fail(ClientError::UnconfirmedCompletion { path: dest.to_path_buf() }))
			}
			Err(e) => Err(self.fail(e)),
		}
	}

	async fn receive_file(&mut self, dest: &Path, data: &str) -> Result<(), ClientError> {
		let descriptor = ContentDescriptor::from_data(data)?;
		let remote = format!("{}{}{}", descriptor.path, REMOTE_SEPARATOR, descriptor.name);
		let target = local_entry(dest, &remote)?;

		let reply = into_reply(self.next_envelope(dest).await?)?;
		let chunk_size = parse_chunk_size(&reply).map_err(|_| ClientError::BadChunks { reply })?;

		if descriptor.size > 0 {
			self.chunk_size = chunk_size;
			self.download_file(&target).await?;
		} else {
			create_empty_file(&target).await?;
		}
		trace!(file = %target.display(), size = descriptor.size, "nested file received");
		Ok(())
	}
}

/// Map a remote tree path under `dest`, ignoring a leading root label
fn local_entry(dest: &Path, remote: &str) -> Result<PathBuf, ClientError> {
	let relative = remote.strip_prefix(ROOT_LABEL).unwrap_or(remote);
	remote_to_local(dest, relative).map_err(|_| ClientError::UnsafePath { path: remote.to_string() })
}

async fn create_folder(dest: &Path, remote: &str) -> Result<(), ClientError> {
	let path = local_entry(dest, remote)?;
	tokio::fs::create_dir(&path).await.map_err(|e| ClientError::CreateFolder { path, source: e })
}

/// Total size of the regular files under `path`, saturating at `u32::MAX`
pub fn dir_size(path: &Path) -> Result<u32, ClientError> {
	let mut total: u64 = 0;
	for entry in WalkDir::new(path).follow_links(false) {
		let entry = entry.map_err(|_| ClientError::ReadFileInfo { path: path.to_path_buf() })?;
		if entry.file_type().is_file() {
			let meta = entry
				.metadata()
				.map_err(|_| ClientError::ReadFileInfo { path: entry.path().to_path_buf() })?;
			total = total.saturating_add(meta.len());
		}
	}
	Ok(u32::try_from(total).unwrap_or(u32::MAX))
}


// vim: ts=4
