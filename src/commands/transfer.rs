//! Transfer commands
//!
//! Each handler checks local preconditions before touching the network, sends
//! the initiating request on the primary channel, reads the chunk size from
//! the acknowledgement, dials a fresh data connection and spawns the transfer.
//! It returns as soon as the task is running, leaving the primary channel
//! free for the next command. The task reports its outcome through the
//! context's [`TransferEvents`] and through its [`TransferHandle`].

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::Dialer;
use crate::args::PathArgs;
use crate::callbacks::TransferEvents;
use crate::channel::Channel;
use crate::config::Config;
use crate::error::ClientError;
use crate::logging::*;
use crate::protocol::{parse_chunk_size, ContentDescriptor, MessageType, Request};
use crate::transfer::{create_empty_file, dir_size, TransferKind, TransferReport, TransferSession};

/// Everything a transfer task needs besides its own arguments
pub struct TransferContext<D> {
	pub dialer: Arc<D>,
	pub events: Arc<dyn TransferEvents>,
	pub idle_timeout: Duration,
	/// Report upload progress and single-file completion
	pub progress: bool,
	pub progress_threshold: u64,
}

impl<D> Clone for TransferContext<D> {
	fn clone(&self) -> Self {
		TransferContext {
			dialer: Arc::clone(&self.dialer),
			events: Arc::clone(&self.events),
			idle_timeout: self.idle_timeout,
			progress: self.progress,
			progress_threshold: self.progress_threshold,
		}
	}
}

impl<D: Dialer> TransferContext<D> {
	pub fn new(dialer: D, events: Arc<dyn TransferEvents>, config: &Config) -> Self {
		TransferContext {
			dialer: Arc::new(dialer),
			events,
			idle_timeout: config.idle_timeout(),
			progress: config.progress,
			progress_threshold: config.progress_threshold,
		}
	}

	fn session(&self, stream: D::Stream, chunk_size: usize) -> TransferSession<D::Stream> {
		TransferSession::new(stream, chunk_size)
			.with_idle_timeout(self.idle_timeout)
			.with_events(Arc::clone(&self.events), self.progress_threshold)
	}
}

/// A running background transfer
pub struct TransferHandle {
	pub id: Uuid,
	pub kind: TransferKind,
	/// Local path the transfer reads from or writes to
	pub label: String,
	join: JoinHandle<Result<TransferReport, ClientError>>,
}

impl std::fmt::Debug for TransferHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransferHandle")
			.field("id", &self.id)
			.field("kind", &self.kind)
			.field("label", &self.label)
			.field("finished", &self.join.is_finished())
			.finish()
	}
}

impl TransferHandle {
	pub fn is_finished(&self) -> bool {
		self.join.is_finished()
	}

	/// Stop the transfer, dropping its connection
	pub fn abort(&self) {
		self.join.abort();
	}

	/// Wait for the transfer to end
	pub async fn wait(self) -> Result<TransferReport, ClientError> {
		self.join.await.map_err(|e| ClientError::Io(io::Error::new(io::ErrorKind::Other, e)))?
	}
}

fn spawn_transfer<F, Fut>(
	kind: TransferKind,
	label: String,
	events: Arc<dyn TransferEvents>,
	run: F,
) -> TransferHandle
where
	F: FnOnce(Uuid) -> Fut,
	Fut: Future<Output = Result<TransferReport, ClientError>> + Send + 'static,
{
	let id = Uuid::new_v4();
	let span = tracing::info_span!("transfer", %id, %kind, path = %label);
	let task = run(id);

	let join = tokio::spawn(
		async move {
			debug!("transfer started");
			let result = task.await;
			match &result {
				Ok(report) => {
					info!(bytes = report.bytes, files = report.files, "transfer finished");
					events.on_transfer_done(report);
				}
				Err(e) => {
					debug!(error = %e, "transfer failed");
					events.on_error(kind, e);
				}
			}
			result
		}
		.instrument(span),
	);

	TransferHandle { id, kind, label, join }
}

/// Last component of a remote path (either separator)
fn remote_basename(remote: &str) -> Result<&str, ClientError> {
	match remote.rsplit(['\\', '/']).find(|part| !part.is_empty()) {
		Some(name) if name != "." && name != ".." => Ok(name),
		_ => Err(ClientError::InvalidArguments {
			message: format!("{:?} does not name a file", remote),
		}),
	}
}

fn local_size(path: &Path) -> Result<std::fs::Metadata, ClientError> {
	std::fs::metadata(path).map_err(|e| match e.kind() {
		io::ErrorKind::NotFound => ClientError::FileNotExist { path: path.to_path_buf() },
		_ => ClientError::ReadFileInfo { path: path.to_path_buf() },
	})
}

fn local_name(path: &Path) -> String {
	path.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}

fn require_local_dir(dir: &Path) -> Result<(), ClientError> {
	if dir.as_os_str().is_empty() || dir.exists() {
		Ok(())
	} else {
		Err(ClientError::PathNotExist { path: dir.to_path_buf() })
	}
}

async fn negotiate<S>(channel: &mut Channel<S>, request: &Request) -> Result<usize, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let reply = channel.request(request).await?;
	parse_chunk_size(&reply).map_err(|_| ClientError::BadChunks { reply })
}

/// `uploadfile <local file> [remote folder]`
pub async fn handle_upload_file<S, D>(
	args: &[String],
	channel: &mut Channel<S>,
	ctx: &TransferContext<D>,
) -> Result<TransferHandle, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
	D: Dialer,
{
	let paths = PathArgs::parse(args)?;
	let path = PathBuf::from(&paths.primary);
	let size = local_size(&path)?.len();

	let descriptor = ContentDescriptor::new(
		local_name(&path),
		paths.secondary.unwrap_or_default(),
		u32::try_from(size).unwrap_or(u32::MAX),
	);
	let request = Request::json(MessageType::UploadFile, &descriptor)?;
	let chunk_size = negotiate(channel, &request).await?;
	debug!(file = %descriptor.name, size, chunk_size, "upload accepted");

	let stream = ctx.dialer.dial().await?;
	let mut session = ctx.session(stream, chunk_size);
	let report = ctx.progress;
	let events = Arc::clone(&ctx.events);

	let label = path.display().to_string();
	Ok(spawn_transfer(TransferKind::UploadFile, label, events, move |id| async move {
		let bytes = session.upload_file(&path, size, report).await?;
		let mut done = TransferReport::new(id, TransferKind::UploadFile, path);
		done.bytes = bytes;
		done.files = 1;
		Ok(done)
	}))
}

/// `downloadfile <remote file> [local folder]`
///
/// A chunk size of zero means the file is empty: it is created locally
/// without opening a data connection.
pub async fn handle_download_file<S, D>(
	args: &[String],
	channel: &mut Channel<S>,
	ctx: &TransferContext<D>,
) -> Result<TransferHandle, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
	D: Dialer,
{
	let paths = PathArgs::parse(args)?;
	let local_dir = PathBuf::from(paths.secondary.unwrap_or_default());
	require_local_dir(&local_dir)?;
	let target = local_dir.join(remote_basename(&paths.primary)?);

	let chunk_size =
		negotiate(channel, &Request::text(MessageType::DownloadFile, &paths.primary)).await?;
	debug!(file = %paths.primary, chunk_size, "download accepted");

	let mut session = if chunk_size == 0 {
		None
	} else {
		let stream = ctx.dialer.dial().await?;
		Some(ctx.session(stream, chunk_size))
	};
	let events = Arc::clone(&ctx.events);
	let report = ctx.progress;

	let label = target.display().to_string();
	Ok(spawn_transfer(TransferKind::DownloadFile, label, Arc::clone(&events), move |id| {
		async move {
			let bytes = match session.as_mut() {
				Some(session) => session.download_file(&target).await?,
				None => {
					create_empty_file(&target).await?;
					0
				}
			};
			if report {
				events.on_file_done(TransferKind::DownloadFile, &target);
			}
			let mut done = TransferReport::new(id, TransferKind::DownloadFile, target);
			done.bytes = bytes;
			done.files = 1;
			Ok(done)
		}
	}))
}

/// `uploaddir <local folder> [remote folder]`
pub async fn handle_upload_directory<S, D>(
	args: &[String],
	channel: &mut Channel<S>,
	ctx: &TransferContext<D>,
) -> Result<TransferHandle, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
	D: Dialer,
{
	let paths = PathArgs::parse(args)?;
	let root = PathBuf::from(&paths.primary);
	if !local_size(&root)?.is_dir() {
		return Err(ClientError::InvalidArguments {
			message: format!("{} is not a directory", root.display()),
		});
	}
	let size = dir_size(&root)?;

	let descriptor =
		ContentDescriptor::new(local_name(&root), paths.secondary.unwrap_or_default(), size);
	channel.request(&Request::json(MessageType::UploadDirectory, &descriptor)?).await?;
	debug!(folder = %descriptor.name, size, "directory upload accepted");

	let stream = ctx.dialer.dial().await?;
	let mut session = ctx.session(stream, 0);
	let events = Arc::clone(&ctx.events);

	let label = root.display().to_string();
	Ok(spawn_transfer(TransferKind::UploadDirectory, label, events, move |id| async move {
		let counts = session.upload_directory(&root).await?;
		let mut done = TransferReport::new(id, TransferKind::UploadDirectory, root);
		done.bytes = session.bytes_transferred();
		done.files = counts.files;
		done.folders = counts.folders;
		Ok(done)
	}))
}

/// `downloaddir <remote folder> [local folder]`
pub async fn handle_download_dir<S, D>(
	args: &[String],
	channel: &mut Channel<S>,
	ctx: &TransferContext<D>,
) -> Result<TransferHandle, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
	D: Dialer,
{
	let paths = PathArgs::parse(args)?;
	let local_dir = PathBuf::from(paths.secondary.unwrap_or_default());
	require_local_dir(&local_dir)?;
	let dest = local_dir.join(remote_basename(&paths.primary)?);
	if dest.exists() {
		return Err(ClientError::PathExists { path: dest });
	}

	channel.request(&Request::text(MessageType::DownloadDir, &paths.primary)).await?;
	debug!(folder = %paths.primary, "directory download accepted");

	let stream = ctx.dialer.dial().await?;
	let mut session = ctx.session(stream, 0);
	let events = Arc::clone(&ctx.events);

	let label = dest.display().to_string();
	Ok(spawn_transfer(TransferKind::DownloadDirectory, label, events, move |id| async move {
		let counts = session.download_directory(&dest).await?;
		let mut done = TransferReport::new(id, TransferKind::DownloadDirectory, dest);
		done.bytes = session.bytes_transferred();
		done.files = counts.files;
		done.folders = counts.folders;
		Ok(done)
	}))
}


// vim: ts=4
