//! Per-transfer session state

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::callbacks::{NoEvents, TransferEvents};
use crate::channel::Channel;
use crate::config::{DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_PROGRESS_THRESHOLD};
use crate::error::ClientError;

/// One secondary connection plus the bookkeeping of the transfer using it.
///
/// Only the task that created a session touches it; it is dropped (closing
/// the connection) when the transfer ends.
pub struct TransferSession<S> {
	pub(crate) channel: Channel<S>,
	pub(crate) chunk_size: usize,
	pub(crate) bytes: u64,
	pub(crate) valid: bool,
	pub(crate) idle_timeout: Duration,
	pub(crate) events: Arc<dyn TransferEvents>,
	pub(crate) progress_threshold: u64,
}

impl<S> TransferSession<S>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	pub fn new(stream: S, chunk_size: usize) -> Self {
		Self::from_channel(Channel::new(stream), chunk_size)
	}

	pub fn from_channel(channel: Channel<S>, chunk_size: usize) -> Self {
		TransferSession {
			channel,
			chunk_size,
			bytes: 0,
			valid: true,
			idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
			events: Arc::new(NoEvents),
			progress_threshold: DEFAULT_PROGRESS_THRESHOLD,
		}
	}

	/// Deadline applied before every read on the data channel
	pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
		self.idle_timeout = idle_timeout;
		self
	}

	/// Report progress and completion to `events`, one progress update per
	/// `threshold` bytes read
	pub fn with_events(mut self, events: Arc<dyn TransferEvents>, threshold: u64) -> Self {
		self.events = events;
		self.progress_threshold = threshold.max(1);
		self
	}

	pub fn chunk_size(&self) -> usize {
		self.chunk_size
	}

	/// Body bytes moved so far across every file of this session
	pub fn bytes_transferred(&self) -> u64 {
		self.bytes
	}

	/// False once any step of the transfer has failed
	pub fn is_valid(&self) -> bool {
		self.valid
	}

	pub(crate) fn fail(&mut self, err: ClientError) -> ClientError {
		self.valid = false;
		err
	}
}


// vim: ts=4
