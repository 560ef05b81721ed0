//! Envelope channel over one connection
//!
//! A [`Channel`] wraps the stream of either the primary (command) connection or
//! a secondary (data) connection. It sends one encoded envelope per write and
//! receives one envelope per read, with a hard ceiling of
//! [`RECEIVE_BUFFER_SIZE`] bytes per envelope: messages are not reassembled
//! across reads. When one read holds a complete envelope followed by further
//! bytes, the surplus is kept and handed out first by the next read on the
//! channel, so nothing the server sent is dropped or reordered.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ClientError;
use crate::logging::*;
use crate::protocol::{MessageType, ProtocolError, Request, Response};

/// Largest envelope accepted by a single receive
pub const RECEIVE_BUFFER_SIZE: usize = 1024;

/// Envelope channel over a byte stream
pub struct Channel<S> {
	stream: S,
	pending: Vec<u8>,
	reply_timeout: Option<Duration>,
}

impl<S> std::fmt::Debug for Channel<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Channel")
			.field("pending", &self.pending.len())
			.field("reply_timeout", &self.reply_timeout)
			.finish()
	}
}

impl<S> Channel<S>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	pub fn new(stream: S) -> Self {
		Channel { stream, pending: Vec::new(), reply_timeout: None }
	}

	/// Bound every [`Channel::receive`] by `timeout` (`None` waits forever)
	pub fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.reply_timeout = timeout;
		self
	}

	/// Write one envelope in a single write.
	///
	/// A peer that has gone away (reset, aborted, or a closed pipe) becomes
	/// [`ClientError::ServerUnavailable`].
	pub async fn send(&mut self, request: &Request) -> Result<(), ClientError> {
		let bytes = request.encode()?;
		trace!(kind = ?request.kind, len = bytes.len(), "send envelope");
		self.write_bytes(&bytes).await.map_err(|e| match e.kind() {
			io::ErrorKind::ConnectionReset
			| io::ErrorKind::ConnectionAborted
			| io::ErrorKind::BrokenPipe => ClientError::ServerUnavailable,
			_ => ClientError::Send { source: e },
		})
	}

	/// Write one raw chunk of file data
	pub async fn send_chunk(&mut self, chunk: &[u8]) -> Result<(), ClientError> {
		self.write_bytes(chunk).await.map_err(|e| ClientError::SendData { source: e })
	}

	async fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
		self.stream.write_all(bytes).await?;
		self.stream.flush().await
	}

	/// Receive one envelope, honoring the reply timeout if one is set
	pub async fn receive(&mut self) -> Result<Response, ClientError> {
		self.receive_once(self.reply_timeout).await
	}

	/// Receive one envelope, failing with [`ClientError::Timeout`] when no
	/// bytes arrive within `limit`. Held bytes survive the timeout.
	pub async fn receive_within(&mut self, limit: Duration) -> Result<Response, ClientError> {
		self.receive_once(Some(limit)).await
	}

	async fn receive_once(&mut self, limit: Option<Duration>) -> Result<Response, ClientError> {
		let mut buf = vec![0u8; RECEIVE_BUFFER_SIZE];
		let from_pending = !self.pending.is_empty();
		let mut filled = if from_pending {
			self.take_pending(&mut buf)
		} else {
			self.read_stream(&mut buf, limit).await?
		};

		let mut decoded = Response::decode_prefix(&buf[..filled]);
		// Leftover bytes may hold only the start of the next envelope
		if from_pending && filled < RECEIVE_BUFFER_SIZE {
			if let Err(ProtocolError::Incomplete) = decoded {
				match self.read_stream(&mut buf[filled..], limit).await {
					Ok(n) => filled += n,
					Err(e) => {
						self.hold(&buf[..filled]);
						return Err(e);
					}
				}
				decoded = Response::decode_prefix(&buf[..filled]);
			}
		}

		match decoded {
			Ok((response, used)) => {
				if used < filled {
					self.hold(&buf[used..filled]);
				}
				trace!(kind = ?response.kind, len = used, "received envelope");
				Ok(response)
			}
			Err(ProtocolError::Incomplete) if filled == RECEIVE_BUFFER_SIZE => {
				Err(ProtocolError::Truncated { limit: RECEIVE_BUFFER_SIZE }.into())
			}
			Err(ProtocolError::Incomplete) => Err(ProtocolError::Decode(format!(
				"incomplete envelope: {:?}",
				String::from_utf8_lossy(&buf[..filled])
			))
			.into()),
			Err(e) => Err(e.into()),
		}
	}

	async fn read_stream(
		&mut self,
		buf: &mut [u8],
		limit: Option<Duration>,
	) -> Result<usize, ClientError> {
		let read = match limit {
			Some(limit) => match tokio::time::timeout(limit, self.stream.read(buf)).await {
				Ok(read) => read,
				Err(_) => return Err(ClientError::Timeout { secs: limit.as_secs() }),
			},
			None => self.stream.read(buf).await,
		};
		match read {
			Ok(0) => Err(ClientError::Disconnected),
			Ok(n) => Ok(n),
			Err(e) if e.kind() == io::ErrorKind::ConnectionReset => Err(ClientError::Disconnected),
			Err(e) => Err(ClientError::Receive { source: e }),
		}
	}

	/// Put `bytes` back in front of anything already held
	fn hold(&mut self, bytes: &[u8]) {
		let mut held = bytes.to_vec();
		held.append(&mut self.pending);
		self.pending = held;
	}

	fn take_pending(&mut self, buf: &mut [u8]) -> usize {
		let n = self.pending.len().min(buf.len());
		buf[..n].copy_from_slice(&self.pending[..n]);
		self.pending.drain(..n);
		n
	}

	/// Read raw bytes, serving any bytes left over from an earlier receive first.
	///
	/// Returns `Ok(0)` when the peer has closed the connection.
	pub async fn read_raw(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if !self.pending.is_empty() {
			return Ok(self.take_pending(buf));
		}
		self.stream.read(buf).await
	}

	/// Send `request` and wait for its reply.
	///
	/// A `ValidResponse` yields its text; an `ErrorResponse` yields
	/// [`ClientError::Server`] carrying the server's message verbatim.
	pub async fn request(&mut self, request: &Request) -> Result<String, ClientError> {
		self.send(request).await?;
		let response = self.receive().await?;
		into_reply(response)
	}

	/// Send `request`, then receive the raw reply envelope only when `wait` is set
	pub async fn send_request_info(
		&mut self,
		request: &Request,
		wait: bool,
	) -> Result<Option<Response>, ClientError> {
		self.send(request).await?;
		if !wait {
			return Ok(None);
		}
		self.receive().await.map(Some)
	}
}

/// Map a reply envelope to its text or the server's rejection
pub fn into_reply(response: Response) -> Result<String, ClientError> {
	match response.kind {
		MessageType::ValidResponse => Ok(response.data),
		MessageType::ErrorResponse => Err(ClientError::Server { message: response.data }),
		other => Err(ClientError::UnexpectedMessage {
			expected: "ValidResponse or ErrorResponse",
			got: format!("{:?}", other),
		}),
	}
}


// vim: ts=4
