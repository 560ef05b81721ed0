//! Command handlers
//!
//! One entry point per user command. Every handler takes the command's
//! arguments (without the command word) and the primary channel, performs
//! exactly one request/response exchange on it, and returns either a value
//! for display or an error. Transfer handlers additionally open a data
//! connection through a [`Dialer`] and hand the transfer to a background task.

pub mod auth;
pub mod files;
pub mod transfer;

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::config::Config;
use crate::error::ClientError;
use crate::logging::*;

pub use auth::{handle_signin, handle_signup};
pub use files::{
	handle_change_directory, handle_create, handle_garbage, handle_move, handle_remove,
	handle_rename, handle_show, CreateKind,
};
pub use transfer::{
	handle_download_dir, handle_download_file, handle_upload_directory, handle_upload_file,
	TransferContext, TransferHandle,
};

/// Opens the secondary connection used by one transfer
#[async_trait]
pub trait Dialer: Send + Sync {
	type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

	async fn dial(&self) -> Result<Self::Stream, ClientError>;
}

/// Dials the bulk-transfer endpoint over TCP
#[derive(Debug, Clone)]
pub struct TcpDialer {
	addr: String,
	timeout: Duration,
}

impl TcpDialer {
	pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
		TcpDialer { addr: addr.into(), timeout }
	}

	pub fn from_config(config: &Config) -> Self {
		Self::new(config.transfer_addr.clone(), config.connect_timeout())
	}

	pub fn addr(&self) -> &str {
		&self.addr
	}
}

#[async_trait]
impl Dialer for TcpDialer {
	type Stream = TcpStream;

	async fn dial(&self) -> Result<TcpStream, ClientError> {
		connect_tcp(&self.addr, self.timeout).await
	}
}

/// Connect to `addr`, giving up after `timeout`
pub async fn connect_tcp(addr: &str, timeout: Duration) -> Result<TcpStream, ClientError> {
	debug!(addr, "connecting");
	match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
		Ok(Ok(stream)) => Ok(stream),
		Ok(Err(e)) => Err(ClientError::Connect { addr: addr.to_string(), source: e }),
		Err(_) => Err(ClientError::Connect {
			addr: addr.to_string(),
			source: io::Error::new(io::ErrorKind::TimedOut, "connection timed out"),
		}),
	}
}


// vim: ts=4
