//! # CloudDrive - Command Line Client
//!
//! Client library for the CloudDrive storage service. Commands travel as
//! JSON envelopes over one long-lived command connection; every file or
//! directory transfer gets its own data connection and runs as a background
//! task, so the command connection stays free while transfers are running.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use clouddrive::channel::Channel;
//! use clouddrive::commands::{connect_tcp, TcpDialer, TransferContext};
//! use clouddrive::config::Config;
//! use clouddrive::progress::ConsoleReporter;
//! use clouddrive::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let stream = connect_tcp(&config.server_addr, config.connect_timeout()).await?;
//!     let ctx = TransferContext::new(
//!         TcpDialer::from_config(&config),
//!         Arc::new(ConsoleReporter::stdout()),
//!         &config,
//!     );
//!     let mut session = Session::new(Channel::new(stream), ctx);
//!     session.dispatch("signin alice secret").await?;
//!     session.dispatch("uploadfile 'notes.txt'").await?;
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Driving a transfer directly
//!
//! ```rust,ignore
//! use clouddrive::transfer::TransferSession;
//!
//! let mut session = TransferSession::new(stream, chunk_size);
//! let bytes = session.upload_file(path, size, false).await?;
//! ```

pub mod args;
pub mod callbacks;
pub mod channel;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;
pub mod protocol;
pub mod session;
pub mod transfer;
pub mod validation;

// Re-export commonly used types and functions
pub use channel::Channel;
pub use config::Config;
pub use error::ClientError;
pub use protocol::{ContentDescriptor, MessageType, ProtocolError, Request, Response};
pub use session::Session;
pub use transfer::{TransferKind, TransferReport, TransferSession};

// vim: ts=4
