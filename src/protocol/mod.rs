//! CloudDrive wire protocol
//!
//! Envelope codec, content descriptors and reply parsers. Nothing in here
//! touches a socket; see [`crate::channel`] for the transport side.
//!
//! # Example Usage
//!
//! ```ignore
//! use clouddrive::protocol::{MessageType, Request, Response, parse_chunk_size};
//!
//! let bytes = Request::text(MessageType::DownloadFile, "report.pdf").encode()?;
//! let reply = Response::decode(br#"{"Type":200,"Data":"chunks:4096"}"#)?;
//! let chunk_size = parse_chunk_size(&reply.data)?;
//! ```

pub mod content;
pub mod envelope;
pub mod error;
pub mod reply;

pub use content::{ContentDescriptor, REMOTE_SEPARATOR, ROOT_LABEL};
pub use envelope::{MessageType, Request, Response, STOP_TRANSMISSION_WIRE};
pub use error::ProtocolError;
pub use reply::{parse_chunk_size, parse_current_directory};

// vim: ts=4
