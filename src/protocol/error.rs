//! Protocol error types
//!
//! Errors raised while encoding or decoding envelopes and while interpreting
//! the text carried inside acknowledgement replies. None of these imply that
//! the underlying connection is closed.

use std::fmt;

/// Protocol error type
#[derive(Debug)]
pub enum ProtocolError {
	/// An envelope could not be serialized
	Encode(String),
	/// Received bytes are not a well-formed envelope
	Decode(String),
	/// The envelope's `Type` is outside the closed set of message kinds
	UnknownType(u16),
	/// The bytes end before the envelope does
	Incomplete,
	/// A single read filled the whole receive buffer without holding a complete envelope
	Truncated { limit: usize },
	/// A reply's text does not have the expected `<label>:<value>` shape
	MalformedReply { expected: &'static str, reply: String },
}

impl fmt::Display for ProtocolError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ProtocolError::Encode(msg) => write!(f, "Failed to encode request: {}", msg),
			ProtocolError::Decode(msg) => {
				write!(f, "Failed to decode the response from the server: {}", msg)
			}
			ProtocolError::UnknownType(t) => write!(f, "Unknown message type {}", t),
			ProtocolError::Incomplete => write!(f, "Response from the server is incomplete"),
			ProtocolError::Truncated { limit } => {
				write!(f, "Response from the server exceeds the {} byte envelope limit", limit)
			}
			ProtocolError::MalformedReply { expected, reply } => {
				write!(f, "Malformed reply (expected {}): {:?}", expected, reply)
			}
		}
	}
}

impl std::error::Error for ProtocolError {}

impl From<serde_json::Error> for ProtocolError {
	fn from(e: serde_json::Error) -> Self {
		ProtocolError::Decode(e.to_string())
	}
}


// vim: ts=4
