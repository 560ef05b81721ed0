//! Parsers for the text carried by acknowledgement replies
//!
//! The server answers transfer commands with `<label>:<chunk size>` and
//! directory changes with `...CurrentDirectory:<path>`. The literal text is
//! kept on the wire; callers get typed values.

use super::error::ProtocolError;

const CURRENT_DIRECTORY_MARKER: &str = "CurrentDirectory:";

/// Parse the chunk size from a `<label>:<n>` acknowledgement.
///
/// The text is split on `:` and the second field must be a non-negative integer.
pub fn parse_chunk_size(reply: &str) -> Result<usize, ProtocolError> {
	reply
		.split(':')
		.nth(1)
		.and_then(|field| field.trim().parse::<usize>().ok())
		.ok_or_else(|| ProtocolError::MalformedReply {
			expected: "<label>:<chunk size>",
			reply: reply.to_string(),
		})
}

/// Extract the working directory from a change-directory style reply
pub fn parse_current_directory(reply: &str) -> Result<String, ProtocolError> {
	reply
		.split(CURRENT_DIRECTORY_MARKER)
		.nth(1)
		.map(str::to_string)
		.ok_or_else(|| ProtocolError::MalformedReply {
			expected: "CurrentDirectory:<path>",
			reply: reply.to_string(),
		})
}


// vim: ts=4
