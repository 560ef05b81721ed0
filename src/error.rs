//! Error types for CloudDrive client operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::protocol::ProtocolError;
use crate::validation::ValidationError;

/// Main error type for client operations
///
/// Every variant renders as one human-readable line (or short paragraph);
/// the variant and its fields stay available for programmatic handling.
#[derive(Debug)]
pub enum ClientError {
	// === Transport ===
	/// Failed to open a connection
	Connect { addr: String, source: io::Error },

	/// Writing an envelope failed
	Send { source: io::Error },

	/// Reading from a channel failed
	Receive { source: io::Error },

	/// The peer closed the connection while a reply was expected
	Disconnected,

	/// The server reset the primary connection; no further commands can be sent
	ServerUnavailable,

	/// A bounded read on a channel elapsed
	Timeout { secs: u64 },

	// === Protocol ===
	/// Malformed envelope or reply text
	Protocol(ProtocolError),

	/// The server rejected the request; carries its message verbatim
	Server { message: String },

	/// A transfer acknowledgement did not carry a usable chunk size
	BadChunks { reply: String },

	/// A message arrived that the current protocol step does not allow
	UnexpectedMessage { expected: &'static str, got: String },

	// === Local preconditions ===
	/// Wrong number of command arguments
	InvalidArgumentCount { got: usize, expected: usize },

	/// Arguments could not be parsed
	InvalidArguments { message: String },

	/// Local source file or directory is missing
	FileNotExist { path: PathBuf },

	/// Local destination path is missing
	PathNotExist { path: PathBuf },

	/// Local destination path already exists
	PathExists { path: PathBuf },

	/// Metadata of a local entry could not be read
	ReadFileInfo { path: PathBuf },

	// === Transfer ===
	/// A chunk could not be written to the data channel
	SendData { source: io::Error },

	/// A received chunk could not be written to the destination file
	WriteFile { path: PathBuf, source: io::Error },

	/// Buffered file data could not be flushed
	Flush { path: PathBuf, source: io::Error },

	/// Destination file could not be created
	CreateFile { path: PathBuf, source: io::Error },

	/// Destination folder could not be created
	CreateFolder { path: PathBuf, source: io::Error },

	/// A remote path would escape the destination root
	UnsafePath { path: String },

	/// A directory download stopped waiting before the server confirmed the end
	UnconfirmedCompletion { path: PathBuf },

	// === Other ===
	/// Invalid configuration
	Config(ValidationError),

	/// Local I/O error
	Io(io::Error),
}

impl ClientError {
	/// Whether the process cannot continue issuing commands after this error
	pub fn is_fatal(&self) -> bool {
		matches!(self, ClientError::ServerUnavailable)
	}

	/// Whether this error is a bounded read elapsing
	pub fn is_timeout(&self) -> bool {
		matches!(self, ClientError::Timeout { .. })
	}
}

impl fmt::Display for ClientError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ClientError::Connect { addr, source } => write!(
				f,
				"There has been an error connecting to the server at {}.\nPlease check your connection and try again.\n{}",
				addr, source
			),
			ClientError::Send { source } => {
				write!(f, "Error when attempting to send the request to the server: {}", source)
			}
			ClientError::Receive { source } => {
				write!(f, "Error when receiving a response from the server: {}", source)
			}
			ClientError::Disconnected => write!(f, "The server closed the connection"),
			ClientError::ServerUnavailable => {
				write!(f, "Server has been closed.\nPlease try to reconnect in a few moments.")
			}
			ClientError::Timeout { secs } => {
				write!(f, "No response from the server within {} seconds", secs)
			}
			ClientError::Protocol(e) => write!(f, "{}", e),
			ClientError::Server { message } => write!(f, "{}", message),
			ClientError::BadChunks { reply } => write!(
				f,
				"Server has returned wrong type of chunks ({:?}). Please contact the developers",
				reply
			),
			ClientError::UnexpectedMessage { expected, got } => {
				write!(f, "Unexpected message from the server: expected {}, got {}", expected, got)
			}
			ClientError::InvalidArgumentCount { got, expected } => write!(
				f,
				"Incorrect number of arguments. got {}, expected {} arguments\nPlease try again",
				got, expected
			),
			ClientError::InvalidArguments { message } => {
				write!(f, "Invalid arguments: {}\nPlease try again", message)
			}
			ClientError::FileNotExist { path } => {
				write!(f, "File '{}' does not exist on your local machine.", path.display())
			}
			ClientError::PathNotExist { path } => {
				write!(f, "Path '{}' does not exist on your local machine.", path.display())
			}
			ClientError::PathExists { path } => {
				write!(f, "Path '{}' already exists on your local machine.", path.display())
			}
			ClientError::ReadFileInfo { path } => {
				write!(f, "Cannot read file {} info.", path.display())
			}
			ClientError::SendData { source } => {
				write!(f, "Error when attempting to send the data to the server: {}", source)
			}
			ClientError::WriteFile { path, source } => {
				write!(f, "Error writing data on {}: {}", path.display(), source)
			}
			ClientError::Flush { path, source } => {
				write!(f, "Error flushing data to {}: {}", path.display(), source)
			}
			ClientError::CreateFile { path, source } => write!(
				f,
				"Couldn't create file '{}'. The file won't be available: {}",
				path.display(),
				source
			),
			ClientError::CreateFolder { path, source } => write!(
				f,
				"Couldn't create directory '{}'. The folder and its contents might not be available: {}",
				path.display(),
				source
			),
			ClientError::UnsafePath { path } => {
				write!(f, "Refusing remote path {:?}: it escapes the destination directory", path)
			}
			ClientError::UnconfirmedCompletion { path } => write!(
				f,
				"Downloading {} might have finished. Could not verify the download with the server.\nPlease make sure all the contents have been successfully downloaded.",
				path.display()
			),
			ClientError::Config(e) => write!(f, "{}", e),
			ClientError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for ClientError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			ClientError::Connect { source, .. }
			| ClientError::Send { source }
			| ClientError::Receive { source }
			| ClientError::SendData { source }
			| ClientError::WriteFile { source, .. }
			| ClientError::Flush { source, .. }
			| ClientError::CreateFile { source, .. }
			| ClientError::CreateFolder { source, .. } => Some(source),
			ClientError::Protocol(e) => Some(e),
			ClientError::Config(e) => Some(e),
			ClientError::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for ClientError {
	fn from(e: io::Error) -> Self {
		ClientError::Io(e)
	}
}

impl From<ProtocolError> for ClientError {
	fn from(e: ProtocolError) -> Self {
		ClientError::Protocol(e)
	}
}

impl From<ValidationError> for ClientError {
	fn from(e: ValidationError) -> Self {
		ClientError::Config(e)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_only_server_unavailable_is_fatal() {
		assert!(ClientError::ServerUnavailable.is_fatal());
		assert!(!ClientError::Disconnected.is_fatal());
		assert!(!ClientError::Server { message: "nope".to_string() }.is_fatal());
	}

	#[test]
	fn test_server_message_is_verbatim() {
		let err = ClientError::Server { message: "Folder already exists".to_string() };
		assert_eq!(err.to_string(), "Folder already exists");
	}

	#[test]
	fn test_protocol_error_conversion() {
		let err: ClientError = ProtocolError::UnknownType(7).into();
		assert!(matches!(err, ClientError::Protocol(ProtocolError::UnknownType(7))));
		assert!(err.source().is_some());
	}

	#[test]
	fn test_argument_count_display() {
		let err = ClientError::InvalidArgumentCount { got: 1, expected: 2 };
		assert!(err.to_string().contains("got 1, expected 2"));
	}
}

// vim: ts=4
