//! Content descriptors exchanged before a file or folder body

use serde::{Deserialize, Serialize};

use super::error::ProtocolError;

/// Label of the remote tree root, also the initial working directory
pub const ROOT_LABEL: &str = "Root:\\";

/// Separator used in remote paths
pub const REMOTE_SEPARATOR: char = '\\';

/// Name, remote path and byte size of an entry about to be created or transferred
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
	/// Entry name including its extension
	pub name: String,
	/// Remote-tree-relative location of the entry
	pub path: String,
	/// Size in bytes
	pub size: u32,
}

impl ContentDescriptor {
	pub fn new(name: impl Into<String>, path: impl Into<String>, size: u32) -> Self {
		Self { name: name.into(), path: path.into(), size }
	}

	/// Parse the descriptor carried as text in a Download-File announcement
	pub fn from_data(data: &str) -> Result<Self, ProtocolError> {
		Ok(serde_json::from_str(data)?)
	}
}


// vim: ts=4
