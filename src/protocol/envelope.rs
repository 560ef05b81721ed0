//! Envelope codec
//!
//! Every message on both channels is a JSON object `{"Type": <int>, "Data": <payload>}`.
//! Requests carry an arbitrary JSON payload, responses carry text. The set of
//! message kinds is closed; an unrecognized `Type` decodes to
//! [`ProtocolError::UnknownType`] rather than a transport failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProtocolError;

/// Exact wire form of the Stop-Transmission envelope as the server sends it
/// on a data channel. A chunk read equal to these bytes ends a file body.
pub const STOP_TRANSMISSION_WIRE: &[u8] = br#"{"Type":501,"Data":""}"#;

/// Closed set of message kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
	Login,
	Signup,
	ChangeDirectory,
	CreateFile,
	CreateFolder,
	DeleteContent,
	Rename,
	Show,
	Move,
	Garbage,
	UploadFile,
	DownloadFile,
	UploadDirectory,
	DownloadDir,
	StopTransmission,
	ValidResponse,
	ErrorResponse,
}

impl MessageType {
	/// Numeric tag used on the wire
	pub fn code(self) -> u16 {
		match self {
			MessageType::Login => 101,
			MessageType::Signup => 102,
			MessageType::ChangeDirectory => 301,
			MessageType::CreateFile => 302,
			MessageType::CreateFolder => 303,
			MessageType::DeleteContent => 304,
			MessageType::Rename => 305,
			MessageType::Show => 306,
			MessageType::Move => 307,
			MessageType::Garbage => 308,
			MessageType::UploadFile => 401,
			MessageType::DownloadFile => 402,
			MessageType::UploadDirectory => 403,
			MessageType::DownloadDir => 404,
			MessageType::StopTransmission => 501,
			MessageType::ValidResponse => 200,
			MessageType::ErrorResponse => 999,
		}
	}
}

impl TryFrom<u16> for MessageType {
	type Error = ProtocolError;

	fn try_from(code: u16) -> Result<Self, Self::Error> {
		let kind = match code {
			101 => MessageType::Login,
			102 => MessageType::Signup,
			301 => MessageType::ChangeDirectory,
			302 => MessageType::CreateFile,
			303 => MessageType::CreateFolder,
			304 => MessageType::DeleteContent,
			305 => MessageType::Rename,
			306 => MessageType::Show,
			307 => MessageType::Move,
			308 => MessageType::Garbage,
			401 => MessageType::UploadFile,
			402 => MessageType::DownloadFile,
			403 => MessageType::UploadDirectory,
			404 => MessageType::DownloadDir,
			501 => MessageType::StopTransmission,
			200 => MessageType::ValidResponse,
			999 => MessageType::ErrorResponse,
			other => return Err(ProtocolError::UnknownType(other)),
		};
		Ok(kind)
	}
}

// Wire shapes. `Type` is kept numeric here so unknown kinds survive parsing
// and can be reported as such.
#[derive(Serialize, Deserialize)]
struct RawRequest {
	#[serde(rename = "Type")]
	kind: u16,
	#[serde(rename = "Data", default)]
	data: Value,
}

#[derive(Serialize, Deserialize)]
struct RawResponse {
	#[serde(rename = "Type")]
	kind: u16,
	#[serde(rename = "Data", default)]
	data: Value,
}

/// Client-to-server envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
	pub kind: MessageType,
	pub data: Value,
}

impl Request {
	pub fn new(kind: MessageType, data: Value) -> Self {
		Self { kind, data }
	}

	/// Request with no payload (`"Data": null`)
	pub fn empty(kind: MessageType) -> Self {
		Self { kind, data: Value::Null }
	}

	/// Request carrying a text argument wrapped as `{"Data": "<text>"}`
	pub fn text(kind: MessageType, text: &str) -> Self {
		Self { kind, data: serde_json::json!({ "Data": text }) }
	}

	/// Request carrying a structured payload
	pub fn json<T: Serialize>(kind: MessageType, payload: &T) -> Result<Self, ProtocolError> {
		let data = serde_json::to_value(payload).map_err(|e| ProtocolError::Encode(e.to_string()))?;
		Ok(Self { kind, data })
	}

	/// Text argument of a request built with [`Request::text`]
	pub fn text_arg(&self) -> Option<&str> {
		self.data.get("Data").and_then(Value::as_str)
	}

	pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
		let raw = RawRequest { kind: self.kind.code(), data: self.data.clone() };
		serde_json::to_vec(&raw).map_err(|e| ProtocolError::Encode(e.to_string()))
	}

	pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
		let raw: RawRequest = serde_json::from_slice(bytes)?;
		Ok(Self { kind: MessageType::try_from(raw.kind)?, data: raw.data })
	}
}

/// Server-to-client envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
	pub kind: MessageType,
	pub data: String,
}

impl Response {
	pub fn new(kind: MessageType, data: impl Into<String>) -> Self {
		Self { kind, data: data.into() }
	}

	pub fn valid(data: impl Into<String>) -> Self {
		Self::new(MessageType::ValidResponse, data)
	}

	pub fn error(data: impl Into<String>) -> Self {
		Self::new(MessageType::ErrorResponse, data)
	}

	pub fn stop_transmission() -> Self {
		Self::new(MessageType::StopTransmission, "")
	}

	pub fn is_valid(&self) -> bool {
		self.kind == MessageType::ValidResponse
	}

	pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
		let raw = RawResponse { kind: self.kind.code(), data: Value::String(self.data.clone()) };
		serde_json::to_vec(&raw).map_err(|e| ProtocolError::Encode(e.to_string()))
	}

	/// Decode bytes that must hold exactly one envelope
	pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
		let raw: RawResponse = serde_json::from_slice(bytes)?;
		Self::from_raw(raw)
	}

	/// Decode the envelope at the start of `bytes`, returning it together with
	/// the number of bytes it occupied. Anything after it is left to the caller.
	pub fn decode_prefix(bytes: &[u8]) -> Result<(Self, usize), ProtocolError> {
		let mut stream = serde_json::Deserializer::from_slice(bytes).into_iter::<RawResponse>();
		match stream.next() {
			Some(Ok(raw)) => {
				let consumed = stream.byte_offset();
				Ok((Self::from_raw(raw)?, consumed))
			}
			Some(Err(e)) if e.is_eof() => Err(ProtocolError::Incomplete),
			Some(Err(e)) => Err(e.into()),
			None => Err(ProtocolError::Incomplete),
		}
	}

	fn from_raw(raw: RawResponse) -> Result<Self, ProtocolError> {
		let kind = MessageType::try_from(raw.kind)?;
		let data = match raw.data {
			Value::String(s) => s,
			Value::Null => String::new(),
			other => other.to_string(),
		};
		Ok(Self { kind, data })
	}
}


// vim: ts=4
