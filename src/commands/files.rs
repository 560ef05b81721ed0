//! Remote file management commands

use tokio::io::{AsyncRead, AsyncWrite};

use crate::args::PathArgs;
use crate::channel::Channel;
use crate::error::ClientError;
use crate::protocol::{parse_current_directory, MessageType, Request};

/// What `newfile` / `newdir` create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
	File,
	Folder,
}

impl CreateKind {
	fn message_type(self) -> MessageType {
		match self {
			CreateKind::File => MessageType::CreateFile,
			CreateKind::Folder => MessageType::CreateFolder,
		}
	}
}

fn require_args(args: &[String]) -> Result<String, ClientError> {
	if args.is_empty() {
		return Err(ClientError::InvalidArgumentCount { got: 0, expected: 1 });
	}
	Ok(args.join(" "))
}

/// `cd <path>`: returns the new working directory reported by the server.
///
/// A reply without the `CurrentDirectory:` marker is an error and the
/// caller's working directory must stay as it was.
pub async fn handle_change_directory<S>(
	args: &[String],
	channel: &mut Channel<S>,
) -> Result<String, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let path = require_args(args)?;
	let reply = channel.request(&Request::text(MessageType::ChangeDirectory, &path)).await?;
	Ok(parse_current_directory(&reply)?)
}

/// `garbage`: jump to the garbage folder, returns the new working directory
pub async fn handle_garbage<S>(channel: &mut Channel<S>) -> Result<String, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let reply = channel.request(&Request::empty(MessageType::Garbage)).await?;
	Ok(parse_current_directory(&reply)?)
}

/// `newfile <name>` / `newdir <name>`
pub async fn handle_create<S>(
	kind: CreateKind,
	args: &[String],
	channel: &mut Channel<S>,
) -> Result<(), ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let name = require_args(args)?;
	channel.request(&Request::text(kind.message_type(), &name)).await?;
	Ok(())
}

/// `rm <name>`
pub async fn handle_remove<S>(args: &[String], channel: &mut Channel<S>) -> Result<(), ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let name = require_args(args)?;
	channel.request(&Request::text(MessageType::DeleteContent, &name)).await?;
	Ok(())
}

async fn send_path_pair<S>(
	kind: MessageType,
	args: &[String],
	channel: &mut Channel<S>,
) -> Result<(), ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let (first, second) = PathArgs::parse_pair(args)?;
	let data = PathArgs::quoted_pair(&first, &second);
	channel.request(&Request::text(kind, &data)).await?;
	Ok(())
}

/// `rename <old> <new>`
pub async fn handle_rename<S>(args: &[String], channel: &mut Channel<S>) -> Result<(), ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	send_path_pair(MessageType::Rename, args, channel).await
}

/// `move <path> <destination>`
pub async fn handle_move<S>(args: &[String], channel: &mut Channel<S>) -> Result<(), ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	send_path_pair(MessageType::Move, args, channel).await
}

/// `ls [path]`: returns the listing text verbatim
pub async fn handle_show<S>(args: &[String], channel: &mut Channel<S>) -> Result<String, ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let request = if args.is_empty() {
		Request::empty(MessageType::Show)
	} else {
		Request::text(MessageType::Show, &args.join(" "))
	};
	channel.request(&request).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::protocol::Response;
	use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	/// Answer one request with `reply`, handing the request back
	fn answer_once(mut server: DuplexStream, reply: Response) -> tokio::task::JoinHandle<Request> {
		tokio::spawn(async move {
			let mut buf = [0u8; 1024];
			let n = server.read(&mut buf).await.unwrap();
			server.write_all(&reply.encode().unwrap()).await.unwrap();
			Request::decode(&buf[..n]).unwrap()
		})
	}

	#[tokio::test]
	async fn test_change_directory_joins_arguments() {
		let (client, server) = duplex(4096);
		let mut channel = Channel::new(client);
		let srv = answer_once(server, Response::valid("CurrentDirectory:Root:\\my docs"));

		let path = handle_change_directory(&strings(&["my", "docs"]), &mut channel).await.unwrap();
		assert_eq!(path, "Root:\\my docs");
		let req = srv.await.unwrap();
		assert_eq!(req.kind, MessageType::ChangeDirectory);
		assert_eq!(req.text_arg(), Some("my docs"));
	}

	#[tokio::test]
	async fn test_garbage_sends_no_data() {
		let (client, server) = duplex(4096);
		let mut channel = Channel::new(client);
		let srv = answer_once(server, Response::valid("CurrentDirectory:Root:\\Garbage"));

		assert_eq!(handle_garbage(&mut channel).await.unwrap(), "Root:\\Garbage");
		let req = srv.await.unwrap();
		assert_eq!(req.kind, MessageType::Garbage);
		assert!(req.data.is_null());
	}

	#[tokio::test]
	async fn test_rename_quotes_both_paths() {
		let (client, server) = duplex(4096);
		let mut channel = Channel::new(client);
		let srv = answer_once(server, Response::valid("renamed"));

		handle_rename(&strings(&["'old", "name'", "new"]), &mut channel).await.unwrap();
		let req = srv.await.unwrap();
		assert_eq!(req.kind, MessageType::Rename);
		assert_eq!(req.text_arg(), Some("'old name' 'new'"));
	}

	#[tokio::test]
	async fn test_create_folder_and_error_reply() {
		let (client, server) = duplex(4096);
		let mut channel = Channel::new(client);
		let srv = answer_once(server, Response::error("Folder already exists"));

		let err = handle_create(CreateKind::Folder, &strings(&["docs"]), &mut channel).await.unwrap_err();
		assert_eq!(err.to_string(), "Folder already exists");
		assert_eq!(srv.await.unwrap().kind, MessageType::CreateFolder);
	}

	#[tokio::test]
	async fn test_show_without_path() {
		let (client, server) = duplex(4096);
		let mut channel = Channel::new(client);
		let srv = answer_once(server, Response::valid("a.txt\nb.txt"));

		assert_eq!(handle_show(&[], &mut channel).await.unwrap(), "a.txt\nb.txt");
		assert!(srv.await.unwrap().data.is_null());
	}

	#[tokio::test]
	async fn test_missing_arguments_send_nothing() {
		let (client, _server) = duplex(64);
		let mut channel = Channel::new(client);
		assert!(matches!(
			handle_remove(&[], &mut channel).await.unwrap_err(),
			ClientError::InvalidArgumentCount { got: 0, expected: 1 }
		));
		assert!(matches!(
			handle_move(&strings(&["a"]), &mut channel).await.unwrap_err(),
			ClientError::InvalidArgumentCount { got: 1, expected: 2 }
		));
	}
}

// vim: ts=4
