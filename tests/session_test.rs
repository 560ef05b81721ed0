//! Interactive session against a scripted command server

use std::sync::Arc;
use std::time::Duration;

use clouddrive::callbacks::NoEvents;
use clouddrive::commands::{TcpDialer, TransferContext};
use clouddrive::config::Config;
use clouddrive::error::ClientError;
use clouddrive::protocol::{parse_chunk_size, MessageType, ProtocolError, Request, Response};
use clouddrive::session::{Session, HELP};
use clouddrive::Channel;
use serde_json::json;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

type TestSession = Session<DuplexStream, TcpDialer>;

/// Answer one request per entry in `replies`, returning the requests seen
fn script(mut server: DuplexStream, replies: Vec<Vec<u8>>) -> JoinHandle<Vec<Request>> {
	tokio::spawn(async move {
		let mut seen = Vec::new();
		let mut buf = vec![0u8; 1024];
		for reply in replies {
			let n = server.read(&mut buf).await.unwrap();
			seen.push(Request::decode(&buf[..n]).unwrap());
			server.write_all(&reply).await.unwrap();
		}
		seen
	})
}

fn valid(text: &str) -> Vec<u8> {
	Response::valid(text).encode().unwrap()
}

fn session(client: DuplexStream) -> TestSession {
	// nothing in these tests dials
	let dialer = TcpDialer::new("127.0.0.1:9", Duration::from_secs(1));
	let ctx = TransferContext::new(dialer, Arc::new(NoEvents), &Config::default());
	Session::new(Channel::new(client), ctx)
}

#[tokio::test]
async fn test_signin_then_cd_updates_prompt() {
	let (client, server) = duplex(4096);
	let srv = script(server, vec![valid("Welcome"), valid("Changed. CurrentDirectory:Root:\\docs")]);
	let mut session = session(client);
	assert_eq!(session.prompt(), ">> ");

	assert_eq!(session.dispatch("signin alice pw").await.unwrap(), "Successfully signed in!\n");
	assert_eq!(session.prompt(), "Root:\\>> ");

	assert_eq!(session.dispatch("cd docs").await.unwrap(), "");
	assert_eq!(session.prompt(), "Root:\\docs>> ");

	let seen = srv.await.unwrap();
	assert_eq!(seen[0].kind, MessageType::Login);
	assert_eq!(seen[0].data, json!({"username": "alice", "password": "pw", "email": ""}));
	assert_eq!(seen[1], Request::text(MessageType::ChangeDirectory, "docs"));
}

#[tokio::test]
async fn test_signup_sends_all_fields() {
	let (client, server) = duplex(4096);
	let srv = script(server, vec![valid("Created")]);
	let mut session = session(client);

	let out = session.dispatch("SIGNUP bob hunter2 bob@example.com").await.unwrap();
	assert_eq!(out, "Successfully signed up!\n");
	assert_eq!(session.current_path().get(), Some("Root:\\"));

	let seen = srv.await.unwrap();
	assert_eq!(seen[0].kind, MessageType::Signup);
	assert_eq!(seen[0].data["email"], "bob@example.com");
}

#[tokio::test]
async fn test_cd_reply_without_marker_keeps_path() {
	let (client, server) = duplex(4096);
	let srv = script(server, vec![valid("ok"), valid("Root:\\docs")]);
	let mut session = session(client);
	session.dispatch("signin alice pw").await.unwrap();

	let err = session.dispatch("cd docs").await.unwrap_err();
	assert!(matches!(err, ClientError::Protocol(ProtocolError::MalformedReply { .. })));
	assert_eq!(session.prompt(), "Root:\\>> ");
	srv.await.unwrap();
}

#[tokio::test]
async fn test_non_json_reply_is_decode_error() {
	let (client, server) = duplex(4096);
	let srv = script(server, vec![valid("ok"), b"<html>".to_vec()]);
	let mut session = session(client);
	session.dispatch("signin alice pw").await.unwrap();

	let err = session.dispatch("cd docs").await.unwrap_err();
	assert!(matches!(err, ClientError::Protocol(ProtocolError::Decode(_))));
	assert!(!err.is_fatal());
	assert_eq!(session.current_path().get(), Some("Root:\\"));
	srv.await.unwrap();
}

#[tokio::test]
async fn test_server_error_is_shown_verbatim() {
	let (client, server) = duplex(4096);
	let error = Response::error("Folder already exists").encode().unwrap();
	let srv = script(server, vec![error]);
	let mut session = session(client);

	let err = session.dispatch("newdir reports").await.unwrap_err();
	assert_eq!(err.to_string(), "Folder already exists");
	let seen = srv.await.unwrap();
	assert_eq!(seen[0], Request::text(MessageType::CreateFolder, "reports"));
}

#[tokio::test]
async fn test_file_management_messages() {
	let (client, server) = duplex(4096);
	let srv = script(
		server,
		vec![valid("ok"), valid("ok"), valid("ok"), valid("a.txt\nb.txt"), valid("Trash CurrentDirectory:Root:\\Garbage")],
	);
	let mut session = session(client);

	assert_eq!(
		session.dispatch("rename 'old name.txt' 'new.txt'").await.unwrap(),
		"The content has been renamed!\n"
	);
	session.dispatch("move a.txt docs").await.unwrap();
	assert_eq!(session.dispatch("rm a.txt").await.unwrap(), "The content has been deleted successfully!\n");
	assert_eq!(session.dispatch("ls").await.unwrap(), "a.txt\nb.txt");
	session.dispatch("garbage").await.unwrap();
	assert_eq!(session.prompt(), "Root:\\Garbage>> ");

	let seen = srv.await.unwrap();
	assert_eq!(seen[0], Request::text(MessageType::Rename, "'old name.txt' 'new.txt'"));
	assert_eq!(seen[1], Request::text(MessageType::Move, "'a.txt' 'docs'"));
	assert_eq!(seen[2], Request::text(MessageType::DeleteContent, "a.txt"));
	assert_eq!(seen[3], Request::empty(MessageType::Show));
	assert_eq!(seen[4], Request::empty(MessageType::Garbage));
}

#[tokio::test]
async fn test_local_commands_send_nothing() {
	let (client, mut server) = duplex(4096);
	let mut session = session(client);

	assert_eq!(session.dispatch("help").await.unwrap(), HELP);
	assert_eq!(session.dispatch("").await.unwrap(), "");
	let out = session.dispatch("fly away").await.unwrap();
	assert_eq!(out, "Invalid command.\nPlease try a different command or use \"help\"\n");

	let err = session.dispatch("rename onlyone").await.unwrap_err();
	assert!(matches!(err, ClientError::InvalidArgumentCount { got: 1, expected: 2 }));
	let err = session.dispatch("signin alice").await.unwrap_err();
	assert!(matches!(err, ClientError::InvalidArgumentCount { got: 1, expected: 2 }));

	drop(session);
	let mut rest = Vec::new();
	server.read_to_end(&mut rest).await.unwrap();
	assert!(rest.is_empty());
}

#[tokio::test]
async fn test_closed_server_is_fatal_on_every_command() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let client = TcpStream::connect(listener.local_addr().unwrap()).await.unwrap();
	let (server, _) = listener.accept().await.unwrap();
	drop(server);
	drop(listener);
	tokio::time::sleep(Duration::from_millis(50)).await;

	let dialer = TcpDialer::new("127.0.0.1:9", Duration::from_secs(1));
	let ctx = TransferContext::new(dialer, Arc::new(NoEvents), &Config::default());
	let mut session = Session::new(Channel::new(client), ctx);

	for _ in 0..3 {
		let err = session.dispatch("ls").await.unwrap_err();
		assert!(matches!(err, ClientError::ServerUnavailable), "got {:?}", err);
		assert!(err.is_fatal());
	}
}

#[test]
fn test_chunk_size_reply() {
	assert_eq!(parse_chunk_size("chunks:1").unwrap(), 1);
	assert_eq!(parse_chunk_size("chunks:65536").unwrap(), 65536);
}
