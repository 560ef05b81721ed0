//! Sign-up and sign-in
//!
//! Only the request shapes live here; account handling is the server's.

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::Channel;
use crate::error::ClientError;
use crate::protocol::{MessageType, Request};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
struct Credentials<'a> {
	username: &'a str,
	password: &'a str,
	email: &'a str,
}

/// `signup <username> <password> <email>`
pub async fn handle_signup<S>(args: &[String], channel: &mut Channel<S>) -> Result<(), ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let [username, password, email] = args else {
		return Err(ClientError::InvalidArgumentCount { got: args.len(), expected: 3 });
	};
	let user = Credentials { username, password, email };
	channel.request(&Request::json(MessageType::Signup, &user)?).await?;
	Ok(())
}

/// `signin <username> <password>`
pub async fn handle_signin<S>(args: &[String], channel: &mut Channel<S>) -> Result<(), ClientError>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let [username, password] = args else {
		return Err(ClientError::InvalidArgumentCount { got: args.len(), expected: 2 });
	};
	let user = Credentials { username, password, email: "" };
	channel.request(&Request::json(MessageType::Login, &user)?).await?;
	Ok(())
}


// vim: ts=4
