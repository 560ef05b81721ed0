//! Interactive session state
//!
//! A [`Session`] owns the primary channel and the remote working directory,
//! and is the only writer of that directory. Commands run one at a time; a
//! command's reply is always read before the next command is sent.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::Channel;
use crate::commands::{self, CreateKind, Dialer, TransferContext, TransferHandle};
use crate::error::ClientError;
use crate::logging::*;
use crate::protocol::ROOT_LABEL;
use crate::transfer::TransferReport;

/// Command reference printed by `help`
pub const HELP: &str = "
SIGNUP\t\tCreate an account in CloudDrive service.
SIGNIN\t\tSign in to an existing CloudDrive account.
CD\t\tDisplays/Changes the current working directory.
NEWFILE\t\tCreates a new file.
NEWDIR\t\tCreates a new directory.
RM\t\tRemoves a content.
RENAME\t\tRenames a folder or a directory.
MOVE\t\tMoves a file/folder to a different location.
LS\t\tList all the current files in the current or given path.
GARBAGE\t\tA quick shortcut to Garbage directory.
UPLOADFILE\tUploads a file to the current directory/given directory.
DOWNLOADFILE\tDownloads a file in the current program directory/given directory.
UPLOADDIR\tUploads a directory to the current directory/given directory.
DOWNLOADDIR\tDownloads a directory to the current program directory/given directory.
";

const PROMPT: &str = ">> ";

/// Remote working directory; unset until the user has authenticated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentPath(Option<String>);

impl CurrentPath {
	pub fn get(&self) -> Option<&str> {
		self.0.as_deref()
	}

	fn set(&mut self, path: impl Into<String>) {
		self.0 = Some(path.into());
	}

	/// `<path>>> ` once authenticated, `>> ` before
	pub fn prompt(&self) -> String {
		match &self.0 {
			Some(path) => format!("{}{}", path, PROMPT),
			None => PROMPT.to_string(),
		}
	}
}

/// Background transfers started by this session
#[derive(Debug, Default)]
pub struct TransferSet {
	handles: Vec<TransferHandle>,
}

impl TransferSet {
	pub fn push(&mut self, handle: TransferHandle) {
		self.handles.retain(|h| !h.is_finished());
		self.handles.push(handle);
	}

	/// Transfers that have not finished yet
	pub fn running(&self) -> usize {
		self.handles.iter().filter(|h| !h.is_finished()).count()
	}

	/// Wait for every transfer, in start order
	pub async fn wait_all(self) -> Vec<Result<TransferReport, ClientError>> {
		let mut results = Vec::with_capacity(self.handles.len());
		for handle in self.handles {
			results.push(handle.wait().await);
		}
		results
	}

	pub fn abort_all(&self) {
		for handle in &self.handles {
			handle.abort();
		}
	}
}

/// Primary connection plus everything commands share
pub struct Session<S, D> {
	channel: Channel<S>,
	ctx: TransferContext<D>,
	current_path: CurrentPath,
	transfers: TransferSet,
	wait_for_transfers: bool,
}

impl<S, D> Session<S, D>
where
	S: AsyncRead + AsyncWrite + Unpin,
	D: Dialer,
{
	pub fn new(channel: Channel<S>, ctx: TransferContext<D>) -> Self {
		Session {
			channel,
			ctx,
			current_path: CurrentPath::default(),
			transfers: TransferSet::default(),
			wait_for_transfers: false,
		}
	}

	/// Wait for running transfers at shutdown instead of dropping them
	pub fn wait_for_transfers(mut self, wait: bool) -> Self {
		self.wait_for_transfers = wait;
		self
	}

	pub fn prompt(&self) -> String {
		self.current_path.prompt()
	}

	pub fn current_path(&self) -> &CurrentPath {
		&self.current_path
	}

	pub fn transfers(&self) -> &TransferSet {
		&self.transfers
	}

	/// Run one input line and return the text to show the user.
	///
	/// Errors are returned unrendered; [`ClientError::is_fatal`] tells the
	/// caller the primary connection can no longer be used. A primary
	/// connection closed by the server is reported as
	/// [`ClientError::ServerUnavailable`].
	pub async fn dispatch(&mut self, line: &str) -> Result<String, ClientError> {
		let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
		let Some((command, args)) = words.split_first() else {
			return Ok(String::new());
		};
		let command = command.to_lowercase();
		trace!(command = %command, args = args.len(), "dispatch");

		self.run_command(&command, args).await.map_err(|e| match e {
			ClientError::Disconnected => ClientError::ServerUnavailable,
			e => e,
		})
	}

	async fn run_command(&mut self, command: &str, args: &[String]) -> Result<String, ClientError> {
		let output = match command {
			"help" => HELP.to_string(),
			"signup" => {
				commands::handle_signup(args, &mut self.channel).await?;
				self.current_path.set(ROOT_LABEL);
				"Successfully signed up!\n".to_string()
			}
			"signin" => {
				commands::handle_signin(args, &mut self.channel).await?;
				self.current_path.set(ROOT_LABEL);
				"Successfully signed in!\n".to_string()
			}
			"cd" => {
				let path = commands::handle_change_directory(args, &mut self.channel).await?;
				self.current_path.set(path);
				String::new()
			}
			"garbage" => {
				let path = commands::handle_garbage(&mut self.channel).await?;
				self.current_path.set(path);
				String::new()
			}
			"newfile" | "newdir" => {
				let kind = if command == "newfile" { CreateKind::File } else { CreateKind::Folder };
				commands::handle_create(kind, args, &mut self.channel).await?;
				"The content has been created successfully!\n".to_string()
			}
			"rm" => {
				commands::handle_remove(args, &mut self.channel).await?;
				"The content has been deleted successfully!\n".to_string()
			}
			"rename" => {
				commands::handle_rename(args, &mut self.channel).await?;
				"The content has been renamed!\n".to_string()
			}
			"move" => {
				commands::handle_move(args, &mut self.channel).await?;
				"The content has sucessfully moved!\n".to_string()
			}
			"ls" => commands::handle_show(args, &mut self.channel).await?,
			"uploadfile" => {
				let handle = commands::handle_upload_file(args, &mut self.channel, &self.ctx).await?;
				self.track(handle)
			}
			"downloadfile" => {
				let handle =
					commands::handle_download_file(args, &mut self.channel, &self.ctx).await?;
				self.track(handle)
			}
			"uploaddir" => {
				let handle =
					commands::handle_upload_directory(args, &mut self.channel, &self.ctx).await?;
				self.track(handle)
			}
			"downloaddir" => {
				let handle = commands::handle_download_dir(args, &mut self.channel, &self.ctx).await?;
				self.track(handle)
			}
			_ => "Invalid command.\nPlease try a different command or use \"help\"\n".to_string(),
		};
		Ok(output)
	}

	fn track(&mut self, handle: TransferHandle) -> String {
		debug!(id = %handle.id, kind = %handle.kind, label = %handle.label, "transfer launched");
		self.transfers.push(handle);
		String::new()
	}

	/// End the session, waiting for or aborting running transfers
	pub async fn shutdown(self) -> Vec<Result<TransferReport, ClientError>> {
		let running = self.transfers.running();
		if self.wait_for_transfers {
			if running > 0 {
				info!(running, "waiting for transfers to finish");
			}
			self.transfers.wait_all().await
		} else {
			if running > 0 {
				warn!(running, "dropping unfinished transfers");
			}
			self.transfers.abort_all();
			Vec::new()
		}
	}
}


// vim: ts=4
