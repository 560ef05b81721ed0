use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use clouddrive::callbacks::TransferEvents;
use clouddrive::channel::Channel;
use clouddrive::commands::{connect_tcp, TcpDialer, TransferContext};
use clouddrive::config::Config;
use clouddrive::logging::*;
use clouddrive::progress::ConsoleReporter;
use clouddrive::session::Session;
use clouddrive::validation::Validator;

///////////////////////
// Utility functions //
///////////////////////

fn load_config(matches: &ArgMatches) -> Result<Config, Box<dyn Error>> {
	let path = matches.get_one::<String>("config").map(PathBuf::from);
	let mut config = Config::load(path.as_deref())?;

	if let Some(addr) = matches.get_one::<String>("server") {
		config.server_addr = addr.clone();
	}
	if let Some(addr) = matches.get_one::<String>("transfer-server") {
		config.transfer_addr = addr.clone();
	}
	if let Some(secs) = matches.get_one::<u64>("idle-timeout") {
		config.idle_timeout_secs = *secs;
	}
	if matches.get_flag("wait") {
		config.wait_for_transfers = true;
	}
	if matches.get_flag("quiet") {
		config.progress = false;
	}

	config.validate()?;
	Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = Command::new("CloudDrive")
		.version("1.0.0")
		.about("Command line client for the CloudDrive storage service")
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.help("Config file (default: ~/.clouddrive/config.toml)"),
		)
		.arg(
			Arg::new("server")
				.short('s')
				.long("server")
				.value_name("HOST:PORT")
				.help("Command server address"),
		)
		.arg(
			Arg::new("transfer-server")
				.short('t')
				.long("transfer-server")
				.value_name("HOST:PORT")
				.help("Bulk transfer server address"),
		)
		.arg(
			Arg::new("idle-timeout")
				.long("idle-timeout")
				.value_name("SECS")
				.value_parser(value_parser!(u64))
				.help("Seconds without data that end a download"),
		)
		.arg(
			Arg::new("wait")
				.short('w')
				.long("wait")
				.action(ArgAction::SetTrue)
				.help("Wait for running transfers when input ends"),
		)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.action(ArgAction::SetTrue)
				.help("Log protocol activity to stderr"),
		)
		.arg(
			Arg::new("quiet")
				.short('q')
				.long("quiet")
				.action(ArgAction::SetTrue)
				.help("Do not print upload progress and completion lines"),
		)
		.get_matches();

	init_tracing(matches.get_flag("verbose"));
	let config = load_config(&matches)?;
	debug!(?config, "configuration loaded");

	let stream = match connect_tcp(&config.server_addr, config.connect_timeout()).await {
		Ok(stream) => stream,
		Err(e) => {
			eprintln!("{}", e);
			process::exit(1);
		}
	};
	let channel = Channel::new(stream).with_reply_timeout(config.control_timeout());
	let events: Arc<dyn TransferEvents> = Arc::new(ConsoleReporter::stdout());
	let ctx = TransferContext::new(TcpDialer::from_config(&config), events, &config);
	let mut session = Session::new(channel, ctx).wait_for_transfers(config.wait_for_transfers);

	println!("CloudDrive v1.0 Command Line Interface!");
	println!("Type \"help\" for available commands.");

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	loop {
		print!("{}", session.prompt());
		std::io::stdout().flush()?;

		let Some(line) = lines.next_line().await? else {
			break;
		};
		match session.dispatch(&line).await {
			Ok(output) => println!("{}", output),
			Err(e) if e.is_fatal() => {
				println!("{}", e);
				process::exit(1);
			}
			Err(e) => println!("{}", e),
		}
	}

	session.shutdown().await;
	Ok(())
}

// vim: ts=4
