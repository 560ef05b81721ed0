//! Path arguments of transfer and rename/move commands
//!
//! Commands take one or two paths. A path containing spaces is wrapped in
//! single quotes: `upload 'my file.txt' 'Root:\docs'`. Bare words are
//! single paths, so `rename a.txt b.txt` works without quotes.

use crate::error::ClientError;

/// One required path and an optional second one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathArgs {
	pub primary: String,
	pub secondary: Option<String>,
}

impl PathArgs {
	/// Parse command arguments (already split on whitespace by the caller)
	pub fn parse(args: &[String]) -> Result<Self, ClientError> {
		let line = args.join(" ");
		let mut paths = tokenize(&line)?.into_iter();

		let primary = paths.next().ok_or(ClientError::InvalidArgumentCount { got: 0, expected: 1 })?;
		let secondary = paths.next();
		let extra = paths.count();
		if extra > 0 {
			return Err(ClientError::InvalidArgumentCount { got: 2 + extra, expected: 2 });
		}
		Ok(PathArgs { primary, secondary })
	}

	/// Parse exactly two paths
	pub fn parse_pair(args: &[String]) -> Result<(String, String), ClientError> {
		let parsed = Self::parse(args)?;
		match parsed.secondary {
			Some(second) => Ok((parsed.primary, second)),
			None => Err(ClientError::InvalidArgumentCount { got: 1, expected: 2 }),
		}
	}

	/// Wire form of a path pair: `'<first>' '<second>'`
	pub fn quoted_pair(first: &str, second: &str) -> String {
		format!("'{}' '{}'", first, second)
	}
}

fn tokenize(line: &str) -> Result<Vec<String>, ClientError> {
	let mut tokens = Vec::new();
	let mut chars = line.chars().peekable();

	while let Some(&c) = chars.peek() {
		if c.is_whitespace() {
			chars.next();
			continue;
		}

		let mut token = String::new();
		if c == '\'' {
			chars.next();
			let mut closed = false;
			for c in chars.by_ref() {
				if c == '\'' {
					closed = true;
					break;
				}
				token.push(c);
			}
			if !closed {
				return Err(ClientError::InvalidArguments {
					message: format!("unterminated quote in {:?}", line),
				});
			}
			if token.is_empty() {
				return Err(ClientError::InvalidArguments { message: "empty path".to_string() });
			}
		} else {
			while let Some(&c) = chars.peek() {
				if c.is_whitespace() {
					break;
				}
				token.push(c);
				chars.next();
			}
		}
		tokens.push(token);
	}
	Ok(tokens)
}


// vim: ts=4
