//! Command interpreter: raw token and arguments to [`Command`].
//!
//! Only syntax is checked here. Whether an index is in range is up to the
//! state machine.

use crate::{Result, TweakError};
use tweak_types::{Command, CommandKind};

/// Raw, unvalidated arguments of a storage request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    /// Payload for `add`.
    pub string: Option<String>,
    /// Index for `query`, as received.
    pub index: Option<String>,
}

impl CommandArgs {
    pub fn with_string(value: impl Into<String>) -> Self {
        Self {
            string: Some(value.into()),
            index: None,
        }
    }

    pub fn with_index(index: impl Into<String>) -> Self {
        Self {
            string: None,
            index: Some(index.into()),
        }
    }

    /// Parse a raw `application/x-www-form-urlencoded` query string.
    ///
    /// Keys and values must decode to UTF-8, and `string` and `index` may
    /// each appear at most once. Other keys are ignored.
    pub fn from_query(raw: Option<&str>) -> Result<Self> {
        let mut args = CommandArgs::default();

        for pair in raw.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = decode_component(key)?;
            let slot = match name.as_str() {
                "string" => &mut args.string,
                "index" => &mut args.index,
                _ => continue,
            };
            if slot.is_some() {
                return Err(TweakError::MalformedQuery(format!(
                    "parameter '{name}' given more than once"
                )));
            }
            *slot = Some(decode_component(value)?);
        }

        Ok(args)
    }
}

/// Percent-decode one query component, `+` meaning space.
fn decode_component(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| TweakError::MalformedQuery(format!("'{raw}' does not decode to UTF-8")))
}

/// Resolve a command token and its arguments.
///
/// Arguments that do not belong to the command are ignored.
pub fn parse_command(token: &str, args: CommandArgs) -> Result<Command> {
    let kind: CommandKind = token.parse()?;

    let command = match kind {
        CommandKind::Add => Command::Add(args.string.ok_or(TweakError::MissingArgument {
            command: "add",
            argument: "string",
        })?),
        CommandKind::Clear => Command::Clear,
        CommandKind::Stop => Command::Stop,
        CommandKind::Sorry => Command::Sorry,
        CommandKind::Query => {
            let raw = args.index.ok_or(TweakError::MissingArgument {
                command: "query",
                argument: "index",
            })?;
            Command::Query(parse_index(&raw)?)
        }
        CommandKind::State => Command::State,
    };

    Ok(command)
}

/// Parse a non-negative decimal index.
///
/// Digit strings too large for `usize` saturate to `usize::MAX`, which no
/// store can hold, so the machine reports them as out of range.
pub fn parse_index(raw: &str) -> Result<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TweakError::MalformedIndex(raw.to_string()));
    }
    Ok(raw.parse::<usize>().unwrap_or(usize::MAX))
}
