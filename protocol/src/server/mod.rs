mod challenge;
mod tests;

pub use challenge::{Challenge, parse_challenge};

use crate::ParseError;
use anyhow::Result;

/// One server line split into its tag and fields
pub type Tokens = Vec<String>;

/// Tags whose whole payload is a single field
const TWO_PART_TAGS: &[&str] = &[
    "html", "raw", "error", "challstr", "popup", "title", "notify", "deinit", "init", "usercount",
    "timestamp", ":", "customgroups",
];

/// Tags split as tag, one field, then the rest of the line
const THREE_PART_TAGS: &[&str] = &["c", "chat", "uhtml", "uhtmlchange", "queryresponse"];

/// Tags split as tag, two fields, then the rest of the line
const FOUR_PART_TAGS: &[&str] = &["c:", "pm"];

#[derive(Debug, Clone, PartialEq)]
pub struct ServerFrame {
    pub room_id: Option<String>,
    pub lines: Vec<Tokens>,
}

/// Parse a complete WebSocket frame into tokenized lines
pub fn parse_server_frame(frame: &str) -> Result<ServerFrame> {
    if frame.is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    let mut lines = frame.lines();
    let mut room_id = None;

    // Check if first line is >ROOMID
    if let Some(first_line) = lines.clone().next()
        && let Some(room) = first_line.strip_prefix('>')
    {
        if room.trim().is_empty() {
            return Err(ParseError::InvalidFormat("empty room id after '>'".to_string()).into());
        }
        room_id = Some(room.trim().to_string());
        lines.next();
    }

    let lines = lines
        .filter(|line| !line.trim().is_empty())
        .map(tokenize_line)
        .collect();

    Ok(ServerFrame { room_id, lines })
}

/// Split a single server line into tokens.
///
/// `tokens[0]` is the message tag. Lines that do not start with `|` are plain
/// text and come back as `["", line]`. Chat-like tags keep their message body
/// intact even when it contains `|`.
pub fn tokenize_line(line: &str) -> Tokens {
    let Some(rest) = line.strip_prefix('|') else {
        return vec![String::new(), line.to_string()];
    };

    let (tag, body) = match rest.split_once('|') {
        Some((tag, body)) => (tag, Some(body)),
        None => (rest, None),
    };

    let mut tokens = vec![tag.to_string()];
    let Some(body) = body else {
        return tokens;
    };

    let fields = if TWO_PART_TAGS.contains(&tag) {
        1
    } else if THREE_PART_TAGS.contains(&tag) {
        2
    } else if FOUR_PART_TAGS.contains(&tag) {
        3
    } else {
        usize::MAX
    };

    tokens.extend(body.splitn(fields, '|').map(str::to_string));
    tokens
}

/// Fetch a required field of a tokenized line
pub fn field<'a>(tokens: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    tokens
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| ParseError::MissingField(name.to_string()).into())
}
