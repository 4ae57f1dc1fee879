//! Applies tokenized server lines to room state.

use anyhow::Result;
use banter_protocol::{field, to_id};

use crate::challenge::ChallengeState;
use crate::roster::UserRoster;

/// Chat body prefix that carries a challenge descriptor
pub const CHALLENGE_PREFIX: &str = "/challenge ";

/// How a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// Room state changed; the line stays out of the log
    Consumed,
    /// Not a room-state line; it belongs in the log
    Forward,
}

/// Borrowed view of the state a room's protocol lines can change
pub struct ProtocolInterpreter<'a> {
    pub roster: &'a mut UserRoster,
    pub challenges: &'a mut ChallengeState,
    /// Identity of the logged-in user
    pub local_id: &'a str,
}

impl ProtocolInterpreter<'_> {
    pub fn interpret(&mut self, tokens: &[String]) -> Interpretation {
        match self.apply(tokens) {
            Ok(interpretation) => interpretation,
            Err(e) => {
                tracing::debug!(error = %e, tag = ?tokens.first(), "Malformed room line");
                Interpretation::Forward
            }
        }
    }

    fn apply(&mut self, tokens: &[String]) -> Result<Interpretation> {
        let Some(tag) = tokens.first() else {
            return Ok(Interpretation::Forward);
        };

        match tag.as_str() {
            "users" => {
                let list = field(tokens, 1, "user list")?;
                let mut entries = list.split(',');
                let declared = entries.next().unwrap_or_default();
                let names: Vec<&str> = entries.collect();
                let count = declared.trim().parse().unwrap_or(names.len());
                self.roster.set_all(count, names);
            }
            "join" | "j" | "J" => {
                self.roster.add(field(tokens, 1, "joining user")?);
            }
            "leave" | "l" | "L" => {
                self.roster.remove(field(tokens, 1, "leaving user")?);
            }
            "name" | "n" | "N" => {
                let new_name = field(tokens, 1, "new name")?;
                let old_name = field(tokens, 2, "old name")?;
                self.roster.rename(new_name, old_name);
            }
            "c" => {
                let sender = field(tokens, 1, "chat sender")?;
                let message = field(tokens, 2, "chat message")?;
                // a bare "/challenge" carries an empty descriptor
                let descriptor = match message.strip_prefix(CHALLENGE_PREFIX) {
                    Some(descriptor) => descriptor,
                    None if message == CHALLENGE_PREFIX.trim_end() => "",
                    None => return Ok(Interpretation::Forward),
                };
                let from_self = !self.local_id.is_empty() && to_id(sender) == self.local_id;
                self.challenges.update_from_wire(from_self, descriptor);
            }
            _ => return Ok(Interpretation::Forward),
        }

        Ok(Interpretation::Consumed)
    }
}
