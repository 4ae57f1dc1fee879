use std::str::FromStr;

use crate::ParseError;

/// A proposed battle between two users of a DM room.
///
/// Carried on the wire as `/challenge FORMAT|TEAMFORMAT|MESSAGE|ACCEPT|REJECT`
/// inside an ordinary chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub format_name: String,
    pub team_format: String,
    pub message: Option<String>,
    pub accept_button_label: Option<String>,
    pub reject_button_label: Option<String>,
}

impl Challenge {
    /// A challenge for `format` with no message or custom button labels
    pub fn new(format: &str) -> Self {
        Self {
            format_name: format.to_string(),
            team_format: format.to_string(),
            message: None,
            accept_button_label: None,
            reject_button_label: None,
        }
    }
}

impl FromStr for Challenge {
    type Err = ParseError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let mut fields = descriptor.split('|');
        let mut next_field = || fields.next().filter(|s| !s.is_empty()).map(str::to_string);

        let format_name = next_field().unwrap_or_default();
        let team_format = next_field().unwrap_or_else(|| format_name.clone());
        let message = next_field();
        let accept_button_label = next_field();
        let reject_button_label = next_field();

        if format_name.is_empty() && message.is_none() {
            return Err(ParseError::MalformedDescriptor(descriptor.to_string()));
        }

        Ok(Challenge {
            format_name,
            team_format,
            message,
            accept_button_label,
            reject_button_label,
        })
    }
}

/// Parse a challenge descriptor, treating degenerate ones as no challenge
pub fn parse_challenge(descriptor: &str) -> Option<Challenge> {
    descriptor.parse().ok()
}
