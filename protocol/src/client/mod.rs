/// Commands that clients can send to server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// /join ROOMID
    JoinRoom(String),

    /// /leave ROOMID
    LeaveRoom(String),

    /// /challenge USERNAME, FORMAT
    Challenge { username: String, format: String },

    /// /cancelchallenge
    CancelChallenge,

    /// /accept
    Accept,

    /// /utm TEAM
    UpdateTeam(String),

    /// /pm USERNAME, MESSAGE
    Pm { target: String, message: String },

    /// Raw chat message
    Chat(String),
}

impl ClientCommand {
    /// Serialize command to protocol format
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::JoinRoom(room) => format!("/join {}", room),
            Self::LeaveRoom(room) => format!("/leave {}", room),
            Self::Challenge { username, format } => format!("/challenge {}, {}", username, format),
            Self::CancelChallenge => "/cancelchallenge".to_string(),
            Self::Accept => "/accept".to_string(),
            Self::UpdateTeam(team) => format!("/utm {}", team),
            Self::Pm { target, message } => format!("/pm {}, {}", target, message),
            Self::Chat(message) => message.clone(),
        }
    }
}

/// Client message with optional room context
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMessage {
    pub room_id: Option<String>,
    pub command: ClientCommand,
}

impl ClientMessage {
    /// A message with no room context
    pub fn global(command: ClientCommand) -> Self {
        Self {
            room_id: None,
            command,
        }
    }

    /// Serialize to wire format: ROOMID|TEXT or |TEXT
    pub fn to_wire_format(&self) -> String {
        let text = self.command.to_protocol_string();
        match &self.room_id {
            Some(room) => format!("{}|{}", room, text),
            None => format!("|{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_wire_format() {
        let msg = ClientMessage::global(ClientCommand::JoinRoom("lobby".to_string()));
        assert_eq!(msg.to_wire_format(), "|/join lobby");
    }

    #[test]
    fn test_room_wire_format() {
        let msg = ClientMessage {
            room_id: Some("lobby".to_string()),
            command: ClientCommand::Chat("hi all".to_string()),
        };
        assert_eq!(msg.to_wire_format(), "lobby|hi all");
    }

    #[test]
    fn test_pm_wire_format() {
        let msg = ClientMessage::global(ClientCommand::Pm {
            target: "blue".to_string(),
            message: "/accept".to_string(),
        });
        assert_eq!(msg.to_wire_format(), "|/pm blue, /accept");
    }

    #[test]
    fn test_challenge_wire_format() {
        let msg = ClientMessage::global(ClientCommand::Challenge {
            username: "blue".to_string(),
            format: "gen9ou".to_string(),
        });
        assert_eq!(msg.to_wire_format(), "|/challenge blue, gen9ou");
        assert_eq!(
            ClientMessage::global(ClientCommand::UpdateTeam(String::new())).to_wire_format(),
            "|/utm "
        );
    }
}
