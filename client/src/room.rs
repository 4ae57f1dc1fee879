//! A chat room or DM conversation: roster, challenges, and command routing.

use std::rc::Rc;

use banter_protocol::{ClientCommand, ClientMessage, GroupTable, Tokens, to_id};

use crate::challenge::ChallengeState;
use crate::error::RoomError;
use crate::interpreter::{Interpretation, ProtocolInterpreter};
use crate::log::LogSink;
use crate::roster::{RosterEntry, UserRoster};
use crate::sender::NetworkSender;
use crate::subscription::{RoomUpdate, SubscriptionId, Subscribers};

/// Room id prefix of direct-message rooms
pub const DM_PREFIX: &str = "dm-";

/// DM room with yourself
pub const CONSOLE_ROOM: &str = "dm-";

const PM_ONLY_NOTICE: &str = "Can only be used in a PM.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomOptions {
    pub id: String,
    /// The server already has us in this room
    pub connected: bool,
    pub challenge_menu_open: bool,
    /// Start the draft with a `/` typed
    pub initial_slash: bool,
}

impl RoomOptions {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn connected(mut self) -> Self {
        self.connected = true;
        self
    }

    pub fn challenge_menu_open(mut self) -> Self {
        self.challenge_menu_open = true;
        self
    }

    pub fn initial_slash(mut self) -> Self {
        self.initial_slash = true;
        self
    }
}

/// Work a room hands back to whoever manages the set of rooms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomRequest {
    Join(String),
    Leave(String),
    /// Open the DM room with this user, challenge menu showing
    OpenChallenge(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Handled locally, nothing to send
    Handled,
    Request(RoomRequest),
    /// Not a local command; send it as typed
    NotHandled,
}

pub struct ChatRoom {
    id: String,
    title: String,
    pm_target: Option<String>,
    connected: bool,
    local_id: String,
    roster: UserRoster,
    challenges: ChallengeState,
    sender: Rc<dyn NetworkSender>,
    log: Box<dyn LogSink>,
    subscribers: Subscribers,
}

impl ChatRoom {
    pub fn new(
        options: &RoomOptions,
        local_id: &str,
        sender: Rc<dyn NetworkSender>,
        log: Box<dyn LogSink>,
    ) -> Self {
        let mut room = Self {
            id: options.id.clone(),
            title: options.id.clone(),
            pm_target: None,
            connected: options.connected,
            local_id: local_id.to_string(),
            roster: UserRoster::new(),
            challenges: ChallengeState::new(),
            sender,
            log,
            subscribers: Subscribers::new(),
        };
        if options.challenge_menu_open {
            room.challenges.open_menu();
        }
        room.update_target();
        room.connect();
        room
    }

    /// Join the room server-side. DM rooms have nothing to join.
    pub fn connect(&mut self) {
        if self.connected {
            return;
        }
        if self.pm_target.is_none() {
            let join = ClientMessage::global(ClientCommand::JoinRoom(self.id.clone()));
            self.sender.send(join.to_wire_format());
        }
        self.connected = true;
        tracing::debug!(room = %self.id, "Room connected");
    }

    /// Forget the server-side membership and join again
    pub fn reconnect(&mut self) {
        self.connected = false;
        self.connect();
    }

    /// The server dropped us from the room
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Tear the room down: observers go away, and a connected chat room is
    /// left server-side. DM rooms never send a leave.
    pub fn close(&mut self) {
        if self.pm_target.is_some() {
            self.connected = false;
        }
        if self.connected {
            let leave = ClientMessage::global(ClientCommand::LeaveRoom(self.id.clone()));
            self.sender.send(leave.to_wire_format());
            self.connected = false;
        }
        self.subscribers.clear();
        tracing::debug!(room = %self.id, "Room closed");
    }

    fn update_target(&mut self) {
        if self.id == CONSOLE_ROOM {
            self.pm_target = Some(self.local_id.clone());
            if self.roster.is_empty() {
                self.roster.set_all(1, [format!(" {}", self.local_id)]);
            }
            self.title = "[Console]".to_string();
        } else if let Some(target) = self.id.strip_prefix(DM_PREFIX) {
            self.pm_target = Some(target.to_string());
            if self.roster.is_empty() {
                self.roster
                    .set_all(2, [format!(" {}", target), format!(" {}", self.local_id)]);
            }
            self.title = format!("[DM] {}", target);
        }
    }

    /// Send a line typed in this room.
    ///
    /// Unless `direct`, empty lines are dropped and local commands are
    /// handled first; some of those need the caller to act on the returned
    /// request.
    pub fn send(&mut self, line: &str, direct: bool) -> Option<RoomRequest> {
        self.update_target();
        if !direct {
            if line.is_empty() {
                return None;
            }
            match self.handle_local_command(line) {
                CommandOutcome::Handled => return None,
                CommandOutcome::Request(request) => return Some(request),
                CommandOutcome::NotHandled => {}
            }
        }
        self.transmit(line);
        None
    }

    /// Put a line on the wire, addressed to the DM peer or the room
    fn transmit(&self, line: &str) {
        let message = match &self.pm_target {
            Some(target) => ClientMessage::global(ClientCommand::Pm {
                target: target.clone(),
                message: line.to_string(),
            }),
            None => ClientMessage {
                room_id: Some(self.id.clone()),
                command: ClientCommand::Chat(line.to_string()),
            },
        };
        self.sender.send(message.to_wire_format());
    }

    pub fn handle_local_command(&mut self, line: &str) -> CommandOutcome {
        let Some(body) = line.strip_prefix('/') else {
            return CommandOutcome::NotHandled;
        };
        if body.starts_with('/') {
            return CommandOutcome::NotHandled;
        }
        let (cmd, target) = body.split_once(' ').unwrap_or((body, ""));

        match cmd {
            "j" | "join" => {
                let room_id = normalize_room_id(target);
                if room_id.is_empty() {
                    return CommandOutcome::NotHandled;
                }
                CommandOutcome::Request(RoomRequest::Join(room_id))
            }
            "part" | "leave" => {
                let room_id = normalize_room_id(target);
                let room_id = if room_id.is_empty() { self.id.clone() } else { room_id };
                CommandOutcome::Request(RoomRequest::Leave(room_id))
            }
            "chall" | "challenge" => {
                if !target.is_empty() {
                    return CommandOutcome::Request(RoomRequest::OpenChallenge(to_id(target)));
                }
                if let Err(e) = self.open_challenge() {
                    tracing::debug!(room = %self.id, error = %e, "Challenge menu not opened");
                }
                CommandOutcome::Handled
            }
            "cchall" | "cancelchallenge" => {
                if let Err(e) = self.cancel_challenge() {
                    tracing::debug!(room = %self.id, error = %e, "Challenge not cancelled");
                }
                CommandOutcome::Handled
            }
            "reject" => {
                self.reject_challenge();
                CommandOutcome::Handled
            }
            _ => CommandOutcome::NotHandled,
        }
    }

    /// The DM peer, or an inline error and `InvalidContext` outside DMs
    fn require_pm(&mut self, operation: &'static str) -> Result<String, RoomError> {
        match &self.pm_target {
            Some(target) => Ok(target.clone()),
            None => {
                self.receive_line(vec!["error".to_string(), PM_ONLY_NOTICE.to_string()]);
                Err(RoomError::InvalidContext(operation))
            }
        }
    }

    pub fn open_challenge(&mut self) -> Result<(), RoomError> {
        self.require_pm("/challenge")?;
        self.challenges.open_menu();
        self.update();
        Ok(())
    }

    pub fn cancel_challenge(&mut self) -> Result<(), RoomError> {
        self.require_pm("/cancelchallenge")?;
        if self.challenges.cancel().is_some() {
            self.transmit(&ClientCommand::CancelChallenge.to_protocol_string());
        }
        self.update();
        Ok(())
    }

    /// Challenge the DM peer with `team` (packed) in `format`
    pub fn make_challenge(&mut self, format: &str, team: Option<&str>) -> Result<(), RoomError> {
        let target = self.require_pm("make challenge")?;
        self.send_team(team);
        let challenge = ClientMessage::global(ClientCommand::Challenge {
            username: target,
            format: format.to_string(),
        });
        self.sender.send(challenge.to_wire_format());
        self.challenges.made(format);
        self.update();
        Ok(())
    }

    pub fn accept_challenge(&mut self, format: &str, team: Option<&str>) -> Result<(), RoomError> {
        self.require_pm("accept challenge")?;
        self.send_team(team);
        self.transmit(&ClientCommand::Accept.to_protocol_string());
        self.challenges.accepted();
        tracing::debug!(room = %self.id, format, "Challenge accepted");
        self.update();
        Ok(())
    }

    /// Drop the incoming challenge. The server learns of it from the
    /// peer's next challenge update.
    pub fn reject_challenge(&mut self) {
        self.challenges.reject();
        self.update();
    }

    fn send_team(&self, team: Option<&str>) {
        let utm = ClientMessage::global(ClientCommand::UpdateTeam(team.unwrap_or_default().to_string()));
        self.sender.send(utm.to_wire_format());
    }

    /// Feed one tokenized server line to the room
    pub fn receive_line(&mut self, tokens: Tokens) {
        let interpretation = ProtocolInterpreter {
            roster: &mut self.roster,
            challenges: &mut self.challenges,
            local_id: &self.local_id,
        }
        .interpret(&tokens);

        match interpretation {
            Interpretation::Consumed => self.update(),
            Interpretation::Forward => {
                self.log.append_line(&tokens);
                self.subscribers.notify(&RoomUpdate::Line(tokens));
            }
        }
    }

    pub fn set_users<I, S>(&mut self, count: usize, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roster.set_all(count, names);
        self.update();
    }

    pub fn add_user(&mut self, name: &str) {
        self.roster.add(name);
        self.update();
    }

    pub fn remove_user(&mut self, name: &str) {
        self.roster.remove(name);
        self.update();
    }

    pub fn rename_user(&mut self, name: &str, old_name: &str) {
        self.roster.rename(name, old_name);
        self.update();
    }

    fn update(&mut self) {
        self.subscribers.notify(&RoomUpdate::Refresh);
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&RoomUpdate) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn set_local_user(&mut self, user_id: &str) {
        self.local_id = user_id.to_string();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.update();
    }

    pub fn pm_target(&self) -> Option<&str> {
        self.pm_target.as_deref()
    }

    pub fn is_pm(&self) -> bool {
        self.pm_target.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn roster(&self) -> &UserRoster {
        &self.roster
    }

    pub fn user_count(&self) -> usize {
        self.roster.count()
    }

    pub fn sorted_users<'a>(&'a self, groups: &GroupTable) -> Vec<RosterEntry<'a>> {
        self.roster.sorted(groups)
    }

    pub fn challenges(&self) -> &ChallengeState {
        &self.challenges
    }
}

impl std::fmt::Debug for ChatRoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRoom")
            .field("id", &self.id)
            .field("pm_target", &self.pm_target)
            .field("connected", &self.connected)
            .field("roster", &self.roster)
            .field("challenges", &self.challenges)
            .finish_non_exhaustive()
    }
}

/// Room ids are used as typed when already valid, otherwise folded
fn normalize_room_id(target: &str) -> String {
    let valid = target
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        target.to_string()
    } else {
        to_id(target)
    }
}
