mod challenge;
mod config;
mod connection;
mod error;
mod format;
mod interpreter;
mod log;
pub mod room;
mod roster;
mod sender;
mod state;
mod subscription;
mod text_entry;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Rc;

use anyhow::Result;

pub use banter_protocol::{
    Challenge, ClientCommand, ClientMessage, Group, GroupTable, GroupType, ServerFrame, Tokens,
    to_id,
};

pub use challenge::ChallengeState;
pub use config::{ClientConfig, SHOWDOWN_URL};
pub use connection::{Connection, ReconnectPolicy, TransportEvent};
pub use error::RoomError;
pub use format::toggle_format_char;
pub use interpreter::{CHALLENGE_PREFIX, Interpretation, ProtocolInterpreter};
pub use log::{LogSink, MemoryLog, TracingLog};
pub use room::{ChatRoom, CommandOutcome, RoomOptions, RoomRequest};
pub use roster::{RosterEntry, UserRoster};
pub use sender::{ChannelSender, MemorySender, NetworkSender};
pub use state::UserInfo;
pub use subscription::{RoomUpdate, SubscriptionId};
pub use text_entry::{
    Key, KeyOutcome, KeyPress, MarkupFormatter, Projection, Selection, TextEntry,
};

use banter_protocol::field;

/// Room that receives lines from frames without a room id
pub const LOBBY: &str = "lobby";

type LogFactory = Box<dyn Fn(&str) -> Box<dyn LogSink>>;

/// An open room together with its draft
#[derive(Debug)]
pub struct Panel {
    pub room: ChatRoom,
    pub entry: TextEntry,
}

/// Directory of open rooms, fed by server frames
pub struct Client {
    config: ClientConfig,
    sender: Rc<dyn NetworkSender>,
    groups: GroupTable,
    user: Option<UserInfo>,
    panels: HashMap<String, Panel>,
    log_factory: LogFactory,
}

impl Client {
    pub fn new(config: ClientConfig, sender: impl NetworkSender + 'static) -> Self {
        Self {
            config,
            sender: Rc::new(sender),
            groups: GroupTable::default(),
            user: None,
            panels: HashMap::new(),
            log_factory: Box::new(|room_id: &str| -> Box<dyn LogSink> {
                Box::new(TracingLog::new(room_id))
            }),
        }
    }

    /// Use `factory` to build the log of each room opened from now on
    pub fn with_log_factory(
        mut self,
        factory: impl Fn(&str) -> Box<dyn LogSink> + 'static,
    ) -> Self {
        self.log_factory = Box::new(factory);
        self
    }

    /// Join every room listed in the config
    pub fn autojoin(&mut self) {
        let rooms = self.config.autojoin.clone();
        for room_id in rooms {
            self.join(&room_id);
        }
    }

    /// Open a room, or return it if already open
    pub fn open(&mut self, options: RoomOptions) -> &mut Panel {
        let local_id = self.local_id().to_string();

        match self.panels.entry(options.id.clone()) {
            Entry::Occupied(entry) => {
                let panel = entry.into_mut();
                if options.challenge_menu_open
                    && let Err(e) = panel.room.open_challenge()
                {
                    tracing::debug!(room = %options.id, error = %e, "Challenge menu not opened");
                }
                panel
            }
            Entry::Vacant(entry) => {
                tracing::info!(room = %options.id, "Opening room");
                let log = (self.log_factory)(&options.id);
                let room = ChatRoom::new(&options, &local_id, self.sender.clone(), log);
                let mut text_entry = TextEntry::with_config(&self.config);
                if options.initial_slash {
                    text_entry.set_value("/", Some(Selection::caret(1)));
                }
                entry.insert(Panel {
                    room,
                    entry: text_entry,
                })
            }
        }
    }

    pub fn join(&mut self, room_id: &str) -> &mut Panel {
        self.open(RoomOptions::new(room_id))
    }

    /// Close a room. Returns false if it was not open.
    pub fn leave(&mut self, room_id: &str) -> bool {
        match self.panels.remove(room_id) {
            Some(mut panel) => {
                panel.room.close();
                true
            }
            None => false,
        }
    }

    /// Send a line typed in `room_id`, carrying out any room request it makes
    pub fn send(&mut self, room_id: &str, line: &str) -> Result<(), RoomError> {
        let panel = self
            .panels
            .get_mut(room_id)
            .ok_or_else(|| RoomError::UnknownRoom(room_id.to_string()))?;

        if let Some(request) = panel.room.send(line, false) {
            self.run_request(request);
        }
        Ok(())
    }

    fn run_request(&mut self, request: RoomRequest) {
        tracing::debug!(?request, "Room request");
        match request {
            RoomRequest::Join(room_id) => {
                self.join(&room_id);
            }
            RoomRequest::Leave(room_id) => {
                if !self.leave(&room_id) {
                    tracing::debug!(room = %room_id, "Leave for a room that is not open");
                }
            }
            RoomRequest::OpenChallenge(userid) => {
                let options = RoomOptions::new(&format!("{}{}", room::DM_PREFIX, userid));
                self.open(options.challenge_menu_open());
            }
        }
    }

    /// Route a key press to the draft of `room_id`; a submitted line is sent
    pub fn handle_key(&mut self, room_id: &str, press: KeyPress) -> Result<KeyOutcome, RoomError> {
        let panel = self
            .panels
            .get_mut(room_id)
            .ok_or_else(|| RoomError::UnknownRoom(room_id.to_string()))?;

        let outcome = panel.entry.handle_key(press);
        if let KeyOutcome::Submitted(line) = &outcome {
            self.send(room_id, line)?;
        }
        Ok(outcome)
    }

    pub fn receive_frame(&mut self, frame: ServerFrame) {
        match frame.room_id {
            Some(room_id) => {
                for tokens in frame.lines {
                    self.receive_room_line(&room_id, tokens);
                }
            }
            None => {
                for tokens in frame.lines {
                    if let Err(e) = self.receive_global_line(tokens) {
                        tracing::debug!(error = %e, "Malformed global line");
                    }
                }
            }
        }
    }

    fn receive_room_line(&mut self, room_id: &str, tokens: Tokens) {
        match tokens.first().map(String::as_str) {
            Some("init") => {
                self.open(RoomOptions::new(room_id).connected());
                return;
            }
            Some("deinit") | Some("noinit") => {
                if let Some(mut panel) = self.panels.remove(room_id) {
                    panel.room.disconnect();
                    panel.room.close();
                }
                tracing::info!(room = %room_id, line = %tokens.join("|"), "Room closed by server");
                return;
            }
            Some("title") => {
                if let (Some(panel), Some(title)) = (self.panels.get_mut(room_id), tokens.get(1)) {
                    panel.room.set_title(title);
                }
                return;
            }
            _ => {}
        }

        match self.panels.get_mut(room_id) {
            Some(panel) => panel.room.receive_line(tokens),
            None => tracing::debug!(room = %room_id, "Line for a room that is not open"),
        }
    }

    fn receive_global_line(&mut self, tokens: Tokens) -> Result<()> {
        match tokens.first().map(String::as_str) {
            Some("updateuser") => {
                let user = UserInfo::from_update(
                    field(&tokens, 1, "user name")?,
                    tokens.get(2).map_or("0", String::as_str),
                    tokens.get(3).map_or("", String::as_str),
                );
                tracing::info!(user = %user.username, named = user.named, "User updated");
                for panel in self.panels.values_mut() {
                    panel.room.set_local_user(&user.userid);
                }
                self.user = Some(user);
            }
            Some("pm") => {
                let from = field(&tokens, 1, "pm sender")?;
                let to = field(&tokens, 2, "pm receiver")?;
                let message = field(&tokens, 3, "pm message")?;

                let peer = if to_id(from) == self.local_id() { to } else { from };
                let room_id = format!("{}{}", room::DM_PREFIX, to_id(peer));
                let line = vec!["c".to_string(), from.to_string(), message.to_string()];
                self.open(RoomOptions::new(&room_id)).room.receive_line(line);
            }
            Some("customgroups") => {
                self.groups = GroupTable::from_json(field(&tokens, 1, "group list")?)?;
                tracing::debug!("Custom groups loaded");
            }
            _ => match self.panels.get_mut(LOBBY) {
                Some(panel) => panel.room.receive_line(tokens),
                None => tracing::debug!(line = %tokens.join("|"), "Global line with no lobby"),
            },
        }
        Ok(())
    }

    /// Rejoin every open room after the connection was re-established
    pub fn rejoin_all(&mut self) {
        for panel in self.panels.values_mut() {
            panel.room.reconnect();
        }
    }

    pub fn room(&self, room_id: &str) -> Option<&ChatRoom> {
        self.panels.get(room_id).map(|panel| &panel.room)
    }

    pub fn room_mut(&mut self, room_id: &str) -> Option<&mut ChatRoom> {
        self.panels.get_mut(room_id).map(|panel| &mut panel.room)
    }

    pub fn entry(&self, room_id: &str) -> Option<&TextEntry> {
        self.panels.get(room_id).map(|panel| &panel.entry)
    }

    pub fn entry_mut(&mut self, room_id: &str) -> Option<&mut TextEntry> {
        self.panels.get_mut(room_id).map(|panel| &mut panel.entry)
    }

    /// Ids of all open rooms, sorted
    pub fn room_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.panels.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Get current user info
    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn local_id(&self) -> &str {
        self.user.as_ref().map_or("", |user| user.userid.as_str())
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
