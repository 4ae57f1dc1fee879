use std::cell::RefCell;
use std::rc::Rc;

use banter_protocol::Tokens;

/// Receives every server line a room does not consume itself
pub trait LogSink {
    fn append_line(&mut self, tokens: &[String]);
}

/// Writes room log lines through `tracing`
#[derive(Debug, Clone)]
pub struct TracingLog {
    room_id: String,
}

impl TracingLog {
    pub fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
        }
    }
}

impl LogSink for TracingLog {
    fn append_line(&mut self, tokens: &[String]) {
        tracing::info!(room = %self.room_id, line = %tokens.join("|"), "Room log");
    }
}

/// Keeps log lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Rc<RefCell<Vec<Tokens>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<Tokens> {
        self.lines.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

impl LogSink for MemoryLog {
    fn append_line(&mut self, tokens: &[String]) {
        self.lines.borrow_mut().push(tokens.to_vec());
    }
}
