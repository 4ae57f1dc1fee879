use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::mpsc;

/// Outgoing side of the network connection.
///
/// Sends are fire-and-forget: nothing here waits for the server.
pub trait NetworkSender {
    fn send(&self, wire_line: String);
}

/// Cloneable handle that queues lines for the connection task.
#[derive(Clone)]
pub struct ChannelSender {
    outgoing: mpsc::UnboundedSender<String>,
}

impl ChannelSender {
    pub fn new(outgoing: mpsc::UnboundedSender<String>) -> Self {
        Self { outgoing }
    }

    /// A sender together with the receiving end the connection drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl NetworkSender for ChannelSender {
    fn send(&self, wire_line: String) {
        if self.outgoing.send(wire_line).is_err() {
            tracing::warn!("Connection closed, dropping outgoing line");
        }
    }
}

/// Keeps every sent line in memory. Clones share the same buffer.
#[derive(Clone, Default, Debug)]
pub struct MemorySender {
    sent: Rc<RefCell<Vec<String>>>,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    /// Remove and return everything sent so far
    pub fn take(&self) -> Vec<String> {
        self.sent.take()
    }
}

impl NetworkSender for MemorySender {
    fn send(&self, wire_line: String) {
        self.sent.borrow_mut().push(wire_line);
    }
}
