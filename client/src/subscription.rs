//! Change notifications for room observers.

use banter_protocol::Tokens;

/// What changed in a room
#[derive(Debug, Clone, PartialEq)]
pub enum RoomUpdate {
    /// Room state changed; re-read whatever is displayed
    Refresh,
    /// A line went to the room log
    Line(Tokens),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&RoomUpdate)>;

/// Ordered list of callbacks, notified synchronously
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&RoomUpdate) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, update: &RoomUpdate) {
        for (_, callback) in &mut self.entries {
            callback(update);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_notify_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::new();

        for tag in ["first", "second"] {
            let seen = seen.clone();
            subscribers.subscribe(move |_| seen.borrow_mut().push(tag));
        }
        subscribers.notify(&RoomUpdate::Refresh);

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_one() {
        let hits = Rc::new(RefCell::new(0));
        let mut subscribers = Subscribers::new();

        let counter = hits.clone();
        let kept = subscribers.subscribe(move |_| *counter.borrow_mut() += 1);
        let dropped = subscribers.subscribe(|_| panic!("unsubscribed callback was called"));

        assert!(subscribers.unsubscribe(dropped));
        assert!(!subscribers.unsubscribe(dropped));
        subscribers.notify(&RoomUpdate::Line(vec!["raw".into(), "hi".into()]));

        assert_eq!(*hits.borrow(), 1);
        assert!(subscribers.unsubscribe(kept));
        assert!(subscribers.is_empty());
    }
}
