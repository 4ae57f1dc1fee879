//! Outgoing and incoming battle challenges of a DM room.
//!
//! The two directions are independent: a user can be waiting on their own
//! challenge while holding one from the peer. This type only tracks state;
//! the room decides what to send.

use banter_protocol::{Challenge, ParseError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeState {
    challenging: Option<Challenge>,
    challenged: Option<Challenge>,
    menu_open: bool,
}

impl ChallengeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Our pending challenge to the peer
    pub fn outgoing(&self) -> Option<&Challenge> {
        self.challenging.as_ref()
    }

    /// The peer's pending challenge to us
    pub fn incoming(&self) -> Option<&Challenge> {
        self.challenged.as_ref()
    }

    /// Whether the challenge compose menu is showing
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    /// Withdraw our challenge if there is one, otherwise close the menu.
    ///
    /// Returns the withdrawn challenge; the caller tells the server.
    pub fn cancel(&mut self) -> Option<Challenge> {
        let withdrawn = self.challenging.take();
        self.menu_open = withdrawn.is_some();
        withdrawn
    }

    /// Apply a challenge descriptor seen on the wire.
    ///
    /// An empty descriptor from the peer when they had nothing pending means
    /// they rejected our challenge.
    pub fn update_from_wire(&mut self, from_self: bool, descriptor: &str) {
        let challenge = match descriptor.parse::<Challenge>() {
            Ok(challenge) => Some(challenge),
            Err(ParseError::MalformedDescriptor(_)) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable challenge descriptor");
                None
            }
        };

        if from_self {
            self.challenging = challenge;
            return;
        }

        if challenge.is_none() && self.challenged.is_none() {
            self.challenging = None;
        }
        self.challenged = challenge;
    }

    /// Record that we sent a challenge for `format`
    pub fn made(&mut self, format: &str) {
        self.menu_open = false;
        self.challenging = Some(Challenge::new(format));
    }

    /// Clear the incoming challenge after accepting it
    pub fn accepted(&mut self) -> Option<Challenge> {
        self.challenged.take()
    }

    /// Drop the incoming challenge locally
    pub fn reject(&mut self) -> Option<Challenge> {
        self.challenged.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_from_self_sets_outgoing() {
        let mut state = ChallengeState::new();
        state.update_from_wire(false, "gen9ou|gen9ou|hi");
        state.update_from_wire(true, "gen9ou|gen9ou");

        assert_eq!(state.outgoing(), Some(&Challenge::new("gen9ou")));
        assert_eq!(state.incoming().and_then(|c| c.message.as_deref()), Some("hi"));
    }

    #[test]
    fn test_update_from_self_empty_clears_outgoing() {
        let mut state = ChallengeState::new();
        state.made("gen9ou");
        state.update_from_wire(true, "");

        assert_eq!(state.outgoing(), None);
    }

    #[test]
    fn test_peer_empty_update_rejects_outgoing() {
        let mut state = ChallengeState::new();
        state.made("gen9ou");
        state.update_from_wire(false, "");

        assert_eq!(state.outgoing(), None);
        assert_eq!(state.incoming(), None);
    }

    #[test]
    fn test_peer_withdrawal_keeps_outgoing() {
        let mut state = ChallengeState::new();
        state.made("gen9ou");
        state.update_from_wire(false, "gen9ubers");
        state.update_from_wire(false, "");

        // the peer withdrew their own challenge, ours still stands
        assert_eq!(state.outgoing(), Some(&Challenge::new("gen9ou")));
        assert_eq!(state.incoming(), None);
    }

    #[test]
    fn test_cancel_with_outgoing_reopens_menu() {
        let mut state = ChallengeState::new();
        state.made("gen9ou");
        assert!(!state.is_menu_open());

        let withdrawn = state.cancel();
        assert_eq!(withdrawn, Some(Challenge::new("gen9ou")));
        assert!(state.is_menu_open());
    }

    #[test]
    fn test_cancel_without_outgoing_closes_menu() {
        let mut state = ChallengeState::new();
        state.open_menu();

        assert_eq!(state.cancel(), None);
        assert!(!state.is_menu_open());
    }

    #[test]
    fn test_accept_and_reject_clear_incoming() {
        let mut state = ChallengeState::new();
        state.update_from_wire(false, "gen9ou");
        assert!(state.accepted().is_some());
        assert_eq!(state.incoming(), None);

        state.update_from_wire(false, "gen9ou");
        assert!(state.reject().is_some());
        assert_eq!(state.incoming(), None);
    }
}
