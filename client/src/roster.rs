//! Users present in a room.

use std::collections::HashMap;

use banter_protocol::{AWAY_SUFFIX, GroupTable, to_id};

/// Present users keyed by identity, with the display name as sent by the
/// server (group symbol prefix and optional away suffix included).
#[derive(Debug, Clone, Default)]
pub struct UserRoster {
    users: HashMap<String, String>,
    count: usize,
}

/// A roster row ready for presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub symbol: char,
    pub away: bool,
}

impl RosterEntry<'_> {
    /// Name without group symbol or away marker
    pub fn display_name(&self) -> &str {
        let name = self.name.strip_suffix(AWAY_SUFFIX).unwrap_or(self.name);
        let mut chars = name.chars();
        chars.next();
        chars.as_str()
    }
}

impl UserRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole roster.
    ///
    /// `count` is the server's declared user count. The stored count always
    /// follows the names actually present.
    pub fn set_all<I, S>(&mut self, count: usize, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.users.clear();
        for name in names {
            let name = name.as_ref();
            let id = to_id(name);
            if !id.is_empty() {
                self.users.insert(id, name.to_string());
            }
        }
        self.count = self.users.len();

        if count != self.count {
            tracing::debug!(declared = count, actual = self.count, "Roster count mismatch");
        }
    }

    /// Add or update a user. Returns true if the identity was new.
    pub fn add(&mut self, name: &str) -> bool {
        let id = to_id(name);
        if id.is_empty() {
            return false;
        }
        let is_new = self.users.insert(id, name.to_string()).is_none();
        if is_new {
            self.count += 1;
        }
        is_new
    }

    /// Remove a user. Returns false if they were not present.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.users.remove(&to_id(name)).is_some();
        if removed {
            self.count -= 1;
        }
        removed
    }

    pub fn rename(&mut self, new_name: &str, old_name: &str) {
        self.remove(old_name);
        self.add(new_name);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    /// Display name for an identity
    pub fn get(&self, id: &str) -> Option<&str> {
        self.users.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.users.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Users in presentation order: by group rank, present before away,
    /// then by identity.
    pub fn sorted<'a>(&'a self, groups: &GroupTable) -> Vec<RosterEntry<'a>> {
        let mut entries: Vec<RosterEntry<'a>> = self
            .iter()
            .map(|(id, name)| RosterEntry {
                id,
                name,
                symbol: name.chars().next().unwrap_or(' '),
                away: name.ends_with(AWAY_SUFFIX),
            })
            .collect();

        entries.sort_by(|a, b| {
            let rank_a = groups.get_group(a.symbol).order;
            let rank_b = groups.get_group(b.symbol).order;
            rank_a
                .cmp(&rank_b)
                .then(a.away.cmp(&b.away))
                .then_with(|| a.id.cmp(b.id))
        });
        entries
    }
}
