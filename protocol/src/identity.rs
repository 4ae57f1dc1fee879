//! User identities and role groups.
//!
//! Display names on the wire carry a one-character group symbol in front of
//! the name (`@Blue`, ` Red`). The identity of a user is the name folded by
//! [`to_id`]; the symbol is looked up in a [`GroupTable`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::ParseError;

/// Suffix the server appends to display names of users marked away
pub const AWAY_SUFFIX: &str = "@!";

/// Fold a display name into a user identity: lowercase, `[a-z0-9]` only
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Leadership,
    Staff,
    Normal,
    User,
    Punishment,
}

/// A privilege tier. Lower `order` sorts first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub symbol: char,
    pub name: String,
    pub kind: GroupType,
    pub order: u32,
}

impl Group {
    fn new(symbol: char, name: &str, kind: GroupType, order: u32) -> Self {
        Self {
            symbol,
            name: name.to_string(),
            kind,
            order,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.kind, GroupType::Leadership | GroupType::Staff)
    }
}

#[derive(Deserialize)]
struct GroupEntry {
    symbol: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: GroupType,
}

/// Symbol to group lookup, with a fallback for unknown symbols
#[derive(Debug, Clone)]
pub struct GroupTable {
    groups: HashMap<char, Group>,
    default_group: Group,
}

impl GroupTable {
    /// Build a table from the server's JSON group list.
    ///
    /// The list is ordered from most to least privileged.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let entries: Vec<GroupEntry> = serde_json::from_str(json)
            .map_err(|e| ParseError::InvalidFormat(format!("invalid group list json: {}", e)))?;

        let mut table = Self {
            groups: HashMap::new(),
            default_group: Self::ordinary(),
        };

        for (index, entry) in entries.into_iter().enumerate() {
            let mut chars = entry.symbol.chars();
            let (Some(symbol), None) = (chars.next(), chars.next()) else {
                return Err(ParseError::InvalidFormat(format!(
                    "group symbol must be one character: {:?}",
                    entry.symbol
                ))
                .into());
            };
            let order = 100 + index as u32;
            if symbol == ' ' {
                table.default_group = Group::new(symbol, &entry.name, entry.kind, order);
            }
            table
                .groups
                .insert(symbol, Group::new(symbol, &entry.name, entry.kind, order));
        }

        Ok(table)
    }

    fn ordinary() -> Group {
        Group::new(' ', "", GroupType::User, 201)
    }

    /// Look up the group for a display-name symbol
    pub fn get_group(&self, symbol: char) -> &Group {
        self.groups.get(&symbol).unwrap_or(&self.default_group)
    }

    /// Group of a full display name such as `@Blue`
    pub fn group_of(&self, display_name: &str) -> &Group {
        match display_name.chars().next() {
            Some(symbol) => self.get_group(symbol),
            None => &self.default_group,
        }
    }
}

impl Default for GroupTable {
    fn default() -> Self {
        use GroupType::*;

        let groups = [
            Group::new('~', "Administrator", Leadership, 101),
            Group::new('#', "Room Owner", Leadership, 102),
            Group::new('&', "Administrator", Leadership, 103),
            Group::new('\u{2605}', "Host", Staff, 104),
            Group::new('@', "Moderator", Staff, 105),
            Group::new('%', "Driver", Staff, 106),
            Group::new('\u{00a7}', "Section Leader", Staff, 107),
            Group::new('*', "Bot", Normal, 109),
            Group::new('\u{2606}', "Player", Normal, 110),
            Group::new('+', "Voice", Normal, 200),
            Self::ordinary(),
            Group::new('!', "Muted", Punishment, 301),
            Group::new('\u{2716}', "Namelocked", Punishment, 302),
            Group::new('\u{203d}', "Locked", Punishment, 303),
        ];

        Self {
            groups: groups.into_iter().map(|g| (g.symbol, g)).collect(),
            default_group: Self::ordinary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_id() {
        assert_eq!(to_id(" Red"), "red");
        assert_eq!(to_id("@Mr. Mime@!"), "mrmime");
        assert_eq!(to_id("Zoë 42"), "zo42");
        assert_eq!(to_id(""), "");
    }

    #[test]
    fn test_default_groups() {
        let groups = GroupTable::default();

        assert_eq!(groups.get_group('@').kind, GroupType::Staff);
        assert_eq!(groups.get_group('~').kind, GroupType::Leadership);
        assert!(groups.get_group('~').order < groups.get_group('+').order);
        assert!(groups.get_group('+').order < groups.get_group(' ').order);
    }

    #[test]
    fn test_unknown_symbol_is_ordinary_user() {
        let groups = GroupTable::default();

        let unknown = groups.get_group('$');
        assert_eq!(unknown.kind, GroupType::User);
        assert_eq!(unknown.order, groups.get_group(' ').order);
        assert_eq!(groups.group_of("").kind, GroupType::User);
    }

    #[test]
    fn test_groups_from_json() {
        let json = r#"[
            {"symbol": "~", "name": "Admin", "type": "leadership"},
            {"symbol": "+", "name": "Voice", "type": "normal"},
            {"symbol": " ", "type": "user"}
        ]"#;
        let groups = GroupTable::from_json(json).unwrap();

        assert_eq!(groups.get_group('~').name, "Admin");
        assert!(groups.get_group('~').order < groups.get_group('+').order);
        assert_eq!(groups.get_group('@').order, groups.get_group(' ').order);
        assert!(!groups.group_of("+Red").is_staff());
    }

    #[test]
    fn test_groups_from_json_invalid() {
        assert!(GroupTable::from_json("not json").is_err());
        assert!(GroupTable::from_json(r#"[{"symbol": "~~", "type": "staff"}]"#).is_err());
    }
}
