use banter_protocol::to_id;

/// Information about the currently logged-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    /// Display name without the group symbol
    pub username: String,
    pub userid: String,
    /// False while the server still has us under a guest name
    pub named: bool,
    pub avatar: String,
}

impl UserInfo {
    /// Build from the fields of an `updateuser` line. The server may prefix
    /// the name with a group symbol.
    pub fn from_update(name: &str, named: &str, avatar: &str) -> Self {
        let name = name.trim();
        let username = match name.chars().next() {
            Some(c) if !c.is_alphanumeric() => &name[c.len_utf8()..],
            _ => name,
        };
        Self {
            username: username.to_string(),
            userid: to_id(username),
            named: named == "1",
            avatar: avatar.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_update_strips_group_symbol() {
        let user = UserInfo::from_update("@Red Oak", "1", "red");
        assert_eq!(user.username, "Red Oak");
        assert_eq!(user.userid, "redoak");
        assert!(user.named);
        assert_eq!(user.avatar, "red");
    }

    #[test]
    fn test_from_update_guest() {
        let user = UserInfo::from_update(" Guest 12", "0", "");
        assert_eq!(user.username, "Guest 12");
        assert_eq!(user.userid, "guest12");
        assert!(!user.named);
    }
}
