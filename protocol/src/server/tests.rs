#[cfg(test)]
mod tests {
    use crate::{Challenge, ParseError, parse_challenge, parse_server_frame, tokenize_line};

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_join() {
        assert_eq!(tokenize_line("|j| Pikachu"), tokens(&["j", " Pikachu"]));
    }

    #[test]
    fn test_tokenize_chat_keeps_pipes_in_body() {
        let line = "|c|+Red|/challenge gen9ou|gen9ou|hi|Go|No";
        assert_eq!(
            tokenize_line(line),
            tokens(&["c", "+Red", "/challenge gen9ou|gen9ou|hi|Go|No"])
        );
    }

    #[test]
    fn test_tokenize_timestamped_chat() {
        let line = "|c:|1700000000| Blue|hello | world";
        assert_eq!(
            tokenize_line(line),
            tokens(&["c:", "1700000000", " Blue", "hello | world"])
        );
    }

    #[test]
    fn test_tokenize_customgroups_keeps_json() {
        let line = r#"|customgroups|[{"symbol":"+","name":"Voice|x","type":"normal"}]"#;
        assert_eq!(
            tokenize_line(line),
            tokens(&["customgroups", r#"[{"symbol":"+","name":"Voice|x","type":"normal"}]"#])
        );
    }

    #[test]
    fn test_tokenize_rename_splits_every_field() {
        assert_eq!(
            tokenize_line("|N|@Red@!|red"),
            tokens(&["N", "@Red@!", "red"])
        );
    }

    #[test]
    fn test_tokenize_html_is_one_field() {
        assert_eq!(
            tokenize_line("|html|<b>a|b</b>"),
            tokens(&["html", "<b>a|b</b>"])
        );
    }

    #[test]
    fn test_tokenize_plain_text() {
        assert_eq!(tokenize_line("hello there"), tokens(&["", "hello there"]));
    }

    #[test]
    fn test_tokenize_bare_tag() {
        assert_eq!(tokenize_line("|deinit"), tokens(&["deinit"]));
    }

    #[test]
    fn test_parse_frame_with_room() {
        let frame = ">lobby\n|users|2, Red,@Blue\n\n|j| Green";
        let parsed = parse_server_frame(frame).unwrap();

        assert_eq!(parsed.room_id.as_deref(), Some("lobby"));
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0], tokens(&["users", "2, Red,@Blue"]));
        assert_eq!(parsed.lines[1], tokens(&["j", " Green"]));
    }

    #[test]
    fn test_parse_frame_without_room() {
        let parsed = parse_server_frame("|updateuser| Red|1|1").unwrap();

        assert_eq!(parsed.room_id, None);
        assert_eq!(parsed.lines, vec![tokens(&["updateuser", " Red", "1", "1"])]);
    }

    #[test]
    fn test_parse_frame_empty() {
        assert!(parse_server_frame("").is_err());
        assert!(parse_server_frame(">\n|j| Red").is_err());
    }

    #[test]
    fn test_parse_challenge_full() {
        let challenge = parse_challenge("gen9ou|gen9ou|hi|Go|No").unwrap();

        assert_eq!(
            challenge,
            Challenge {
                format_name: "gen9ou".to_string(),
                team_format: "gen9ou".to_string(),
                message: Some("hi".to_string()),
                accept_button_label: Some("Go".to_string()),
                reject_button_label: Some("No".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_challenge_ignores_extra_fields() {
        let challenge = parse_challenge("f|t|m|a|r|extra").unwrap();

        assert_eq!(challenge.team_format, "t");
        assert_eq!(challenge.reject_button_label.as_deref(), Some("r"));
    }

    #[test]
    fn test_parse_challenge_team_format_defaults() {
        let challenge = parse_challenge("gen9ubers").unwrap();
        assert_eq!(challenge.team_format, "gen9ubers");

        let challenge = parse_challenge("gen9ubers||gl").unwrap();
        assert_eq!(challenge.team_format, "gen9ubers");
        assert_eq!(challenge.message.as_deref(), Some("gl"));
    }

    #[test]
    fn test_parse_challenge_message_only() {
        let challenge = parse_challenge("||Play a game?").unwrap();

        assert_eq!(challenge.format_name, "");
        assert_eq!(challenge.message.as_deref(), Some("Play a game?"));
    }

    #[test]
    fn test_parse_challenge_absent() {
        assert_eq!(parse_challenge(""), None);
        assert_eq!(parse_challenge("|gen9ou"), None);

        let err = "".parse::<Challenge>().unwrap_err();
        assert!(matches!(err, ParseError::MalformedDescriptor(_)));
    }
}
