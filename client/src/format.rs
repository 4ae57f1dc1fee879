//! Inline formatting toggles over plain text.
//!
//! Offsets are character offsets, not byte offsets.

/// Wrap or unwrap the selection `start..end` of `text` in a doubled
/// `format_char` (`**bold**`, `__italic__`, ``` ``code`` ```).
///
/// Applying a marker right next to an identical one removes both instead of
/// stacking them, so toggling twice restores the original text. Only one
/// layer is collapsed; deeper nesting is left as is.
pub fn toggle_format_char(
    text: &str,
    start: usize,
    end: usize,
    format_char: char,
) -> (String, usize, usize) {
    let mut chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let (mut start, mut end) = (start.min(end).min(len), end.max(start).min(len));
    let is_marker = |chars: &[char], index: usize, back: usize| {
        index
            .checked_sub(back)
            .and_then(|i| chars.get(i))
            .is_some_and(|&c| c == format_char)
    };

    // keep the selection boundaries from splitting an existing marker
    if start < end
        && is_marker(&chars, start, 0)
        && is_marker(&chars, start, 1)
        && !is_marker(&chars, start, 2)
    {
        start += 1;
    }
    if start < end
        && is_marker(&chars, end, 0)
        && is_marker(&chars, end, 1)
        && !is_marker(&chars, end, 2)
    {
        end -= 1;
    }

    for index in [end, end, start, start] {
        chars.insert(index, format_char);
    }
    start += 2;
    end += 2;

    let nesting = [format_char; 4];
    let nested_at = |chars: &[char], from: Option<usize>| {
        from.and_then(|from| chars.get(from..from + 4))
            .is_some_and(|window| window == nesting)
    };

    if nested_at(&chars, start.checked_sub(4)) {
        chars.drain(start - 4..start);
        start -= 4;
        end -= 4;
    } else if start != end && nested_at(&chars, start.checked_sub(2)) {
        chars.drain(start - 2..start + 2);
        start -= 2;
        end = end.saturating_sub(4);
    }
    end = end.max(start);

    if nested_at(&chars, Some(end)) {
        chars.drain(end..end + 4);
    } else if start != end && nested_at(&chars, end.checked_sub(2)) {
        chars.drain(end - 2..end + 2);
        end -= 2;
    }

    let len = chars.len();
    let start = start.min(len);
    let end = end.clamp(start, len);
    (chars.into_iter().collect(), start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(text: &str, start: usize, end: usize) -> (String, usize, usize) {
        toggle_format_char(text, start, end, '*')
    }

    #[test]
    fn test_wrap_selection() {
        assert_eq!(toggle("hello", 0, 5), ("**hello**".to_string(), 2, 7));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let (text, start, end) = toggle("hello", 0, 5);
        assert_eq!(toggle(&text, start, end), ("hello".to_string(), 0, 5));
    }

    #[test]
    fn test_unwrap_when_markers_selected() {
        assert_eq!(toggle("**hello**", 0, 9), ("hello".to_string(), 0, 5));
    }

    #[test]
    fn test_selection_splitting_marker_snaps_inside() {
        // "*hello*" selected inside "**hello**"
        assert_eq!(toggle("**hello**", 1, 8), ("hello".to_string(), 0, 5));
    }

    #[test]
    fn test_wrap_middle_word() {
        assert_eq!(
            toggle_format_char("say hi now", 4, 6, '_'),
            ("say __hi__ now".to_string(), 6, 8)
        );
    }

    #[test]
    fn test_empty_selection_inserts_pair() {
        assert_eq!(toggle("", 0, 0), ("****".to_string(), 2, 2));
        assert_eq!(toggle("****", 2, 2), ("".to_string(), 0, 0));
    }

    #[test]
    fn test_other_marker_is_left_alone() {
        assert_eq!(
            toggle_format_char("**hi**", 2, 4, '_'),
            ("**__hi__**".to_string(), 4, 6)
        );
    }

    #[test]
    fn test_only_one_layer_collapses() {
        assert_eq!(
            toggle("******hi******", 6, 8),
            ("****hi****".to_string(), 4, 6)
        );
    }

    #[test]
    fn test_multibyte_offsets() {
        assert_eq!(toggle("héllo", 1, 3), ("h**él**lo".to_string(), 3, 5));
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        assert_eq!(toggle("hi", 5, 1), ("h**i**".to_string(), 3, 4));
    }
}
