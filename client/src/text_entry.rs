//! Draft buffer of a room's input box: text, selection and sent-line history.

use crate::config::ClientConfig;
use crate::format::toggle_format_char;

/// Character offsets into the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Up,
    Down,
    Escape,
    Char(char),
}

/// A key press with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Exactly one of Ctrl/Cmd, and no Alt or Shift
    fn is_command(&self) -> bool {
        (self.ctrl != self.meta) && !self.alt && !self.shift
    }
}

/// What happened to a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not ours; let the surrounding surface have it
    Ignored,
    Handled,
    /// The draft was submitted and should be sent
    Submitted(String),
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

/// Renders the draft for display
pub trait MarkupFormatter {
    fn format_text(&self, raw: &str) -> String;
}

impl<F> MarkupFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format_text(&self, raw: &str) -> String {
        self(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub rendered: String,
    pub empty: bool,
}

#[derive(Debug, Clone)]
pub struct TextEntry {
    value: String,
    selection: Selection,
    history: Vec<String>,
    /// `history.len()` when not browsing history
    history_index: usize,
    history_capacity: usize,
    history_trim: usize,
}

impl Default for TextEntry {
    fn default() -> Self {
        Self::with_config(&ClientConfig::default())
    }
}

impl TextEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ClientConfig) -> Self {
        Self {
            value: String::new(),
            selection: Selection::default(),
            history: Vec::new(),
            history_index: 0,
            history_capacity: config.history_capacity,
            history_trim: config.history_trim,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_index(&self) -> usize {
        self.history_index
    }

    /// Replace the draft. Without a selection the caret goes to the end.
    pub fn set_value(&mut self, value: impl Into<String>, selection: Option<Selection>) {
        self.value = value.into();
        let len = self.value.chars().count();
        self.selection = match selection {
            Some(sel) => {
                let start = sel.start.min(sel.end).min(len);
                Selection::new(start, sel.end.max(sel.start).min(len))
            }
            None => Selection::caret(len),
        };
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        let value = std::mem::take(&mut self.value);
        self.set_value(value, Some(Selection::new(start, end)));
    }

    /// Replace the selected text and put the caret after the insertion
    pub fn replace_selection(&mut self, text: &str) {
        let Selection { start, end } = self.selection;
        let mut value: String = self.value.chars().take(start).collect();
        value.push_str(text);
        let caret = value.chars().count();
        value.extend(self.value.chars().skip(end));
        self.set_value(value, Some(Selection::caret(caret)));
    }

    /// Take the draft for sending and remember it in history
    pub fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.value);
        self.history_push(&line);
        self.set_value(String::new(), None);
        line
    }

    /// Step back through history. Returns false at the oldest entry.
    pub fn history_up(&mut self) -> bool {
        if self.history_index == 0 {
            return false;
        }
        self.stash_draft();
        self.history_index -= 1;
        let line = self.history[self.history_index].clone();
        self.set_value(line, None);
        true
    }

    /// Step forward through history. Returns false when there is nothing to
    /// do: already past the newest entry with an empty draft.
    pub fn history_down(&mut self) -> bool {
        self.stash_draft();
        if self.history_index >= self.history.len() {
            // nothing was stashed, so the draft is already empty
            return false;
        }
        self.history_index += 1;
        match self.history.get(self.history_index) {
            Some(line) => {
                let line = line.clone();
                self.set_value(line, None);
            }
            None => self.set_value(String::new(), None),
        }
        true
    }

    pub fn history_push(&mut self, line: &str) {
        if let Some(duplicate) = self.history.iter().rposition(|entry| entry == line) {
            self.history.remove(duplicate);
        }
        self.history.push(line.to_string());
        if self.history.len() > self.history_capacity {
            let trim = self.history_trim.min(self.history.len());
            self.history.drain(..trim);
        }
        self.history_index = self.history.len();
    }

    /// Keep an unsent draft at the current history position
    fn stash_draft(&mut self) {
        if self.value.is_empty() {
            return;
        }
        match self.history.get_mut(self.history_index) {
            Some(entry) => entry.clone_from(&self.value),
            None => self.history.push(self.value.clone()),
        }
    }

    pub fn toggle_format_char(&mut self, format_char: char) -> bool {
        let Selection { start, end } = self.selection;
        let (value, start, end) = toggle_format_char(&self.value, start, end, format_char);
        self.set_value(value, Some(Selection::new(start, end)));
        true
    }

    pub fn handle_key(&mut self, press: KeyPress) -> KeyOutcome {
        let handled = match press.key {
            Key::Enter if !press.shift => return KeyOutcome::Submitted(self.submit()),
            Key::Enter => {
                self.replace_selection("\n");
                true
            }
            Key::Char('i' | 'I') if press.is_command() => self.toggle_format_char('_'),
            Key::Char('b' | 'B') if press.is_command() => self.toggle_format_char('*'),
            Key::Char('`') if press.is_command() => self.toggle_format_char('`'),
            Key::Up if !press.shift && !press.alt => self.history_up(),
            Key::Down if !press.shift && !press.alt => self.history_down(),
            _ => false,
        };

        if handled {
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }

    /// Render the draft through a markup formatter
    pub fn project(&self, formatter: &impl MarkupFormatter) -> Projection {
        Projection {
            rendered: formatter.format_text(&self.value),
            empty: self.value.is_empty(),
        }
    }
}
