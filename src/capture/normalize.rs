//! Key-event normalization: [`RawKeyEvent`] → canonical [`Token`].
//!
//! Both capture sources feed this one function, so window-scoped and global
//! sessions write identical text for the same keys. Normalization is pure and
//! safe to call from the hook thread.

use super::RawKeyEvent;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Canonical string unit written to the log for one key event.
///
/// One of: a single printable character, a control escape (`"\n"`, `"\t"`,
/// `" "`), a bracketed tag (`"[BACKSPACE]"`, `"[ARROW_LEFT]"`, …), or empty,
/// meaning "suppress — do not log". Tokens are the only unit ever written to
/// the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// The suppression token: nothing is written for it.
    pub fn empty() -> Self {
        Token(String::new())
    }

    /// `true` for the suppression token.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Map a raw key event to the token written to the log.
///
/// Priority order:
///
/// 1. A printable character (any Unicode, not a control character) is
///    returned verbatim as a one-character token.
/// 2. A recognized symbolic name (case-insensitive) maps through the fixed
///    table — see [`symbolic_token`].
/// 3. An unrecognized non-empty name becomes `[NAME]`, uppercased, so no key
///    is silently dropped.
/// 4. Anything else is suppressed (empty token).
pub fn normalize(event: &RawKeyEvent) -> Token {
    if let Some(ch) = event.printable {
        if !ch.is_control() {
            return Token(ch.to_string());
        }
    }

    let name = match event.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Token::empty(),
    };

    if let Some(token) = symbolic_token(&name.to_lowercase()) {
        return Token(token.to_string());
    }
    Token(format!("[{}]", name.to_uppercase()))
}

/// Fixed table of recognized symbolic names (already lowercased by the
/// caller). Left/right modifier variants collapse to one tag.
fn symbolic_token(name: &str) -> Option<&'static str> {
    Some(match name {
        "space" => " ",
        "enter" | "return" => "\n",
        "tab" => "\t",
        "backspace" => "[BACKSPACE]",
        "escape" | "esc" => "[ESC]",
        "shift" | "shift_l" | "shift_r" => "[SHIFT]",
        "control" | "ctrl" | "control_l" | "control_r" => "[CTRL]",
        "alt" | "alt_l" | "alt_r" => "[ALT]",
        "caps_lock" | "capslock" => "[CAPSLOCK]",
        "left" => "[ARROW_LEFT]",
        "right" => "[ARROW_RIGHT]",
        "up" => "[ARROW_UP]",
        "down" => "[ARROW_DOWN]",
        "delete" => "[DEL]",
        "insert" => "[INS]",
        "home" => "[HOME]",
        "end" => "[END]",
        "page_up" => "[PAGE_UP]",
        "page_down" => "[PAGE_DOWN]",
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::KeySource;

    fn printable(ch: char) -> RawKeyEvent {
        RawKeyEvent::printable(ch, KeySource::WindowScoped)
    }

    fn named(name: &str) -> RawKeyEvent {
        RawKeyEvent::named(name, KeySource::Global)
    }

    #[test]
    fn printable_characters_pass_through_verbatim() {
        for ch in ['a', 'Z', '7', '?', 'é', 'ß', 'ก', '字', '€'] {
            assert_eq!(normalize(&printable(ch)).as_str(), ch.to_string());
        }
    }

    #[test]
    fn control_character_is_not_treated_as_printable() {
        // A control char in the printable slot falls through to the name.
        let event = RawKeyEvent {
            printable: Some('\u{8}'),
            name: Some("backspace".into()),
            source: KeySource::Global,
        };
        assert_eq!(normalize(&event).as_str(), "[BACKSPACE]");

        // With no name either, the event is suppressed.
        assert!(normalize(&printable('\u{8}')).is_empty());
    }

    #[test]
    fn printable_takes_priority_over_name() {
        let event = RawKeyEvent {
            printable: Some('a'),
            name: Some("left".into()),
            source: KeySource::WindowScoped,
        };
        assert_eq!(normalize(&event).as_str(), "a");
    }

    #[test]
    fn table_lookup_is_case_insensitive() {
        assert_eq!(normalize(&named("Left")).as_str(), "[ARROW_LEFT]");
        assert_eq!(normalize(&named("LEFT")).as_str(), "[ARROW_LEFT]");
        assert_eq!(normalize(&named("RETURN")).as_str(), "\n");
        assert_eq!(normalize(&named("Enter")).as_str(), "\n");
        assert_eq!(normalize(&named("ESCAPE")).as_str(), "[ESC]");
    }

    #[test]
    fn whitespace_escapes() {
        assert_eq!(normalize(&named("space")).as_str(), " ");
        assert_eq!(normalize(&named("return")).as_str(), "\n");
        assert_eq!(normalize(&named("tab")).as_str(), "\t");
    }

    #[test]
    fn bracketed_tags() {
        assert_eq!(normalize(&named("backspace")).as_str(), "[BACKSPACE]");
        assert_eq!(normalize(&named("escape")).as_str(), "[ESC]");
        assert_eq!(normalize(&named("caps_lock")).as_str(), "[CAPSLOCK]");
        assert_eq!(normalize(&named("delete")).as_str(), "[DEL]");
        assert_eq!(normalize(&named("insert")).as_str(), "[INS]");
        assert_eq!(normalize(&named("home")).as_str(), "[HOME]");
        assert_eq!(normalize(&named("end")).as_str(), "[END]");
        assert_eq!(normalize(&named("page_up")).as_str(), "[PAGE_UP]");
        assert_eq!(normalize(&named("page_down")).as_str(), "[PAGE_DOWN]");
        assert_eq!(normalize(&named("up")).as_str(), "[ARROW_UP]");
        assert_eq!(normalize(&named("down")).as_str(), "[ARROW_DOWN]");
        assert_eq!(normalize(&named("right")).as_str(), "[ARROW_RIGHT]");
    }

    #[test]
    fn left_and_right_modifiers_collapse() {
        for name in ["shift", "shift_l", "shift_r"] {
            assert_eq!(normalize(&named(name)).as_str(), "[SHIFT]");
        }
        for name in ["control", "ctrl", "control_l", "control_r"] {
            assert_eq!(normalize(&named(name)).as_str(), "[CTRL]");
        }
        for name in ["alt", "alt_l", "alt_r"] {
            assert_eq!(normalize(&named(name)).as_str(), "[ALT]");
        }
    }

    #[test]
    fn unrecognized_name_becomes_bracketed_uppercase() {
        assert_eq!(normalize(&named("Foo")).as_str(), "[FOO]");
        assert_eq!(normalize(&named("f5")).as_str(), "[F5]");
        assert_eq!(normalize(&named("print_screen")).as_str(), "[PRINT_SCREEN]");
    }

    #[test]
    fn event_with_neither_field_is_suppressed() {
        let event = RawKeyEvent {
            printable: None,
            name: None,
            source: KeySource::WindowScoped,
        };
        assert!(normalize(&event).is_empty());

        assert!(normalize(&named("")).is_empty());
    }
}
