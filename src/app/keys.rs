use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const SCRIPT_KEYS_ENV: &str = "LOOPWRIGHT_SCRIPT_KEYS";
const NAMED_TOKENS: &str =
    "up,down,left,right,tab,shift-tab,enter,space,esc,backspace,pgup,pgdn,home,end,ctrl-c,ctrl-o,ctrl-r,ctrl-s,<single char>";

pub fn is_quit_key(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Parses a comma separated key script such as `down,enter,a,tab,enter`.
pub fn parse_scripted_keys(raw: &str) -> Result<Vec<KeyEvent>, String> {
    let mut keys = Vec::new();
    for token in raw.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut chars = trimmed.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            keys.push(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
            continue;
        }
        let key = match trimmed.to_ascii_lowercase().as_str() {
            "up" => KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            "down" => KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            "left" => KeyEvent::new(KeyCode::Left, KeyModifiers::NONE),
            "right" => KeyEvent::new(KeyCode::Right, KeyModifiers::NONE),
            "tab" => KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
            "shift-tab" => KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            "enter" => KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            "space" => KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE),
            "esc" => KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            "backspace" => KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
            "pgup" => KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE),
            "pgdn" => KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE),
            "home" => KeyEvent::new(KeyCode::Home, KeyModifiers::NONE),
            "end" => KeyEvent::new(KeyCode::End, KeyModifiers::NONE),
            "ctrl-c" => KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            "ctrl-o" => KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL),
            "ctrl-r" => KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
            "ctrl-s" => KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            other => {
                return Err(format!(
                    "invalid {SCRIPT_KEYS_ENV} token `{other}`; valid tokens: {NAMED_TOKENS}"
                ));
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_single_char_tokens() {
        let keys = parse_scripted_keys("down, enter,a,shift-tab,,ctrl-c,G").expect("parse");
        let codes: Vec<KeyCode> = keys.iter().map(|key| key.code).collect();
        assert_eq!(
            codes,
            vec![
                KeyCode::Down,
                KeyCode::Enter,
                KeyCode::Char('a'),
                KeyCode::BackTab,
                KeyCode::Char('c'),
                KeyCode::Char('G'),
            ]
        );
        assert!(is_quit_key(&keys[4]));
        assert!(!is_quit_key(&keys[2]));
    }

    #[test]
    fn rejects_unknown_tokens_with_valid_list() {
        let err = parse_scripted_keys("down,jump").expect_err("invalid token");
        assert!(err.contains("`jump`"));
        assert!(err.contains("shift-tab"));
    }
}
