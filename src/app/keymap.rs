//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only the detail screen's top-level commands are configurable. Keys inside
//! the update form and the delete prompt are fixed, since they double as
//! text input and button navigation.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions on the account detail screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Leave the screen.
    Back,
    /// Fetch the account again.
    Refresh,
    /// Open the update form for account fields.
    EditAccount,
    /// Open the update form for personal fields.
    EditPersonal,
    /// Open the delete confirmation prompt.
    RequestDelete,
    /// Display the help modal.
    OpenHelp,
    /// Swallow the key.
    Ignore,
}

const ACTIONS: [KeyAction; 7] = [
    KeyAction::Back,
    KeyAction::Refresh,
    KeyAction::EditAccount,
    KeyAction::EditPersonal,
    KeyAction::RequestDelete,
    KeyAction::OpenHelp,
    KeyAction::Ignore,
];

/// Mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Back);
        bindings.insert((M::NONE, Esc), KeyAction::Back);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Char('a')), KeyAction::EditAccount);
        bindings.insert((M::NONE, Char('p')), KeyAction::EditPersonal);
        bindings.insert((M::NONE, Char('d')), KeyAction::RequestDelete);
        bindings.insert((M::NONE, Delete), KeyAction::RequestDelete);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        // Some terminals report '?' with SHIFT held
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);
        Self { bindings }
    }

    /// Load `path`, falling back to the user config dirs, else write defaults to `path`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default keybindings");
        }
        km
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse `Action = KeySpec` lines on top of the defaults.
    ///
    /// The reversed `KeySpec = Action` form is accepted as well. Lines that
    /// match neither are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# account-admin keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Delete, Backspace, F5, r, a, p, d, ?\n");
        let names: Vec<&str> = ACTIONS.iter().map(|a| format_action(*a)).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut rows: Vec<(String, &str)> = self
            .bindings
            .iter()
            .filter(|((mods, _), _)| !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), action)| (Self::format_key(*mods, *code), format_action(*action)))
            .collect();
        rows.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in rows {
            let _ = writeln!(&mut buf, "{} = {}", action, key);
        }
        if let Some(dir) = std::path::Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted, for help text.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .filter(|((mods, _), _)| !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key like "Ctrl+q", "Delete" or "?".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Backspace => "Backspace".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            F(n) => format!("F{n}"),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let (mods, rest) = match spec.trim().strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, spec.trim()),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Backspace" => Backspace,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        _ => {
            if let Some(n) = rest.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                F(n)
            } else {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Char(c),
                    _ => return None,
                }
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ACTIONS.iter().copied().find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Back => "Back",
        KeyAction::Refresh => "Refresh",
        KeyAction::EditAccount => "EditAccount",
        KeyAction::EditPersonal => "EditPersonal",
        KeyAction::RequestDelete => "RequestDelete",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::Ignore => "Ignore",
    }
}
