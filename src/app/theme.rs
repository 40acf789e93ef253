//! Color theme, loaded from and saved to a `key = value` file.

use ratatui::style::Color;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub danger: Color,
    pub success: Color,
}

const KEYS: [&str; 11] = [
    "text",
    "muted",
    "title",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "danger",
    "success",
];

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
        }
    }

    /// Catppuccin Mocha palette, the default.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            danger: Color::Rgb(0xf3, 0x8b, 0xa8),       // red
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "danger" => &mut self.danger,
            "success" => &mut self.success,
            _ => return None,
        })
    }

    /// Parse theme text. Unknown keys and unparsable colors keep the `mocha` value.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot(key.trim()), parse_color(val)) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# account-admin theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        let mut copy = *self;
        for key in KEYS {
            if let Some(color) = copy.slot(key) {
                let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(*color));
            }
        }
        if let Some(dir) = std::path::Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the default theme there when it does not exist yet.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = crate::app::config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(e) = theme.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Parse "#RRGGBB", "RRGGBB" or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Reset => "reset".to_string(),
        Color::Black => "#000000".to_string(),
        Color::Red => "#FF0000".to_string(),
        Color::Green => "#00FF00".to_string(),
        Color::Yellow => "#FFFF00".to_string(),
        Color::Blue => "#0000FF".to_string(),
        Color::Magenta => "#FF00FF".to_string(),
        Color::Cyan => "#00FFFF".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::LightRed => "#FF6666".to_string(),
        Color::LightGreen => "#66FF66".to_string(),
        Color::LightYellow => "#FFFF66".to_string(),
        Color::LightBlue => "#6666FF".to_string(),
        Color::LightMagenta => "#FF66FF".to_string(),
        Color::LightCyan => "#66FFFF".to_string(),
        Color::White => "#FFFFFF".to_string(),
        // no hex form
        Color::Indexed(_) => "reset".to_string(),
    }
}
