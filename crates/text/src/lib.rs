use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([A-Za-z]+)\}").unwrap());

/// The chat colors understood by the game client. Each one is sent as a
/// single control character in front of the colored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatColor {
    Default,
    White,
    DarkRed,
    LightPurple,
    Green,
    Olive,
    Lime,
    Red,
    Grey,
    Yellow,
    Silver,
    Blue,
    DarkBlue,
    BlueGrey,
    Magenta,
    LightRed,
    Gold,
}

impl ChatColor {
    /// Parses a tag name such as `GREEN` or `lightred`.
    pub fn parse(tag: &str) -> Option<ChatColor> {
        Some(match tag.to_ascii_lowercase().as_str() {
            "default" => ChatColor::Default,
            "white" => ChatColor::White,
            "darkred" => ChatColor::DarkRed,
            "lightpurple" | "purple" => ChatColor::LightPurple,
            "green" => ChatColor::Green,
            "olive" | "lightgreen" => ChatColor::Olive,
            "lime" => ChatColor::Lime,
            "red" => ChatColor::Red,
            "grey" | "gray" => ChatColor::Grey,
            "yellow" | "lightyellow" => ChatColor::Yellow,
            "silver" => ChatColor::Silver,
            "blue" | "lightblue" => ChatColor::Blue,
            "darkblue" => ChatColor::DarkBlue,
            "bluegrey" => ChatColor::BlueGrey,
            "magenta" => ChatColor::Magenta,
            "lightred" => ChatColor::LightRed,
            "gold" | "orange" => ChatColor::Gold,
            _ => return None,
        })
    }

    pub fn control_char(self) -> char {
        match self {
            ChatColor::Default | ChatColor::White => '\x01',
            ChatColor::DarkRed => '\x02',
            ChatColor::LightPurple => '\x03',
            ChatColor::Green => '\x04',
            ChatColor::Olive => '\x05',
            ChatColor::Lime => '\x06',
            ChatColor::Red => '\x07',
            ChatColor::Grey => '\x08',
            ChatColor::Yellow => '\x09',
            ChatColor::Silver => '\x0A',
            ChatColor::Blue => '\x0B',
            ChatColor::DarkBlue => '\x0C',
            ChatColor::BlueGrey => '\x0D',
            ChatColor::Magenta => '\x0E',
            ChatColor::LightRed => '\x0F',
            ChatColor::Gold => '\x10',
        }
    }
}

/// Replaces every known `{COLOR}` tag with its control character.
/// Unknown tags are left untouched so that format placeholders survive.
pub fn colorize(message: &str) -> String {
    TAG_REGEX
        .replace_all(message, |caps: &Captures<'_>| match ChatColor::parse(&caps[1]) {
            Some(color) => color.control_char().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Removes color tags and control characters, for output that is not a game client.
pub fn strip_colors(message: &str) -> String {
    let untagged = TAG_REGEX.replace_all(message, |caps: &Captures<'_>| {
        if ChatColor::parse(&caps[1]).is_some() {
            String::new()
        } else {
            caps[0].to_string()
        }
    });
    untagged
        .chars()
        .filter(|c| !('\x01'..='\x10').contains(c))
        .collect()
}

/// A single line of chat sent to one player. The message is sent as is,
/// only the prefix has its color tags replaced.
#[derive(Debug, Clone)]
pub struct ChatLine {
    prefix: String,
    message: String,
}

impl ChatLine {
    pub fn new(prefix: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            message: message.into(),
        }
    }

    /// The wire form of the line. The leading space keeps the client from
    /// swallowing a color code in the first position.
    pub fn encode(&self) -> String {
        if self.prefix.is_empty() {
            format!(" {}", self.message)
        } else {
            format!(" {} {}", colorize(&self.prefix), self.message)
        }
    }
}

impl fmt::Display for ChatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
