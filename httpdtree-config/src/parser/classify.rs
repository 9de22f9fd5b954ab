//! Line classifier for httpd configuration files
//!
//! Every input line is one of:
//! - comment: any line containing `#` (skipped)
//! - `<Tag param>` section open
//! - `</Tag>` section close
//! - `Name value...` directive
//! - anything else (blank lines, bare words), which is skipped
//!
//! Patterns are tried in that order and the first match wins, so a `#`
//! anywhere on a line hides the whole line, including a directive before
//! it. The compiled patterns are shared, immutable statics; all match
//! state is local to a single [`classify`] call.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#.*").expect("comment pattern is valid"));

static SECTION_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*<([^/\s>]+)\s*([^>]+)?>").expect("section open pattern is valid")
});

static SECTION_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*</\s*([^\s>]+)\s*>").expect("section close pattern is valid")
});

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+(\S.*)").expect("directive pattern is valid"));

/// What a single line of input represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Comment,

    /// `<name param>`; `param` is empty when the tag has none
    SectionOpen { name: &'a str, param: &'a str },

    /// `</name>`
    SectionClose { name: &'a str },

    /// `name content`, content kept verbatim
    Directive { name: &'a str, content: &'a str },

    Unrecognized,
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Comment => write!(f, "comment"),
            Line::SectionOpen { name, .. } => write!(f, "<{}>", name),
            Line::SectionClose { name } => write!(f, "</{}>", name),
            Line::Directive { name, .. } => write!(f, "directive {}", name),
            Line::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Classify one line of input
pub fn classify(line: &str) -> Line<'_> {
    if COMMENT.is_match(line) {
        return Line::Comment;
    }

    if let Some(caps) = SECTION_OPEN.captures(line) {
        if let Some(name) = caps.get(1) {
            return Line::SectionOpen {
                name: name.as_str(),
                param: caps.get(2).map_or("", |m| m.as_str()),
            };
        }
    }

    if let Some(caps) = SECTION_CLOSE.captures(line) {
        if let Some(name) = caps.get(1) {
            return Line::SectionClose { name: name.as_str() };
        }
    }

    if let Some(caps) = DIRECTIVE.captures(line) {
        if let (Some(name), Some(content)) = (caps.get(1), caps.get(2)) {
            return Line::Directive {
                name: name.as_str(),
                content: content.as_str(),
            };
        }
    }

    Line::Unrecognized
}
