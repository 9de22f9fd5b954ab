//! Option type definitions
//!
//! These types control how tolerant the parser is of unbalanced sections.

use serde::{Deserialize, Serialize};

/// Options for a single parse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// What to do with a `</Tag>` line while no section is open
    #[serde(default)]
    pub unbalanced_close: UnbalancedClose,

    /// Fail when input ends while a section is still open
    #[serde(default)]
    pub require_closed_sections: bool,
}

/// Handling of a section close that has no open section to close
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnbalancedClose {
    /// Stay at the root and keep going
    #[default]
    Ignore,
    /// Abort the parse with an error
    Reject,
}

impl ParseOptions {
    /// Options that reject every unbalanced section
    pub fn strict() -> Self {
        Self {
            unbalanced_close: UnbalancedClose::Reject,
            require_closed_sections: true,
        }
    }
}
