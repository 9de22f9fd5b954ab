//! Parser options
//!
//! Options are plain serde types so they can be kept next to the
//! configuration files they apply to.

mod loader;
mod types;

pub use loader::OptionsLoader;
pub use types::{ParseOptions, UnbalancedClose};
