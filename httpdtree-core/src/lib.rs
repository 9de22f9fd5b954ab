//! httpdtree Core Library
//!
//! This crate provides the pieces shared by the httpdtree crates:
//! the common error type and the options that tune how a configuration
//! file is turned into a tree.

pub mod config;
pub mod error;

pub use config::{OptionsLoader, ParseOptions, UnbalancedClose};
pub use error::{Error, Result};

/// httpdtree version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
