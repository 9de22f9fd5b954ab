//! Parser module for httpd configuration files
//!
//! This module provides the line classifier and the tree-building parser.

pub mod classify;
pub mod parser;

pub use classify::{Line, classify};
pub use parser::{ParseError, ParseResult, Parser, parse};
