//! httpd Configuration Parser
//!
//! This crate turns Apache httpd style configuration files into a tree
//! that mirrors the nesting of the source: every directive is a leaf and
//! every `<Section>` is a node holding the lines up to its `</Section>`.
//!
//! # Example
//!
//! ```rust,ignore
//! use httpdtree_config::parse;
//!
//! let source = r#"
//!     <VirtualHost *>
//!         ServerName example.com
//!         Redirect permanent / http://www.example.com/
//!     </VirtualHost>
//! "#;
//!
//! let tree = parse(source.as_bytes()).unwrap();
//! let vhost = tree.root().children().next().unwrap();
//! assert_eq!(vhost.name(), Some("VirtualHost"));
//! assert_eq!(vhost.child_count(), 2);
//! ```

pub mod adapter;
pub mod node;
pub mod parser;

pub use adapter::JsonAdapter;
pub use node::{Children, ConfigNode, ConfigTree, Descendants, NodeError, NodeId};
pub use parser::{Line, ParseError, ParseResult, Parser, classify, parse};

pub use httpdtree_core::{ParseOptions, UnbalancedClose};
