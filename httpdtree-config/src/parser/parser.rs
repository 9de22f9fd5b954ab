//! httpd configuration parser
//!
//! Reads the input line by line and moves a cursor over the tree being
//! built: a section open adds a child and descends into it, a section close
//! climbs back to the parent, a directive adds a leaf where the cursor is.

use crate::node::{ConfigTree, NodeError, NodeId};
use crate::parser::classify::{Line, classify};
use httpdtree_core::{ParseOptions, UnbalancedClose};
use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};
use thiserror::Error;

/// Parser error types
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unbalanced section close </{name}> at line {line}")]
    UnbalancedClose { line: usize, name: String },

    #[error("Section <{name}> opened at line {line} is never closed")]
    UnclosedSection { line: usize, name: String },

    #[error("Tree error: {0}")]
    Node(#[from] NodeError),
}

impl ParseError {
    /// Source line the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnbalancedClose { line, .. } | ParseError::UnclosedSection { line, .. } => {
                Some(*line)
            }
            ParseError::Io(_) | ParseError::Node(_) => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Line-driven tree builder
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    /// Create a parser with lenient defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a configuration file into a tree
    ///
    /// The returned tree is always rooted at the synthetic root. A section
    /// still open at end of input is reported by
    /// [`ConfigTree::unclosed_section`], or as an error when
    /// `require_closed_sections` is set.
    pub fn parse<R: Read>(&self, reader: R) -> ParseResult<ConfigTree> {
        let mut reader = BufReader::new(reader);
        let mut tree = ConfigTree::new();
        let mut cursor = NodeId::ROOT;
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = decode_line(&buf);
            let kind = classify(&line);
            tracing::trace!(line = line_no, "{}", kind);

            match kind {
                Line::Comment | Line::Unrecognized => continue,
                Line::SectionOpen { name, param } => {
                    cursor = tree.insert(name.to_string(), param.to_string(), cursor, Some(line_no))?;
                }
                Line::SectionClose { name } => {
                    cursor = self.close_section(&tree, cursor, name, line_no)?;
                }
                Line::Directive { name, content } => {
                    tree.insert(name.to_string(), content.to_string(), cursor, Some(line_no))?;
                }
            }
        }

        if let Some(open) = tree.get(cursor).filter(|node| !node.is_root()) {
            let name = open.name().unwrap_or_default().to_string();
            let line = open.line().unwrap_or_default();
            if self.options.require_closed_sections {
                return Err(ParseError::UnclosedSection { line, name });
            }
            tracing::warn!("Section <{}> opened at line {} is never closed", name, line);
        }

        tree.set_cursor(cursor);
        tracing::debug!("Parsed {} configuration nodes", tree.len() - 1);

        Ok(tree)
    }

    /// Parse configuration text held in memory
    pub fn parse_str(&self, source: &str) -> ParseResult<ConfigTree> {
        self.parse(source.as_bytes())
    }

    fn close_section(
        &self,
        tree: &ConfigTree,
        cursor: NodeId,
        name: &str,
        line: usize,
    ) -> ParseResult<NodeId> {
        let Some(parent) = tree.parent_id(cursor) else {
            return match self.options.unbalanced_close {
                UnbalancedClose::Ignore => {
                    tracing::warn!("Ignoring unbalanced </{}> at line {}", name, line);
                    Ok(cursor)
                }
                UnbalancedClose::Reject => Err(ParseError::UnbalancedClose {
                    line,
                    name: name.to_string(),
                }),
            };
        };

        if let Some(open) = tree.get(cursor).and_then(|node| node.name()) {
            if open != name {
                tracing::debug!("</{}> at line {} closes <{}>", name, line, open);
            }
        }

        Ok(parent)
    }
}

/// Decode one raw line, dropping its `\n` or `\r\n` terminator
///
/// Bytes that are not valid UTF-8 become U+FFFD.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Parse a configuration file with default options
pub fn parse<R: Read>(reader: R) -> ParseResult<ConfigTree> {
    Parser::new().parse(reader)
}
