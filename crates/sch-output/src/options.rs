//! Configuration options for Schematron output.

use serde::{Deserialize, Serialize};

use crate::error::{OutputError, Result};

/// Schematron namespace.
pub const SCHEMATRON_NS: &str = "http://purl.oclc.org/dsdl/schematron";

/// Conventional Schematron namespace prefix.
pub const SCHEMATRON_PREFIX: &str = "sch";

/// Options controlling how documents are serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Indentation width per nesting level. `0` writes everything on one line.
    pub indent: usize,

    /// Character repeated `indent` times per level (space or tab).
    pub indent_char: char,

    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` before the root element.
    pub xml_declaration: bool,

    /// Namespace prefix used for every element.
    pub prefix: String,

    /// Namespace URI bound to `prefix` on the outermost element.
    pub namespace_uri: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            indent_char: ' ',
            xml_declaration: true,
            prefix: SCHEMATRON_PREFIX.to_string(),
            namespace_uri: SCHEMATRON_NS.to_string(),
        }
    }
}

impl OutputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output without an XML declaration.
    pub fn compact() -> Self {
        Self {
            indent: 0,
            xml_declaration: false,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_indent_char(mut self, indent_char: char) -> Self {
        self.indent_char = indent_char;
        self
    }

    pub fn with_xml_declaration(mut self, enable: bool) -> Self {
        self.xml_declaration = enable;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_namespace_uri(mut self, uri: impl Into<String>) -> Self {
        self.namespace_uri = uri.into();
        self
    }

    /// Reject settings that would produce malformed XML.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(OutputError::invalid_config("namespace prefix must not be empty"));
        }
        if self.prefix.contains(':') || self.prefix.chars().any(char::is_whitespace) {
            return Err(OutputError::invalid_config(format!(
                "namespace prefix '{}' is not an XML name",
                self.prefix
            )));
        }
        if !matches!(self.indent_char, ' ' | '\t') {
            return Err(OutputError::invalid_config(format!(
                "indent character {:?} must be a space or a tab",
                self.indent_char
            )));
        }
        Ok(())
    }
}
