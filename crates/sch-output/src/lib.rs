//! Schematron document output.
//!
//! This crate turns constraint trees and hand-written rules into Schematron XML:
//!
//! - **Sink** (`sink`): scoped element emission over `quick-xml`
//! - **Document** (`document`): schema, pattern, rule, assert, ns and p elements
//! - **Write** (`write`): the [`ToSchematron`] trait and file output
//! - **Options** (`options`): indentation, declaration and namespace settings
//!
//! # Example
//!
//! ```
//! use sch_output::{Namespace, OutputOptions, Pattern, Schema, ToSchematron};
//!
//! let mut pattern = Pattern::new().with_id("accounts");
//! pattern
//!     .context("//ex:UserAccount")?
//!     .add_forbidden("ex:Password")?;
//!
//! let schema = Schema::new()
//!     .with_namespace(Namespace::new("ex", "http://example.com/ns#"))
//!     .with_pattern(pattern);
//!
//! let xml = schema.to_xml_string(&OutputOptions::default())?;
//! assert!(xml.contains(r#"<sch:assert test="not(ex:Password)">"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
pub mod error;
pub mod options;
pub mod sink;
pub mod write;

pub use document::{Assert, Namespace, Paragraph, Pattern, Rule, Schema};
pub use error::{OutputError, Result};
pub use options::{OutputOptions, SCHEMATRON_NS, SCHEMATRON_PREFIX};
pub use sink::{DocumentSink, XmlSink};
pub use write::{ToSchematron, write_message, write_schematron_file};
