//! Declarative document-structure constraints that denest into Schematron rules.
//!
//! - [`tree`]: arena-backed constraint tree and absolute path resolution
//! - [`kind`]: constraint kinds and their parameters
//! - [`assertion`]: test expressions and messages for each kind
//! - [`flatten`]: the denesting pass producing ordered [`RuleRecord`]s
//! - [`sentence`]: joining message fragments
//!
//! # Example
//!
//! ```
//! use sch_core::{ConstraintTree, flatten};
//!
//! let mut tree = ConstraintTree::new();
//! let mut root = tree.scope("/")?;
//! root.add_required("ex:A")?.add_optional("ex:B")?.add_forbidden("ex:C")?;
//!
//! let rules = flatten(&tree)?;
//! let paths: Vec<&str> = rules.iter().map(|rule| rule.path.as_str()).collect();
//! assert_eq!(paths, ["/", "/ex:A", "/ex:A/ex:B"]);
//! # Ok::<(), sch_core::ConstraintError>(())
//! ```

pub mod assertion;
pub mod error;
pub mod flatten;
pub mod kind;
pub mod sentence;
pub mod tree;

pub use assertion::{Assertion, Message, MessagePart, synthesize};
pub use error::{ConstraintError, Result};
pub use flatten::{RuleRecord, flatten, flatten_from};
pub use kind::{ConstraintKind, NumericRange, NumericValue, ValueSet};
pub use sentence::{AND_CONNECTORS, Connectors, OR_CONNECTORS, to_sentence};
pub use tree::{ConstraintNode, ConstraintTree, NodeId, NodeMut};
