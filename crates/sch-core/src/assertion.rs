//! Test expressions and messages synthesized from constraint kinds.
//!
//! Every assertion is written relative to the parent's rule context, so the
//! node's own `context` fragment (not its absolute path) appears in the test.
//!
//! Value sets are encoded with `contains()` over a delimited literal. For the
//! values `["a", "b", "c"]` and context `text()` the exclusion test is
//!
//! ```text
//! not(contains('_a_ _b_ _c_', concat('_', text(), '_')))
//! ```
//!
//! Wrapping both the candidate and every listed value in `_` restricts the
//! match to whole values: `_ab_` is not a substring of `_cab_`.

use std::fmt;

use crate::kind::{ConstraintKind, NumericRange, NumericValue, ValueSet};
use crate::sentence::{AND_CONNECTORS, OR_CONNECTORS, to_sentence};

/// Delimiter wrapped around every value of a set literal.
///
/// Whole-value matching only holds while no listed value contains the
/// delimiter itself. `ADMIN` is found inside `_ADMIN_USER_`, so a set holding
/// `ADMIN_USER` also matches the field values `ADMIN` and `USER`.
pub const VALUE_DELIMITER: &str = "_";

/// One piece of an assertion message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    /// Literal text.
    Text(String),
    /// Evaluate the location path and print its value here.
    ValueOf(String),
}

/// Human-readable failure message of an assertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    parts: Vec<MessagePart>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        if let Some(MessagePart::Text(last)) = self.parts.last_mut() {
            last.push_str(&text);
        } else {
            self.parts.push(MessagePart::Text(text));
        }
        self
    }

    pub fn value_of(mut self, select: impl Into<String>) -> Self {
        self.parts.push(MessagePart::ValueOf(select.into()));
        self
    }

    pub fn parts(&self) -> &[MessagePart] {
        &self.parts
    }

    /// True when the message interpolates a runtime value.
    pub fn has_value_of(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, MessagePart::ValueOf(_)))
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new().text(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::new().text(text)
    }
}

/// Renders `ValueOf` parts as `{select}`.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                MessagePart::Text(text) => f.write_str(text)?,
                MessagePart::ValueOf(select) => write!(f, "{{{select}}}")?,
            }
        }
        Ok(())
    }
}

/// A boolean test and the message reported when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    pub test: String,
    pub message: Message,
}

impl Assertion {
    pub fn new(test: impl Into<String>, message: impl Into<Message>) -> Self {
        Self {
            test: test.into(),
            message: message.into(),
        }
    }
}

/// Build the assertion a node contributes to its parent's rule.
///
/// Returns `None` for [`ConstraintKind::Scope`].
pub fn synthesize(context: &str, kind: &ConstraintKind) -> Option<Assertion> {
    let assertion = match kind {
        ConstraintKind::Scope => return None,
        ConstraintKind::RequiredPresence => Assertion::new(
            format!("count({context}) >= 1"),
            format!("element \"{context}\" is REQUIRED"),
        ),
        ConstraintKind::OptionalPresence => Assertion::new(
            format!("count({context}) >= 0"),
            format!("element \"{context}\" is OPTIONAL"),
        ),
        ConstraintKind::ForbiddenPresence => Assertion::new(
            format!("not({context})"),
            format!("element \"{context}\" is NOT RECOMMENDED"),
        ),
        ConstraintKind::SetInclusion(allowed) => inclusion(context, allowed),
        ConstraintKind::SetExclusion(forbidden) => exclusion(context, forbidden),
        ConstraintKind::NumericRange(range) => numericality(context, range),
    };
    Some(assertion)
}

/// `'_a_ _b_ _c_'` content (without the surrounding quotes).
pub fn delimited_set_literal(values: &ValueSet) -> String {
    values
        .values
        .iter()
        .map(|value| {
            format!(
                "{VALUE_DELIMITER}{}{VALUE_DELIMITER}",
                value.replace('\'', "\\'")
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The delimited form a field value must take to match a set literal.
pub fn delimited_value(value: &str) -> String {
    format!("{VALUE_DELIMITER}{value}{VALUE_DELIMITER}")
}

fn delimited_candidate(context: &str) -> String {
    format!("concat('{VALUE_DELIMITER}', {context}, '{VALUE_DELIMITER}')")
}

fn quoted_values(values: &ValueSet) -> String {
    let quoted: Vec<String> = values
        .values
        .iter()
        .map(|value| format!("\"{}\"", value.replace('"', "\\\"")))
        .collect();
    to_sentence(&quoted, &OR_CONNECTORS)
}

fn value_message(context: &str, requirement: &str) -> Message {
    Message::new()
        .text("text \"")
        .value_of(context)
        .text(format!("\": element \"{context}\" {requirement}"))
}

fn inclusion(context: &str, allowed: &ValueSet) -> Assertion {
    Assertion {
        test: format!(
            "contains('{}', {})",
            delimited_set_literal(allowed),
            delimited_candidate(context)
        ),
        message: value_message(context, &format!("MUST be {}", quoted_values(allowed))),
    }
}

fn exclusion(context: &str, forbidden: &ValueSet) -> Assertion {
    Assertion {
        test: format!(
            "not(contains('{}', {}))",
            delimited_set_literal(forbidden),
            delimited_candidate(context)
        ),
        message: value_message(
            context,
            &format!("MUST NOT be {}", quoted_values(forbidden)),
        ),
    }
}

fn numericality(context: &str, range: &NumericRange) -> Assertion {
    let number = format!("number({context})");
    let mut tests = vec![format!("{number} = {context}")];
    let mut messages = vec!["MUST be a number".to_string()];

    let mut push = |test: String, message: String| {
        tests.push(test);
        messages.push(message);
    };
    let compare = |value: Option<NumericValue>, operator: &str| {
        value.map(|value| format!("{number} {operator} {value}"))
    };

    if range.even {
        push(format!("{number} mod 2 = 0"), "MUST be even".to_string());
    }
    if range.odd {
        push(format!("{number} mod 2 = 1"), "MUST be odd".to_string());
    }
    if let Some(test) = compare(range.equal_to, "=") {
        push(test, format!("MUST be equal to {}", display(range.equal_to)));
    }
    if let Some(test) = compare(range.greater_than, ">") {
        push(
            test,
            format!("MUST be greater than {}", display(range.greater_than)),
        );
    }
    if let Some(test) = compare(range.greater_than_or_equal_to, ">=") {
        push(
            test,
            format!(
                "MUST be greater than or equal to {}",
                display(range.greater_than_or_equal_to)
            ),
        );
    }
    if let Some(test) = compare(range.less_than, "<") {
        push(test, format!("MUST be less than {}", display(range.less_than)));
    }
    if let Some(test) = compare(range.less_than_or_equal_to, "<=") {
        push(
            test,
            format!(
                "MUST be less than or equal to {}",
                display(range.less_than_or_equal_to)
            ),
        );
    }
    if let Some(test) = compare(range.other_than, "!=") {
        push(
            test,
            format!("MUST NOT be equal to {}", display(range.other_than)),
        );
    }

    Assertion {
        test: tests
            .iter()
            .map(|test| format!("({test})"))
            .collect::<Vec<_>>()
            .join(" and "),
        message: value_message(context, &to_sentence(&messages, &AND_CONNECTORS)),
    }
}

fn display(value: Option<NumericValue>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}
