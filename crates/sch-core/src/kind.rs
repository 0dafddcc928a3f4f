//! Constraint kinds and their parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a constraint node asserts about its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Root scope. Contributes no assertion of its own.
    Scope,
    /// The context MUST be present.
    RequiredPresence,
    /// The context MAY be present.
    OptionalPresence,
    /// The context SHOULD NOT be present.
    ForbiddenPresence,
    /// The context's value MUST be one of the listed values.
    SetInclusion(ValueSet),
    /// The context's value MUST NOT be one of the listed values.
    SetExclusion(ValueSet),
    /// The context's value MUST be a number satisfying every present comparison.
    NumericRange(NumericRange),
}

impl ConstraintKind {
    /// Short label used in log output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scope => "scope",
            Self::RequiredPresence => "required",
            Self::OptionalPresence => "optional",
            Self::ForbiddenPresence => "forbidden",
            Self::SetInclusion(_) => "included",
            Self::SetExclusion(_) => "excluded",
            Self::NumericRange(_) => "numeric",
        }
    }
}

/// A set of literal string values for inclusion/exclusion checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueSet {
    /// Listed values, kept in declaration order.
    #[serde(alias = "in")]
    pub values: Vec<String>,
}

impl ValueSet {
    /// Collect `values` in order.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// True when no value is listed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A numeric literal embedded in a comparison.
///
/// Displays as an XPath 1.0 number. XPath has no literal for infinity or NaN,
/// so non-finite decimals are written as the divisions `(1 div 0)`,
/// `(-1 div 0)` and `(0 div 0)` that evaluate to them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    /// Whole number.
    Integer(i64),
    /// Number with a fractional part.
    Decimal(f64),
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) if value.is_nan() => f.write_str("(0 div 0)"),
            Self::Decimal(value) if value.is_infinite() && value > 0.0 => {
                f.write_str("(1 div 0)")
            }
            Self::Decimal(value) if value.is_infinite() => f.write_str("(-1 div 0)"),
            Self::Decimal(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for NumericValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for NumericValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

/// Numeric comparisons applied to a field value.
///
/// Every comparison is optional. `even` and `odd` only contribute when `true`.
/// Comparisons are emitted in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericRange {
    /// Value must be divisible by two.
    pub even: bool,
    /// Value must leave a remainder of one when divided by two.
    pub odd: bool,
    /// Value must equal this number.
    pub equal_to: Option<NumericValue>,
    /// Exclusive lower bound.
    pub greater_than: Option<NumericValue>,
    /// Inclusive lower bound.
    pub greater_than_or_equal_to: Option<NumericValue>,
    /// Exclusive upper bound.
    pub less_than: Option<NumericValue>,
    /// Inclusive upper bound.
    pub less_than_or_equal_to: Option<NumericValue>,
    /// Value must differ from this number.
    pub other_than: Option<NumericValue>,
}

impl NumericRange {
    /// A range with no comparisons.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`NumericRange::even`].
    pub fn with_even(mut self, even: bool) -> Self {
        self.even = even;
        self
    }

    /// Set [`NumericRange::odd`].
    pub fn with_odd(mut self, odd: bool) -> Self {
        self.odd = odd;
        self
    }

    /// Set [`NumericRange::equal_to`].
    pub fn with_equal_to(mut self, value: impl Into<NumericValue>) -> Self {
        self.equal_to = Some(value.into());
        self
    }

    /// Set [`NumericRange::greater_than`].
    pub fn with_greater_than(mut self, value: impl Into<NumericValue>) -> Self {
        self.greater_than = Some(value.into());
        self
    }

    /// Set [`NumericRange::greater_than_or_equal_to`].
    pub fn with_greater_than_or_equal_to(mut self, value: impl Into<NumericValue>) -> Self {
        self.greater_than_or_equal_to = Some(value.into());
        self
    }

    /// Set [`NumericRange::less_than`].
    pub fn with_less_than(mut self, value: impl Into<NumericValue>) -> Self {
        self.less_than = Some(value.into());
        self
    }

    /// Set [`NumericRange::less_than_or_equal_to`].
    pub fn with_less_than_or_equal_to(mut self, value: impl Into<NumericValue>) -> Self {
        self.less_than_or_equal_to = Some(value.into());
        self
    }

    /// Set [`NumericRange::other_than`].
    pub fn with_other_than(mut self, value: impl Into<NumericValue>) -> Self {
        self.other_than = Some(value.into());
        self
    }

    /// True when no comparison beyond the numeric check is requested.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_display_without_trailing_zeroes() {
        assert_eq!(NumericValue::from(1).to_string(), "1");
        assert_eq!(NumericValue::from(-7_i64).to_string(), "-7");
        assert_eq!(NumericValue::from(2.5).to_string(), "2.5");
        assert_eq!(NumericValue::from(3.0).to_string(), "3");
    }

    #[test]
    fn non_finite_values_display_as_xpath_divisions() {
        assert_eq!(NumericValue::from(f64::INFINITY).to_string(), "(1 div 0)");
        assert_eq!(NumericValue::from(f64::NEG_INFINITY).to_string(), "(-1 div 0)");
        assert_eq!(NumericValue::from(f64::NAN).to_string(), "(0 div 0)");
    }

    #[test]
    fn numeric_range_from_json_config() {
        let range: NumericRange =
            serde_json::from_str(r#"{"greater_than_or_equal_to": 1, "less_than": 9.5, "odd": true}"#)
                .expect("parse numeric range");
        assert_eq!(range.greater_than_or_equal_to, Some(NumericValue::Integer(1)));
        assert_eq!(range.less_than, Some(NumericValue::Decimal(9.5)));
        assert!(range.odd);
        assert!(!range.even);
        assert!(range.equal_to.is_none());
    }

    #[test]
    fn value_set_accepts_in_alias() {
        let set: ValueSet = serde_json::from_str(r#"{"in": ["A", "B"]}"#).expect("parse value set");
        assert_eq!(set, ValueSet::new(["A", "B"]));
    }

    #[test]
    fn kind_is_tagged_in_json() {
        let kind: ConstraintKind =
            serde_json::from_str(r#"{"kind": "set_exclusion", "values": ["admin"]}"#)
                .expect("parse kind");
        assert_eq!(kind, ConstraintKind::SetExclusion(ValueSet::new(["admin"])));
        assert_eq!(kind.label(), "excluded");
    }

    #[test]
    fn default_range_is_unconstrained() {
        assert!(NumericRange::new().is_unconstrained());
        assert!(!NumericRange::new().with_even(true).is_unconstrained());
        assert!(NumericRange::new().with_odd(false).is_unconstrained());
    }
}
