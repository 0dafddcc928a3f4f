//! Schematron document elements.
//!
//! Each type maps onto one element of the Schematron vocabulary. Unset
//! attributes are omitted and children are written in the order they were
//! added. Constraint scopes declared on a [`Pattern`] are denested into rules
//! at the position they were declared.

use sch_core::{ConstraintKind, ConstraintTree, Message, NodeId, NodeMut, flatten_from};

use crate::error::Result;
use crate::sink::DocumentSink;
use crate::write::{ToSchematron, write_message};

fn present<'a>(pairs: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, &'a str)> {
    pairs
        .iter()
        .filter_map(|&(key, value)| value.map(|value| (key, value)))
        .collect()
}

/// `<sch:schema>`
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub id: Option<String>,
    pub title: Option<String>,
    items: Vec<SchemaItem>,
}

#[derive(Debug, Clone)]
enum SchemaItem {
    Namespace(Namespace),
    Paragraph(Paragraph),
    Pattern(Pattern),
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.items.push(SchemaItem::Namespace(namespace));
        self
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.items.push(SchemaItem::Paragraph(paragraph));
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.items.push(SchemaItem::Pattern(pattern));
        self
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.items.iter().filter_map(|item| match item {
            SchemaItem::Pattern(pattern) => Some(pattern),
            _ => None,
        })
    }
}

impl ToSchematron for Schema {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        let attributes = present(&[("id", self.id.as_deref()), ("title", self.title.as_deref())]);
        tracing::debug!(
            id = self.id.as_deref().unwrap_or_default(),
            patterns = self.patterns().count(),
            "writing schema"
        );
        sink.element("schema", &attributes, |sink| {
            for item in &self.items {
                match item {
                    SchemaItem::Namespace(namespace) => namespace.write_schematron(sink)?,
                    SchemaItem::Paragraph(paragraph) => paragraph.write_schematron(sink)?,
                    SchemaItem::Pattern(pattern) => pattern.write_schematron(sink)?,
                }
            }
            Ok(())
        })
    }
}

/// `<sch:ns>`: binds a prefix used by the rules' location paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub uri: Option<String>,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            uri: Some(uri.into()),
        }
    }
}

impl ToSchematron for Namespace {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        let attributes = present(&[
            ("prefix", self.prefix.as_deref()),
            ("uri", self.uri.as_deref()),
        ]);
        sink.empty_element("ns", &attributes)
    }
}

/// `<sch:p>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub message: Option<String>,
}

impl Paragraph {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl ToSchematron for Paragraph {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        sink.element("p", &[], |sink| match &self.message {
            Some(message) => sink.text(message),
            None => Ok(()),
        })
    }
}

/// `<sch:pattern>`
///
/// Holds hand-written rules and paragraphs alongside constraint scopes, which
/// are flattened when the pattern is written.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pub id: Option<String>,
    pub name: Option<String>,
    items: Vec<PatternItem>,
    constraints: ConstraintTree,
}

#[derive(Debug, Clone)]
enum PatternItem {
    Paragraph(Paragraph),
    Rule(Rule),
    Scope(NodeId),
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.items.push(PatternItem::Paragraph(paragraph));
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.items.push(PatternItem::Rule(rule));
        self
    }

    /// Open a constraint scope rooted at `context`.
    pub fn context(&mut self, context: impl Into<String>) -> sch_core::Result<NodeMut<'_>> {
        let id = self.constraints.add_root(context, ConstraintKind::Scope)?;
        self.items.push(PatternItem::Scope(id));
        self.constraints.node_mut(id)
    }

    /// The tree holding every constraint scope of this pattern.
    pub fn constraints(&self) -> &ConstraintTree {
        &self.constraints
    }
}

impl ToSchematron for Pattern {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        let attributes = present(&[("id", self.id.as_deref()), ("name", self.name.as_deref())]);
        sink.element("pattern", &attributes, |sink| {
            for item in &self.items {
                match item {
                    PatternItem::Paragraph(paragraph) => paragraph.write_schematron(sink)?,
                    PatternItem::Rule(rule) => rule.write_schematron(sink)?,
                    PatternItem::Scope(root) => {
                        for record in flatten_from(&self.constraints, *root)? {
                            record.write_schematron(sink)?;
                        }
                    }
                }
            }
            Ok(())
        })
    }
}

/// `<sch:rule>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    pub id: Option<String>,
    pub context: Option<String>,
    pub asserts: Vec<Assert>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_assert(mut self, assert: Assert) -> Self {
        self.asserts.push(assert);
        self
    }
}

impl ToSchematron for Rule {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        let attributes = present(&[
            ("id", self.id.as_deref()),
            ("context", self.context.as_deref()),
        ]);
        sink.element("rule", &attributes, |sink| {
            for assert in &self.asserts {
                assert.write_schematron(sink)?;
            }
            Ok(())
        })
    }
}

/// `<sch:assert>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assert {
    pub test: Option<String>,
    pub message: Option<Message>,
}

impl Assert {
    pub fn new(test: impl Into<String>, message: impl Into<Message>) -> Self {
        Self {
            test: Some(test.into()),
            message: Some(message.into()),
        }
    }

    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ToSchematron for Assert {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        let attributes = present(&[("test", self.test.as_deref())]);
        sink.element("assert", &attributes, |sink| match &self.message {
            Some(message) => write_message(sink, message),
            None => Ok(()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputOptions;

    fn compact<T: ToSchematron>(value: &T) -> String {
        value.to_xml_string(&OutputOptions::compact()).unwrap()
    }

    #[test]
    fn rule_with_id_and_context() {
        let rule = Rule::new().with_id("rule1").with_context("//ex:Example");
        assert_eq!(
            compact(&rule),
            r#"<sch:rule xmlns:sch="http://purl.oclc.org/dsdl/schematron" id="rule1" context="//ex:Example"/>"#
        );
    }

    #[test]
    fn assertion_with_message() {
        let assert = Assert::new("not(ex:Example)", "element \"ex:Example\" is NOT RECOMMENDED");
        assert_eq!(
            compact(&assert),
            r#"<sch:assert xmlns:sch="http://purl.oclc.org/dsdl/schematron" test="not(ex:Example)">element "ex:Example" is NOT RECOMMENDED</sch:assert>"#
        );
    }

    #[test]
    fn assertion_without_attributes() {
        assert_eq!(
            compact(&Assert::default()),
            r#"<sch:assert xmlns:sch="http://purl.oclc.org/dsdl/schematron"/>"#
        );
    }

    #[test]
    fn namespace_and_paragraph() {
        let namespace = Namespace::new("ex", "http://example.com/ns#");
        assert_eq!(
            compact(&namespace),
            r#"<sch:ns xmlns:sch="http://purl.oclc.org/dsdl/schematron" prefix="ex" uri="http://example.com/ns#"/>"#
        );

        let paragraph = Paragraph::new("Hello, world!");
        assert_eq!(
            compact(&paragraph),
            r#"<sch:p xmlns:sch="http://purl.oclc.org/dsdl/schematron">Hello, world!</sch:p>"#
        );
    }

    #[test]
    fn pattern_keeps_item_order() {
        let mut pattern = Pattern::new()
            .with_id("pattern1")
            .with_name("Example pattern")
            .with_rule(Rule::new().with_context("//ex:First"));
        pattern
            .context("//ex:Second")
            .unwrap()
            .add_required("ex:Child")
            .unwrap();
        let pattern = pattern.with_paragraph(Paragraph::new("done"));

        let xml = compact(&pattern);
        let first = xml.find("//ex:First").unwrap();
        let second = xml.find("//ex:Second").unwrap();
        let paragraph = xml.find("<sch:p>done</sch:p>").unwrap();
        assert!(first < second && second < paragraph);
        assert!(xml.contains(r#"<sch:assert test="count(ex:Child) &gt;= 1">element "ex:Child" is REQUIRED</sch:assert>"#));
    }

    #[test]
    fn schema_lists_patterns() {
        let schema = Schema::new()
            .with_id("schema1")
            .with_title("Example schema")
            .with_pattern(Pattern::new().with_id("a"))
            .with_paragraph(Paragraph::default())
            .with_pattern(Pattern::new().with_id("b"));
        let ids: Vec<&str> = schema.patterns().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            compact(&schema),
            r#"<sch:schema xmlns:sch="http://purl.oclc.org/dsdl/schematron" id="schema1" title="Example schema"><sch:pattern id="a"/><sch:p/><sch:pattern id="b"/></sch:schema>"#
        );
    }
}
