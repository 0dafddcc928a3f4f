//! Scoped element emission over `quick-xml`.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{OutputError, Result};
use crate::options::OutputOptions;

/// Receiver of a well-nested stream of elements.
///
/// Element names are unqualified (`rule`, `assert`); the sink applies the
/// namespace prefix.
pub trait DocumentSink {
    /// Open an element. Every call must be matched by [`DocumentSink::end_element`].
    fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()>;

    /// Close the innermost open element.
    fn end_element(&mut self) -> Result<()>;

    /// Write a self-closing element.
    fn empty_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()>;

    /// Write text content in the current element.
    fn text(&mut self, content: &str) -> Result<()>;

    /// Write an element whose content is produced by `body`.
    ///
    /// The element is closed even when `body` fails; the body's error wins.
    fn element<F>(&mut self, name: &str, attributes: &[(&str, &str)], body: F) -> Result<()>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.start_element(name, attributes)?;
        let outcome = body(self);
        let closed = self.end_element();
        outcome.and(closed)
    }
}

/// [`DocumentSink`] writing namespaced XML to any [`Write`].
///
/// The outermost element carries the `xmlns:<prefix>` declaration. Elements
/// that end up without content are written self-closing.
pub struct XmlSink<W: Write> {
    writer: Writer<W>,
    prefix: String,
    namespace_uri: String,
    pretty: bool,
    open: Vec<String>,
    pending: Option<BytesStart<'static>>,
}

impl<W: Write> XmlSink<W> {
    pub fn new(inner: W, options: &OutputOptions) -> Result<Self> {
        options.validate()?;
        let pretty = options.indent > 0;
        let mut writer = if pretty {
            // validate() restricts the indent character to ASCII.
            Writer::new_with_indent(inner, options.indent_char as u8, options.indent)
        } else {
            Writer::new(inner)
        };
        if options.xml_declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        Ok(Self {
            writer,
            prefix: options.prefix.clone(),
            namespace_uri: options.namespace_uri.clone(),
            pretty,
            open: Vec::new(),
            pending: None,
        })
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Finish the document and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        if let Some(name) = self.open.last() {
            return Err(OutputError::UnclosedElement { name: name.clone() });
        }
        if self.pretty {
            self.writer.get_mut().write_all(b"\n")?;
        }
        Ok(self.writer.into_inner())
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }

    fn tag(&self, name: &str, attributes: &[(&str, &str)]) -> BytesStart<'static> {
        let mut tag = BytesStart::new(self.qualified(name));
        if self.open.is_empty() {
            let key = format!("xmlns:{}", self.prefix);
            tag.push_attribute((key.as_str(), self.namespace_uri.as_str()));
        }
        for &attribute in attributes {
            tag.push_attribute(attribute);
        }
        tag
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(tag) = self.pending.take() {
            self.writer.write_event(Event::Start(tag))?;
        }
        Ok(())
    }
}

impl<W: Write> DocumentSink for XmlSink<W> {
    fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.flush_pending()?;
        let tag = self.tag(name, attributes);
        self.open.push(self.qualified(name));
        self.pending = Some(tag);
        Ok(())
    }

    fn end_element(&mut self) -> Result<()> {
        let name = self.open.pop().ok_or(OutputError::NoOpenElement)?;
        match self.pending.take() {
            Some(tag) => self.writer.write_event(Event::Empty(tag))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    fn empty_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.flush_pending()?;
        let tag = self.tag(name, attributes);
        self.writer.write_event(Event::Empty(tag))?;
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<()> {
        if content.is_empty() {
            return Ok(());
        }
        self.flush_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(partial_escape(content))))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(
        options: &OutputOptions,
        build: impl FnOnce(&mut XmlSink<Vec<u8>>) -> Result<()>,
    ) -> String {
        let mut sink = XmlSink::new(Vec::new(), options).unwrap();
        build(&mut sink).unwrap();
        String::from_utf8(sink.finish().unwrap()).unwrap()
    }

    #[test]
    fn outermost_element_declares_namespace() {
        let xml = render(&OutputOptions::compact(), |sink| {
            sink.element("rule", &[("context", "/")], |sink| {
                sink.empty_element("assert", &[("test", "true()")])
            })
        });
        assert_eq!(
            xml,
            r#"<sch:rule xmlns:sch="http://purl.oclc.org/dsdl/schematron" context="/"><sch:assert test="true()"/></sch:rule>"#
        );
    }

    #[test]
    fn element_without_content_is_self_closing() {
        let xml = render(&OutputOptions::compact(), |sink| {
            sink.element("pattern", &[("id", "p1")], |_| Ok(()))
        });
        assert_eq!(
            xml,
            r#"<sch:pattern xmlns:sch="http://purl.oclc.org/dsdl/schematron" id="p1"/>"#
        );
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let xml = render(&OutputOptions::compact().with_prefix("s"), |sink| {
            sink.element("assert", &[("test", "count(a) >= 1 and b < 'c'")], |sink| {
                sink.text("a < b & \"c\"")
            })
        });
        assert_eq!(
            xml,
            r#"<s:assert xmlns:s="http://purl.oclc.org/dsdl/schematron" test="count(a) &gt;= 1 and b &lt; &apos;c&apos;">a &lt; b &amp; "c"</s:assert>"#
        );
    }

    #[test]
    fn element_is_closed_when_body_fails() {
        let mut sink = XmlSink::new(Vec::new(), &OutputOptions::compact()).unwrap();
        let result = sink.element("rule", &[], |sink| {
            sink.text("partial")?;
            Err(OutputError::invalid_config("boom"))
        });
        assert!(matches!(result, Err(OutputError::InvalidConfig { .. })));
        assert_eq!(sink.depth(), 0);
        let xml = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert!(xml.ends_with("partial</sch:rule>"));
    }

    #[test]
    fn unbalanced_usage_is_reported() {
        let mut sink = XmlSink::new(Vec::new(), &OutputOptions::compact()).unwrap();
        assert!(matches!(sink.end_element(), Err(OutputError::NoOpenElement)));
        sink.start_element("schema", &[]).unwrap();
        assert!(matches!(
            sink.finish(),
            Err(OutputError::UnclosedElement { name }) if name == "sch:schema"
        ));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_failures_surface_as_io_errors() {
        let declared = XmlSink::new(BrokenPipe, &OutputOptions::new());
        assert!(matches!(declared, Err(OutputError::Io(_))));

        let mut sink = XmlSink::new(BrokenPipe, &OutputOptions::compact()).unwrap();
        sink.start_element("schema", &[]).unwrap();
        assert!(matches!(sink.end_element(), Err(OutputError::Io(_))));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = OutputOptions::new().with_prefix("");
        assert!(XmlSink::new(Vec::new(), &options).is_err());
    }
}
