//! Writing Schematron values to sinks, strings and files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use sch_core::{Assertion, Message, MessagePart, RuleRecord};

use crate::error::{OutputError, Result};
use crate::options::OutputOptions;
use crate::sink::{DocumentSink, XmlSink};

/// A value that can write itself as Schematron markup.
pub trait ToSchematron {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()>;

    /// Serialize as a standalone XML document.
    fn to_xml_string(&self, options: &OutputOptions) -> Result<String> {
        let mut sink = XmlSink::new(Vec::new(), options)?;
        self.write_schematron(&mut sink)?;
        Ok(String::from_utf8(sink.finish()?)?)
    }
}

/// Write message text, turning `ValueOf` parts into `<sch:value-of select="..."/>`.
pub fn write_message<S: DocumentSink>(sink: &mut S, message: &Message) -> Result<()> {
    for part in message.parts() {
        match part {
            MessagePart::Text(text) => sink.text(text)?,
            MessagePart::ValueOf(select) => {
                sink.empty_element("value-of", &[("select", select.as_str())])?;
            }
        }
    }
    Ok(())
}

impl ToSchematron for Assertion {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        sink.element("assert", &[("test", self.test.as_str())], |sink| {
            write_message(sink, &self.message)
        })
    }
}

impl ToSchematron for RuleRecord {
    fn write_schematron<S: DocumentSink>(&self, sink: &mut S) -> Result<()> {
        tracing::trace!(path = %self.path, "writing rule");
        sink.element("rule", &[("context", self.path.as_str())], |sink| {
            for assertion in &self.assertions {
                assertion.write_schematron(sink)?;
            }
            Ok(())
        })
    }
}

/// Ensure a parent directory exists for a file path.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|err| OutputError::write_error(parent.display().to_string(), err))?;
    }
    Ok(())
}

/// Write `document` to `output_path`, creating parent directories as needed.
pub fn write_schematron_file<T: ToSchematron>(
    output_path: &Path,
    document: &T,
    options: &OutputOptions,
) -> Result<()> {
    options.validate()?;
    let path_display = output_path.display().to_string();
    ensure_parent_dir(output_path)?;
    let file = File::create(output_path).map_err(|err| OutputError::write_error(&path_display, err))?;
    let mut sink = XmlSink::new(BufWriter::new(file), options)?;
    document.write_schematron(&mut sink)?;
    let mut writer = sink.finish()?;
    writer
        .flush()
        .map_err(|err| OutputError::write_error(&path_display, err))?;
    tracing::info!(path = %path_display, "wrote Schematron document");
    Ok(())
}
