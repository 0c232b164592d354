//! XML reading utilities for OOXML and OpenDocument workbooks.
//! Wraps quick-xml with the configuration both formats need and adds small
//! helpers for attribute lookup and text accumulation.

use crate::error::SourceError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),

    #[error("Parse attribute '{name}' value '{value}' failed")]
    ParseAttributeValueError { name: String, value: String },
}

/// Streaming XML reader with a reusable event buffer.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        // `<c/>` and `<c></c>` must look the same to the readers
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Next event, or `None` at end of input.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, SourceError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer)? {
            Event::Eof => Ok(None),
            event => Ok(Some(event)),
        }
    }
}

/// Attribute access on start tags.
pub(crate) trait AttributeLookup<'a> {
    /// Unescaped attribute value by qualified name.
    fn attribute(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SourceError>;

    /// Attribute value parsed into `T`.
    fn parsed_attribute<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SourceError>;
}

impl<'a> AttributeLookup<'a> for BytesStart<'a> {
    fn attribute(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SourceError> {
        match self.try_get_attribute(name)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?)),
            None => Ok(None),
        }
    }

    fn parsed_attribute<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SourceError> {
        self.attribute(name)?
            .map(|value| {
                value.parse::<T>().map_err(|_| {
                    SourceError::from(XmlError::ParseAttributeValueError {
                        name: name.to_owned(),
                        value: value.to_string(),
                    })
                })
            })
            .transpose()
    }
}

/// Accumulates character data from text and entity events.
pub(crate) trait TextBuffer {
    fn push_text(&mut self, text: &BytesText) -> Result<(), SourceError>;

    /// Resolves `&amp;`-style entities and `&#NN;` character references.
    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), SourceError>;
}

impl TextBuffer for String {
    fn push_text(&mut self, text: &BytesText) -> Result<(), SourceError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), SourceError> {
        let raw = reference.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = match number.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16)?,
                None => number.parse::<u32>()?,
            };
            if let Some(character) = char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }
        Ok(())
    }
}

/// Loops over the events of an [`XmlReader`], ignoring unmatched events.
/// `break` leaves the loop; `?` propagates reader errors.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::name::QName;

    fn collect_text(xml: &str) -> Result<String, SourceError> {
        let mut reader = XmlReader::new(xml.as_bytes());
        let mut text = String::new();
        match_xml_events!(reader => {
            Event::Text(event) => text.push_text(&event)?,
            Event::GeneralRef(event) => text.push_reference(&event)?,
        });
        Ok(text)
    }

    #[test]
    fn resolves_entities_and_char_refs() {
        let text = collect_text("<p>Fish &amp; Chips &#65;&#x42;</p>").unwrap();
        assert_eq!(text, "Fish & Chips AB");
    }

    #[test]
    fn unknown_entity_fails() {
        assert!(collect_text("<p>&nope;</p>").is_err());
    }

    #[test]
    fn reads_and_parses_attributes() -> Result<(), SourceError> {
        let mut reader = XmlReader::new(r#"<row r="7" span="x"/>"#.as_bytes());
        let mut seen = false;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == QName(b"row") => {
                assert_eq!(event.parsed_attribute::<usize>("r").unwrap(), Some(7));
                assert_eq!(event.attribute("missing").unwrap(), None);
                assert!(event.parsed_attribute::<usize>("span").is_err());
                seen = true;
            }
        });
        assert!(seen);
        Ok(())
    }
}
