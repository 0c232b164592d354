use crate::output::{EncodeError, Encoder, OutputFormat};
use crate::table::TableView;
use std::path::Path;

/// Writes each table as a one-sheet OpenDocument spreadsheet.
pub(crate) struct OdsEncoder;

impl Encoder for OdsEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Ods
    }

    fn ensure_available(&self) -> Result<(), EncodeError> {
        if cfg!(feature = "ods") {
            Ok(())
        } else {
            Err(EncodeError::DependencyUnavailable {
                format: OutputFormat::Ods.to_string(),
                hint: "rebuild with the `ods` cargo feature enabled".to_owned(),
            })
        }
    }

    #[cfg(feature = "ods")]
    fn encode(&self, table: TableView<'_>, path: &Path) -> Result<(), EncodeError> {
        document::write(table, path)?;
        log::debug!("Wrote {} row(s) to {}", table.row_count(), path.display());
        Ok(())
    }

    #[cfg(not(feature = "ods"))]
    fn encode(&self, _table: TableView<'_>, _path: &Path) -> Result<(), EncodeError> {
        self.ensure_available()
    }
}

#[cfg(feature = "ods")]
mod document {
    use crate::output::EncodeError;
    use crate::table::{CellValue, TableView};
    use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
    use quick_xml::Writer;
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::Path;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const MIME_TYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";
    const SHEET_NAME: &str = "Sheet1";
    const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">
 <manifest:file-entry manifest:full-path="/" manifest:version="1.2" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/>
 <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
</manifest:manifest>
"#;
    const NAMESPACES: [(&str, &str); 3] = [
        ("xmlns:office", "urn:oasis:names:tc:opendocument:xmlns:office:1.0"),
        ("xmlns:table", "urn:oasis:names:tc:opendocument:xmlns:table:1.0"),
        ("xmlns:text", "urn:oasis:names:tc:opendocument:xmlns:text:1.0"),
    ];

    pub(super) fn write(table: TableView<'_>, path: &Path) -> Result<(), EncodeError> {
        let mut zip = ZipWriter::new(BufWriter::new(File::create(path)?));
        // readers sniff the type from an uncompressed first entry
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("mimetype", stored)?;
        zip.write_all(MIME_TYPE.as_bytes())?;
        zip.start_file("META-INF/manifest.xml", deflated)?;
        zip.write_all(MANIFEST.as_bytes())?;
        zip.start_file("content.xml", deflated)?;
        write_content(&mut Writer::new(&mut zip), table)?;
        zip.finish()?.flush()?;
        Ok(())
    }

    fn write_content<W: Write>(writer: &mut Writer<W>, table: TableView<'_>) -> Result<(), EncodeError> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("office:document-content");
        root.extend_attributes(NAMESPACES);
        root.push_attribute(("office:version", "1.2"));
        writer.write_event(Event::Start(root))?;
        writer.write_event(Event::Start(BytesStart::new("office:body")))?;
        writer.write_event(Event::Start(BytesStart::new("office:spreadsheet")))?;
        let mut sheet = BytesStart::new("table:table");
        sheet.push_attribute(("table:name", SHEET_NAME));
        writer.write_event(Event::Start(sheet))?;

        let header: Vec<CellValue> = table.columns().iter().map(|name| CellValue::from(name.as_str())).collect();
        write_row(writer, &header)?;
        for record in table.rows() {
            write_row(writer, record)?;
        }

        writer.write_event(Event::End(BytesEnd::new("table:table")))?;
        writer.write_event(Event::End(BytesEnd::new("office:spreadsheet")))?;
        writer.write_event(Event::End(BytesEnd::new("office:body")))?;
        writer.write_event(Event::End(BytesEnd::new("office:document-content")))?;
        Ok(())
    }

    fn write_row<W: Write>(writer: &mut Writer<W>, cells: &[CellValue]) -> Result<(), EncodeError> {
        writer.write_event(Event::Start(BytesStart::new("table:table-row")))?;
        for cell in cells {
            let mut element = BytesStart::new("table:table-cell");
            match cell {
                CellValue::Empty => {
                    writer.write_event(Event::Empty(element))?;
                    continue;
                }
                CellValue::Text(_) => element.push_attribute(("office:value-type", "string")),
                CellValue::Number(_) => {
                    element.push_attribute(("office:value-type", "float"));
                    element.push_attribute(("office:value", cell.as_text().as_ref()));
                }
            }
            writer.write_event(Event::Start(element))?;
            write_paragraphs(writer, &cell.as_text())?;
            writer.write_event(Event::End(BytesEnd::new("table:table-cell")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("table:table-row")))?;
        Ok(())
    }

    /// One `text:p` per line. Runs of spaces and tabs use `text:s` and
    /// `text:tab` since consumers collapse plain whitespace.
    fn write_paragraphs<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<(), EncodeError> {
        for line in text.split('\n') {
            writer.write_event(Event::Start(BytesStart::new("text:p")))?;
            let mut plain = String::new();
            let mut spaces = 0usize;
            for character in line.chars() {
                if character == ' ' {
                    spaces += 1;
                    continue;
                }
                flush_spaces(writer, &mut plain, spaces)?;
                spaces = 0;
                if character == '\t' {
                    flush_text(writer, &mut plain)?;
                    writer.write_event(Event::Empty(BytesStart::new("text:tab")))?;
                } else {
                    plain.push(character);
                }
            }
            flush_spaces(writer, &mut plain, spaces)?;
            flush_text(writer, &mut plain)?;
            writer.write_event(Event::End(BytesEnd::new("text:p")))?;
        }
        Ok(())
    }

    /// A single space between words stays literal; any other run becomes `text:s`.
    fn flush_spaces<W: Write>(writer: &mut Writer<W>, plain: &mut String, spaces: usize) -> Result<(), EncodeError> {
        let literal = usize::from(spaces > 0 && !plain.is_empty());
        plain.extend(std::iter::repeat(' ').take(literal));
        let encoded = spaces - literal;
        if encoded > 0 {
            flush_text(writer, plain)?;
            let mut element = BytesStart::new("text:s");
            element.push_attribute(("text:c", encoded.to_string().as_str()));
            writer.write_event(Event::Empty(element))?;
        }
        Ok(())
    }

    fn flush_text<W: Write>(writer: &mut Writer<W>, plain: &mut String) -> Result<(), EncodeError> {
        if !plain.is_empty() {
            writer.write_event(Event::Text(BytesText::new(plain)))?;
            plain.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, Table};

    fn table() -> Table {
        Table::new(
            vec!["id".to_owned(), "note".to_owned()],
            vec![
                vec![1.0.into(), "Fish & <chips>".into()],
                vec![2.5.into(), "  two  spaces\nnext\tline ".into()],
                vec![CellValue::Empty, "last".into()],
            ],
        )
    }

    #[cfg(feature = "ods")]
    #[test]
    fn round_trips_through_ods_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ods");
        let table = table();
        OdsEncoder.encode(table.view(), &path).unwrap();

        let grid = crate::source::read_sheet(&path, "Sheet1").unwrap();
        assert_eq!(grid.rows()[0], vec![CellValue::from("id"), "note".into()]);
        assert_eq!(&grid.rows()[1..], table.rows());
    }

    #[cfg(not(feature = "ods"))]
    #[test]
    fn reports_missing_support() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ods");
        assert!(matches!(
            OdsEncoder.ensure_available(),
            Err(EncodeError::DependencyUnavailable { .. })
        ));
        let error = OdsEncoder.encode(table().view(), &path).unwrap_err();
        assert!(matches!(error, EncodeError::DependencyUnavailable { .. }));
        assert!(!path.exists());
    }
}
