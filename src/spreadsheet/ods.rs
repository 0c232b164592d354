use crate::error::ResultMessage;
use crate::error::SourceError;
use crate::helpers::xml::AttributeLookup;
use crate::helpers::xml::TextBuffer;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Grid;
use log::debug;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;

const MIME_TYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";
const CONTENT: &str = "content.xml";
const MANIFEST: &str = "META-INF/manifest.xml";

const SPREADSHEET: QName = QName(b"office:spreadsheet");
const TABLE: QName = QName(b"table:table");
const TABLE_ROW: QName = QName(b"table:table-row");
const TABLE_CELL: QName = QName(b"table:table-cell");
/// Cells hidden under a merged cell
const TABLE_COVERED_CELL: QName = QName(b"table:covered-table-cell");
/// Comments attached to a cell
const ANNOTATION: QName = QName(b"office:annotation");
const PARAGRAPH: QName = QName(b"text:p");
/// Run of `text:c` spaces
const SPACE: QName = QName(b"text:s");
const TAB: QName = QName(b"text:tab");
const LINE_BREAK: QName = QName(b"text:line-break");
const FILE_ENTRY: QName = QName(b"manifest:file-entry");
const ENCRYPTION_DATA: QName = QName(b"manifest:encryption-data");

/// Errors specific to OpenDocument containers.
#[derive(Error, Debug)]
pub enum OdsError {
    #[error("Invalid ODS MIME type")]
    MimeTypeError,

    #[error("Table without a table:name attribute")]
    TableNameError,
}

/// OpenDocument spreadsheet.
pub(crate) struct OdsSpreadsheet {
    name: String,
    zip: ZipArchive<BufReader<File>>,
}

impl OdsSpreadsheet {
    pub(crate) fn open(path: &Path) -> Result<Self, SourceError> {
        let name = path.display().to_string();
        let file = File::open(path)?;
        let mut zip = ZipArchive::new(BufReader::new(file))?;
        check_mime(&mut zip).with_prefix(&name)?;
        if is_password_protected(&mut zip).with_prefix(&name)? {
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(name.to_owned()))?;
        }
        debug!("Opened {}", name);
        Ok(Self { name, zip })
    }
}

impl Spreadsheet for OdsSpreadsheet {
    fn sheet_names(&mut self) -> Result<Vec<String>, SourceError> {
        let mut reader = self
            .zip
            .xml_reader(CONTENT)?
            .ok_or_else(|| SpreadsheetError::FileError(CONTENT.to_owned()))?;
        let mut names = Vec::new();
        match_xml_events!(reader => {
            Event::End(event) if event.name() == SPREADSHEET => break,
            Event::Start(event) if event.name() == TABLE => {
                let name = event.attribute("table:name")?.ok_or(OdsError::TableNameError)?;
                names.push(name.into_owned());
            }
        });
        if names.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(self.name.to_owned()))?;
        }
        Ok(names)
    }

    fn read_sheet(&mut self, sheet_name: &str) -> Result<Grid, SourceError> {
        let mut reader = self
            .zip
            .xml_reader(CONTENT)?
            .ok_or_else(|| SpreadsheetError::FileError(CONTENT.to_owned()))?;

        let mut found = false;
        match_xml_events!(reader => {
            Event::End(event) if event.name() == SPREADSHEET => break,
            Event::Start(event) if event.name() == TABLE => {
                if event.attribute("table:name")?.map(|name| name == sheet_name).unwrap_or(false) {
                    found = true;
                    break;
                }
            }
        });
        if !found {
            Err(SpreadsheetError::SheetNotFoundError {
                file: self.name.to_owned(),
                sheet: sheet_name.to_owned(),
            })?;
        }

        let mut sheet = Sheet::new(sheet_name);
        let mut row = 0usize;
        let mut col = 0usize;
        let mut row_count = 1usize;
        let mut col_count = 1usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut element_context = false; // reading the text of a string cell
        let mut comment_context = false;
        let mut paragraph_context = false;
        match_xml_events!(reader => {
            Event::End(event) if event.name() == TABLE => break,
            Event::Start(event) if event.name() == TABLE_ROW => {
                row_count = event.parsed_attribute("table:number-rows-repeated")?.unwrap_or(1);
                col = 0;
            }
            Event::End(event) if event.name() == TABLE_ROW => row += row_count,
            Event::Start(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                value.clear();
                col_count = event.parsed_attribute("table:number-columns-repeated")?.unwrap_or(1);
                let value_type = event.attribute("office:value-type")?;
                kind = match value_type.as_deref() {
                    Some("boolean") => CellType::Boolean,
                    Some("date") => CellType::IsoDateTime,
                    Some("time") => CellType::IsoDuration,
                    Some("string") => {
                        let is_error = event
                            .attribute("calcext:value-type")?
                            .map(|kind| kind == "error")
                            .unwrap_or(false);
                        if is_error { CellType::Error } else { CellType::InlineString }
                    }
                    Some(_) => CellType::Number,
                    None => CellType::Empty,
                };
                let value_attribute = match kind {
                    CellType::Boolean => "office:boolean-value",
                    CellType::IsoDateTime => "office:date-value",
                    CellType::IsoDuration => "office:time-value",
                    CellType::Number => "office:value",
                    _ => "",
                };
                if value_attribute.is_empty() {
                    element_context = matches!(kind, CellType::InlineString | CellType::Error);
                } else if let Some(data) = event.attribute(value_attribute)? {
                    value.push_str(&data);
                }
            }
            Event::End(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    for row_number in row..row + row_count {
                        for col_number in col..col + col_count {
                            sheet.push(Cell {
                                row: row_number,
                                col: col_number,
                                kind,
                                value: value.to_owned(),
                            });
                        }
                    }
                }
                col += col_count;
                element_context = false;
                comment_context = false;
                paragraph_context = false;
            }
            Event::Start(event) if element_context && event.name() == ANNOTATION => comment_context = true,
            Event::End(event) if element_context && event.name() == ANNOTATION => comment_context = false,
            Event::Start(event) if element_context && !comment_context && event.name() == PARAGRAPH => {
                if !value.is_empty() {
                    value.push('\n');
                }
                paragraph_context = true;
            }
            Event::End(event) if paragraph_context && event.name() == PARAGRAPH => paragraph_context = false,
            Event::Start(event) if paragraph_context && event.name() == SPACE => {
                let count = event.parsed_attribute("text:c")?.unwrap_or(1usize);
                value.push_str(&" ".repeat(count));
            }
            Event::Start(event) if paragraph_context && event.name() == TAB => value.push('\t'),
            Event::Start(event) if paragraph_context && event.name() == LINE_BREAK => value.push('\n'),
            Event::Text(event) if paragraph_context => value.push_text(&event)?,
            Event::GeneralRef(event) if paragraph_context => value.push_reference(&event)?,
        });

        debug!("Read {} cell(s) from {}!{}", sheet.cells.len(), self.name, sheet.name);
        sheet.into_grid(&[])
    }
}

/// Rejects archives whose `mimetype` entry names another document kind.
fn check_mime(zip: &mut ZipArchive<BufReader<File>>) -> Result<(), SourceError> {
    if let Some(file) = &mut zip.file("mimetype")? {
        let mut buffer = Vec::with_capacity(MIME_TYPE.len());
        file.read_to_end(&mut buffer)?;
        if buffer.trim_ascii() != MIME_TYPE {
            Err(OdsError::MimeTypeError)?;
        }
    }
    Ok(())
}

/// A manifest entry carrying encryption data marks an encrypted document.
fn is_password_protected(zip: &mut ZipArchive<BufReader<File>>) -> Result<bool, SourceError> {
    let mut reader = match zip.xml_reader(MANIFEST)? {
        Some(reader) => reader,
        None => return Ok(false),
    };
    let mut in_file_entry = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == FILE_ENTRY => in_file_entry = true,
        Event::End(event) if event.name() == FILE_ENTRY => in_file_entry = false,
        Event::Start(event) if in_file_entry && event.name() == ENCRYPTION_DATA => return Ok(true),
    });
    Ok(false)
}
