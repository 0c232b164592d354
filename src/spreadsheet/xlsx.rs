use crate::error::ResultMessage;
use crate::error::SourceError;
use crate::helpers::xml::AttributeLookup;
use crate::helpers::xml::TextBuffer;
use crate::helpers::xml::XmlReader;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Grid;
use log::debug;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;
use zip::ZipArchive;

const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts");
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");
const TAG_FORMAT_INDEX: QName = QName(b"xf");
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");
const TAG_PHONETIC_TEXT: QName = QName(b"rPh"); // furigana runs, not part of the value
const TAG_TEXT: QName = QName(b"t");
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr");
const TAG_SHEET: QName = QName(b"sheet");
const TAG_ROW: QName = QName(b"row");
const TAG_CELL: QName = QName(b"c");
const TAG_INLINE_STRING: QName = QName(b"is");
const TAG_VALUE: QName = QName(b"v");
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Signature of OLE compound files, used by encrypted OOXML and legacy .xls.
const COMPOUND_FILE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

type Archive = ZipArchive<BufReader<File>>;

/// Office Open XML workbook.
pub(crate) struct XlsxSpreadsheet {
    name: String,
    zip: Archive,
    /// Cell type per style index (`s` attribute of `<c>`)
    number_formats: Vec<CellType>,
    /// (sheet name, part path) in workbook order
    sheets: Vec<(String, String)>,
    shared_strings: Option<Vec<String>>,
}

impl XlsxSpreadsheet {
    pub(crate) fn open(path: &Path) -> Result<Self, SourceError> {
        let name = path.display().to_string();
        let mut file = File::open(path)?;
        if is_compound_file(&mut file)? {
            Err(SpreadsheetError::CompoundFileError(name.to_owned()))?;
        }

        let mut zip = ZipArchive::new(BufReader::new(file))?;
        let (sheets, is_1904) = load_workbook(&mut zip).with_prefix(&name)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?;
        }
        let number_formats = load_number_formats(&mut zip, is_1904).with_prefix(&name)?;
        debug!("Opened {} with {} worksheet(s), date1904={}", name, sheets.len(), is_1904);
        Ok(Self {
            name,
            zip,
            number_formats,
            sheets,
            shared_strings: None,
        })
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn sheet_names(&mut self) -> Result<Vec<String>, SourceError> {
        Ok(self.sheets.iter().map(|(name, _)| name.to_owned()).collect())
    }

    fn read_sheet(&mut self, sheet_name: &str) -> Result<Grid, SourceError> {
        let zip_path = self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, path)| path.to_owned())
            .ok_or_else(|| SpreadsheetError::SheetNotFoundError {
                file: self.name.to_owned(),
                sheet: sheet_name.to_owned(),
            })?;
        if self.shared_strings.is_none() {
            self.shared_strings = Some(load_shared_strings(&mut self.zip).with_prefix(&self.name)?);
        }

        let sheet = read_cells(&mut self.zip, &self.number_formats, sheet_name, &zip_path)
            .with_prefix(&format!("{}!{}", self.name, sheet_name))?;
        debug!("Read {} cell(s) from {}!{}", sheet.cells.len(), self.name, sheet.name);
        sheet.into_grid(self.shared_strings.as_deref().unwrap_or_default())
    }
}

fn read_cells(
    zip: &mut Archive,
    number_formats: &[CellType],
    sheet_name: &str,
    zip_path: &str,
) -> Result<Sheet, SourceError> {
    let mut reader = zip
        .xml_reader(zip_path)?
        .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
    let mut sheet = Sheet::new(sheet_name);
    let mut next_row = 0usize;
    let mut row_index = 0usize;
    let mut next_col = 0usize;
    let mut row = 0usize;
    let mut col = 0usize;
    let mut kind = CellType::default();
    let mut value = String::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_ROW => {
            row_index = event
                .parsed_attribute::<usize>("r")?
                .and_then(|number| number.checked_sub(1))
                .unwrap_or(next_row);
            next_col = 0;
        }
        Event::End(event) if event.name() == TAG_ROW => next_row = row_index + 1,
        Event::Start(event) if event.name() == TAG_CELL => {
            (row, col) = event
                .attribute("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((row_index, next_col));
            next_col = col + 1;
            value.clear();
            kind = match event.attribute("t")?.as_deref() {
                Some("inlineStr") | Some("str") => CellType::InlineString,
                Some("s") => CellType::SharedString,
                Some("d") => CellType::IsoDateTime,
                Some("b") => CellType::Boolean,
                Some("e") => CellType::Error,
                _ => CellType::Number,
            };
            if kind == CellType::Number {
                if let Some(style) = event.attribute("s")?.filter(|style| !style.is_empty()) {
                    let index = style.parse::<usize>()?;
                    kind = number_formats.get(index).copied().unwrap_or(CellType::Number);
                }
            }
        }
        Event::Start(event) if event.name() == TAG_INLINE_STRING => {
            value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
        }
        Event::Start(event) if event.name() == TAG_VALUE => {
            value = read_string_value(&mut reader, TAG_VALUE, true)?;
        }
        Event::End(event) if event.name() == TAG_CELL => {
            if !value.is_empty() {
                sheet.push(Cell {
                    row,
                    col,
                    kind,
                    value: std::mem::take(&mut value),
                });
            }
        }
    });
    Ok(sheet)
}

/// Sheet names with their part paths, and whether dates use the 1904 system.
fn load_workbook(zip: &mut Archive) -> Result<(Vec<(String, String)>, bool), SourceError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_owned()))?;
    let mut sheets = Vec::<(String, String)>::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                match attribute.key.local_name().as_ref() {
                    b"name" => name = Some(attribute.unescape_value()?),
                    b"id" => id = Some(attribute.unescape_value()?),
                    _ => (),
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&*id) {
                    sheets.push((name.into_owned(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event
                .attribute("date1904")?
                .map(|value| value == "1" || value == "true")
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Relationship id to worksheet part path.
fn load_relationships(zip: &mut Archive, path: &str) -> Result<HashMap<String, String>, SourceError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_owned()))?;
    let mut relationships = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.attribute("Id")?;
            let kind = event.attribute("Type")?;
            let target = event.attribute("Target")?;
            if kind.map(|kind| kind.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.into_owned(), to_zip_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Cell type for every style index, from `numFmts` and `cellXfs` in styles.xml.
fn load_number_formats(zip: &mut Archive, is_1904: bool) -> Result<Vec<CellType>, SourceError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.attribute("numFmtId")?;
            let format = event.attribute("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.into_owned(), CellType::parse_custom_number_format(&format, is_1904));
            }
        }
        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = false,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            let id = event.attribute("numFmtId")?.unwrap_or(Cow::Borrowed("0"));
            format_indexes.push(id.into_owned());
        }
    });

    Ok(format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect())
}

fn load_shared_strings(zip: &mut Archive) -> Result<Vec<String>, SourceError> {
    let mut shared_strings = Vec::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
        }
    });
    Ok(shared_strings)
}

/// Collects the text up to `end_tag`, skipping phonetic runs.
/// With `is_text_content` all text counts, otherwise only text inside `<t>`.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SourceError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_reference(&event)?,
    });
    Ok(text)
}

/// Relationship targets are relative to `xl/` unless absolute.
fn to_zip_path(target: &str) -> String {
    if let Some(path) = target.strip_prefix('/') {
        path.to_owned()
    } else if target.starts_with("xl/") {
        target.to_owned()
    } else {
        format!("xl/{target}")
    }
}

fn is_compound_file(file: &mut File) -> Result<bool, SourceError> {
    let mut magic = [0u8; 8];
    let matched = match file.read_exact(&mut magic) {
        Ok(()) => magic == COMPOUND_FILE_MAGIC,
        Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => false,
        Err(error) => Err(error)?,
    };
    file.seek(SeekFrom::Start(0))?;
    Ok(matched)
}
