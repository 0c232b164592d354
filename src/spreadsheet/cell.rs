use crate::error::SourceError;
use crate::spreadsheet::SpreadsheetError;
use crate::table::CellValue;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// How the raw text of a cell is to be interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    Boolean,
    Number,
    /// Serial numbers counted from the 1900 epoch
    NumberDateTime1900,
    NumberDate1900,
    NumberTime1900,
    /// Serial numbers counted from the 1904 epoch
    NumberDateTime1904,
    NumberDate1904,
    NumberTime1904,
    /// `2024-01-31` or `2024-01-31T08:30:00`
    IsoDateTime,
    /// `PT08H30M00S`
    IsoDuration,
    InlineString,
    /// Index into the workbook's shared string table
    SharedString,
    /// Formula error code such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Built-in number format ids that denote dates or times.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(Self::date_time(true, true, is_1904)),
            "14" | "15" | "16" | "17" => Some(Self::date_time(true, false, is_1904)),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::date_time(false, true, is_1904)),
            _ => None,
        }
    }

    /// Classifies a custom format code by the date and time tokens outside of
    /// literals, escapes and bracketed sections.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,
                '"' if !is_bracket => is_literal = !is_literal,
                '[' if !is_literal => is_bracket = true,
                ']' if is_bracket => is_bracket = false,
                _ if is_literal || is_bracket => (),
                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }
        if is_date || is_time {
            Self::date_time(is_date, is_time, is_1904)
        } else {
            Self::Number
        }
    }

    fn date_time(is_date: bool, is_time: bool, is_1904: bool) -> Self {
        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, _, false) => Self::NumberTime1900,
            (false, _, true) => Self::NumberTime1904,
        }
    }
}

/// One populated cell as found in the workbook, before interpretation.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    pub(crate) value: String,
}

impl Cell {
    /// Interprets the raw text. Dates and times become ISO-style text,
    /// booleans become `TRUE`/`FALSE`, error codes are kept verbatim.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> Result<CellValue, SourceError> {
        let value = match self.kind {
            CellType::Empty => CellValue::Empty,
            CellType::Boolean => {
                let truthy = self.value == "1" || self.value.eq_ignore_ascii_case("true");
                CellValue::Text(if truthy { "TRUE" } else { "FALSE" }.to_owned())
            }
            CellType::Number => CellValue::Number(self.value.trim().parse::<f64>()?),
            CellType::NumberDateTime1900 => CellValue::Text(to_datetime_string(self.serial()?, false)?),
            CellType::NumberDateTime1904 => CellValue::Text(to_datetime_string(self.serial()?, true)?),
            CellType::NumberDate1900 => CellValue::Text(to_date_string(self.serial()?, false)?),
            CellType::NumberDate1904 => CellValue::Text(to_date_string(self.serial()?, true)?),
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                CellValue::Text(to_time_string(self.serial()?))
            }
            CellType::IsoDateTime => CellValue::Text(self.value.replace('T', " ")),
            CellType::IsoDuration => CellValue::Text(
                self.value
                    .replace("PT", "")
                    .replace('H', ":")
                    .replace('M', ":")
                    .replace('S', ""),
            ),
            CellType::InlineString | CellType::Error => CellValue::Text(self.value.to_owned()),
            CellType::SharedString => {
                let index = self.value.trim().parse::<usize>()?;
                let text = shared_strings
                    .get(index)
                    .ok_or(SpreadsheetError::SharedStringIndexError(index))?;
                CellValue::Text(text.to_owned())
            }
        };
        Ok(value)
    }

    fn serial(&self) -> Result<f64, SourceError> {
        Ok(self.value.trim().parse::<f64>()?)
    }
}

/// Day zero of the 1900 system once the phantom 1900-02-29 is accounted for.
fn epoch(is_1904: bool) -> NaiveDate {
    if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1).expect("NaiveDate literal")
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30).expect("NaiveDate literal")
    }
}

fn to_naive_datetime(serial: f64, is_1904: bool) -> Result<NaiveDateTime, SourceError> {
    let mut days = serial.floor() as i64;
    if !is_1904 && days < 60 {
        // serials before the fictitious leap day are one day ahead
        days += 1;
    }
    let millis = ((serial - serial.floor()) * 86_400_000.0).round() as i64;
    epoch(is_1904)
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.checked_add_signed(Duration::days(days)))
        .and_then(|date| date.checked_add_signed(Duration::milliseconds(millis)))
        .ok_or_else(|| SpreadsheetError::DateSerialError(serial).into())
}

fn to_date_string(serial: f64, is_1904: bool) -> Result<String, SourceError> {
    Ok(to_naive_datetime(serial, is_1904)?.format("%Y-%m-%d").to_string())
}

fn to_datetime_string(serial: f64, is_1904: bool) -> Result<String, SourceError> {
    Ok(to_naive_datetime(serial, is_1904)?
        .format("%Y-%m-%d %H:%M:%S%.f")
        .to_string())
}

/// Fraction of a day as `HH:MM:SS`, with milliseconds when present.
fn to_time_string(serial: f64) -> String {
    let total = ((serial - serial.floor()) * 86_400_000.0).round() as i64;
    let (seconds, millis) = (total / 1_000, total % 1_000);
    let (hours, minutes, seconds) = (seconds / 3_600, seconds / 60 % 60, seconds % 60);
    if millis > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell {
            row: 0,
            col: 0,
            kind,
            value: value.to_owned(),
        }
    }

    fn text(kind: CellType, value: &str) -> String {
        cell(kind, value).to_value(&[]).unwrap().to_string()
    }

    #[test]
    fn builtin_formats() {
        assert_eq!(
            CellType::parse_builtin_number_format_id("14", false),
            Some(CellType::NumberDate1900)
        );
        assert_eq!(
            CellType::parse_builtin_number_format_id("22", true),
            Some(CellType::NumberDateTime1904)
        );
        assert_eq!(CellType::parse_builtin_number_format_id("2", false), None);
    }

    #[test]
    fn custom_formats() {
        assert_eq!(
            CellType::parse_custom_number_format("yyyy-mm-dd", false),
            CellType::NumberDate1900
        );
        assert_eq!(
            CellType::parse_custom_number_format("yyyy-mm-dd hh:mm", false),
            CellType::NumberDateTime1900
        );
        assert_eq!(
            CellType::parse_custom_number_format("[h]:mm:ss", true),
            CellType::NumberTime1904
        );
        assert_eq!(
            CellType::parse_custom_number_format("[Red]0.00\"days\"", false),
            CellType::Number
        );
        assert_eq!(CellType::parse_custom_number_format("#,##0", false), CellType::Number);
    }

    #[test]
    fn dates_become_iso_text() {
        assert_eq!(text(CellType::NumberDate1900, "45306"), "2024-01-15");
        assert_eq!(text(CellType::NumberDate1900, "1"), "1900-01-01");
        assert_eq!(text(CellType::NumberDate1904, "0"), "1904-01-01");
        assert_eq!(text(CellType::NumberDateTime1900, "45306.5"), "2024-01-15 12:00:00");
        assert_eq!(text(CellType::NumberTime1900, "0.75"), "18:00:00");
        assert_eq!(text(CellType::IsoDateTime, "2024-01-15T08:30:00"), "2024-01-15 08:30:00");
        assert_eq!(text(CellType::IsoDuration, "PT08H30M00S"), "08:30:00");
    }

    #[test]
    fn scalar_values() {
        assert_eq!(cell(CellType::Number, "12.5").to_value(&[]).unwrap(), CellValue::Number(12.5));
        assert_eq!(text(CellType::Boolean, "1"), "TRUE");
        assert_eq!(text(CellType::Boolean, "false"), "FALSE");
        assert_eq!(text(CellType::Error, "#DIV/0!"), "#DIV/0!");
        assert!(cell(CellType::Number, "abc").to_value(&[]).is_err());
    }

    #[test]
    fn shared_strings_resolve_by_index() {
        let strings = vec!["zero".to_owned(), "one".to_owned()];
        assert_eq!(
            cell(CellType::SharedString, "1").to_value(&strings).unwrap(),
            CellValue::from("one")
        );
        assert!(cell(CellType::SharedString, "2").to_value(&strings).is_err());
    }
}
