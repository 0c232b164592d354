//! Excel-style cell references (`A1`, `BC12`) and their zero-based coordinates.

use crate::error::CutterError;
use regex::Regex;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

static CELL_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("Hardcode regex pattern"));

/// Zero-based position of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellReference {
    pub row: usize,
    pub col: usize,
}

impl CellReference {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Resolves a reference such as `B5` into `(row 4, column 1)`.
    ///
    /// Surrounding whitespace is ignored and letters are case-insensitive.
    pub fn parse(reference: &str) -> Result<Self, CutterError> {
        let invalid = |reason: &str| CutterError::InvalidReference {
            reference: reference.to_owned(),
            reason: reason.to_owned(),
        };
        let captures = CELL_REFERENCE
            .captures(reference.trim())
            .ok_or_else(|| invalid("cell references must be like A1 or BC12"))?;
        let row = row_to_index(&captures[2])
            .ok_or_else(|| invalid("row number must be greater than zero"))?;
        let col = col_to_index(&captures[1])
            .ok_or_else(|| invalid("column part must contain only letters"))?;
        Ok(Self { row, col })
    }
}

impl FromStr for CellReference {
    type Err = CutterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for CellReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", index_to_reference(self.row, self.col))
    }
}

/// Decodes bijective base-26 column letters (`A` = 0, `AA` = 26).
/// Returns `None` for non-letters, empty input, or overflow.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut number = 0usize;
    for letter in letters.chars() {
        if !letter.is_ascii_alphabetic() {
            return None;
        }
        let digit = (letter.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        number = number.checked_mul(26)?.checked_add(digit)?;
    }
    Some(number - 1)
}

/// Decodes a 1-based row number. `"0"` and overflow give `None`.
pub(crate) fn row_to_index(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok()?.checked_sub(1)
}

/// Lenient split used by workbook readers: `"C7"` gives `(6, 2)`.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    Some((row_to_index(digits)?, col_to_index(letters)?))
}

/// Renders zero-based coordinates as an upper-case reference.
pub fn index_to_reference(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut column = col + 1;
    while column > 0 {
        column -= 1;
        letters.push(b'A' + (column % 26) as u8);
        column /= 26;
    }
    letters.reverse();
    let mut reference = String::from_utf8(letters).unwrap_or_default();
    reference.push_str(&(row + 1).to_string());
    reference
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_examples() {
        assert_eq!(CellReference::parse("A1").unwrap(), CellReference::new(0, 0));
        assert_eq!(CellReference::parse("B5").unwrap(), CellReference::new(4, 1));
        assert_eq!(CellReference::parse("BC12").unwrap(), CellReference::new(11, 54));
        assert_eq!(CellReference::parse("  z26 ").unwrap(), CellReference::new(25, 25));
    }

    #[test]
    fn round_trips_upper_cased() {
        for reference in ["a1", "Z9", "AA10", "az3", "ZZ100", "XFD1048576", "aaa7"] {
            let cell: CellReference = reference.parse().unwrap();
            assert_eq!(cell.to_string(), reference.to_ascii_uppercase());
        }
    }

    #[test]
    fn rejects_malformed_references() {
        for reference in ["", "A", "12", "1A", "A1B", "A-1", "A 1", "É1", "A0", "A00"] {
            let error = CellReference::parse(reference).unwrap_err();
            assert!(
                matches!(error, CutterError::InvalidReference { .. }),
                "{reference} gave {error:?}"
            );
        }
    }

    #[test]
    fn rejects_overflowing_parts() {
        assert!(CellReference::parse("A99999999999999999999999").is_err());
        assert!(CellReference::parse("ZZZZZZZZZZZZZZZZZZZZ1").is_err());
    }

    #[test]
    fn column_letters() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("Z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index("a1"), None);
        assert_eq!(col_to_index(""), None);
    }

    #[test]
    fn lenient_reader_references() {
        assert_eq!(reference_to_index("C7"), Some((6, 2)));
        assert_eq!(reference_to_index("C"), None);
        assert_eq!(index_to_reference(6, 2), "C7");
        assert_eq!(index_to_reference(0, 16_383), "XFD1");
    }
}
