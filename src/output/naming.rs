//! Deterministic names for split artifacts and assembled sheets.

/// Maps a sheet name onto a fragment that is safe inside a file name.
///
/// Letters, digits, `-` and `_` are kept, anything else becomes `_`, and
/// underscores at either end are dropped. An empty result becomes `"sheet"`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    match replaced.trim_matches('_') {
        "" => "sheet".to_owned(),
        safe => safe.to_owned(),
    }
}

/// `{stem}_{sheet}_part{index:03}`, the file name of one split chunk without extension.
pub fn artifact_stem(stem: &str, sheet: &str, index: usize) -> String {
    format!("{}_{}_part{:03}", stem, sanitize_sheet_name(sheet), index)
}

/// Sheet name for the `index`-th (1-based) chunk of an assembled workbook.
pub fn assembled_sheet_name(index: usize) -> String {
    format!("Sheet{index}")
}
