/// Trims a header and strips byte-order marks and zero-width spaces that
/// spreadsheet exports like to leave behind.
pub(crate) fn normalize_column_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_string()
}

/// Coerces an identity cell to trimmed text, substituting `placeholder` for
/// blank or `NaN` values. Words like `NA` or `None` are legitimate names here.
pub(crate) fn text_or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(text) if !is_blank_cell(text) => text.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Empty or a spreadsheet `NaN`: absent in every column.
pub(crate) fn is_blank_cell(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("nan")
}

/// Broader set of absent spellings, applied to year-indexed ESG cells only.
pub(crate) fn is_missing_marker(value: &str) -> bool {
    is_blank_cell(value)
        || matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "none" | "null" | "n/a" | "na"
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_lose_bom_and_padding() {
        assert_eq!(normalize_column_name("\u{feff} 证券代码 "), "证券代码");
        assert_eq!(normalize_column_name("2015_量化值\u{200b}"), "2015_量化值");
    }

    #[test]
    fn cells_fall_back_to_placeholder() {
        assert_eq!(text_or_placeholder(Some(" 000001 "), "unknown-code"), "000001");
        assert_eq!(text_or_placeholder(Some("  "), "unknown-code"), "unknown-code");
        assert_eq!(text_or_placeholder(Some("NaN"), "unknown-date"), "unknown-date");
        assert_eq!(text_or_placeholder(None, "unknown-industry"), "unknown-industry");
    }

    #[test]
    fn identity_words_that_look_missing_are_kept() {
        assert_eq!(text_or_placeholder(Some("NA"), "unknown-company"), "NA");
        assert_eq!(text_or_placeholder(Some(" None "), "unknown-company"), "None");
        assert!(is_missing_marker("NA"));
        assert!(is_missing_marker("null"));
        assert!(!is_blank_cell("None"));
    }
}
