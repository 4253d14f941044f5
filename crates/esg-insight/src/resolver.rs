use crate::dataset::{Record, Table};
use tracing::{debug, warn};

/// Single entry returned by [`search`] when nothing matches. Callers treat it
/// as "no selection", never as a display key.
pub const NO_MATCH: &str = "no matching company";

/// Case-insensitive substring filter over display keys.
///
/// A blank query returns the list unchanged; a query matching nothing returns
/// `[NO_MATCH]` instead of an empty list.
pub fn search<S: AsRef<str>>(query: &str, display_keys: &[S]) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return display_keys
            .iter()
            .map(|key| key.as_ref().to_string())
            .collect();
    }

    let matches: Vec<String> = display_keys
        .iter()
        .map(|key| key.as_ref())
        .filter(|key| key.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect();

    if matches.is_empty() {
        vec![NO_MATCH.to_string()]
    } else {
        matches
    }
}

/// Resolves a display-key selection to a record. Never fails for a non-empty
/// table: ambiguity or absence degrades to the first record.
///
/// Order: parenthesized code, then bare name, then the whole display key,
/// then the first record.
pub fn resolve<'t>(selection: &str, table: &'t Table) -> Option<&'t Record> {
    let records = table.records();
    let selection = selection.trim();

    let by_identity = match parenthesized_code(selection) {
        Some(code) => records.iter().find(|record| record.code == code),
        None => {
            let name = name_part(selection);
            records.iter().find(|record| record.name == name)
        }
    };

    if let Some(record) = by_identity {
        debug!(selection, code = %record.code, "resolved company");
        return Some(record);
    }

    if let Some(record) = records.iter().find(|record| record.display_key == selection) {
        debug!(selection, code = %record.code, "resolved company by display key");
        return Some(record);
    }

    let fallback = table.first();
    if let Some(record) = fallback {
        warn!(selection, code = %record.code, "no exact company match; using first record");
    }
    fallback
}

/// Text between the first opening parenthesis and the matching closing one,
/// accepting ASCII and full-width forms.
fn parenthesized_code(selection: &str) -> Option<&str> {
    let (open, width) = selection
        .char_indices()
        .find(|(_, ch)| matches!(ch, '(' | '（'))
        .map(|(index, ch)| (index, ch.len_utf8()))?;
    let rest = &selection[open + width..];
    let close = rest.find([')', '）'])?;
    Some(rest[..close].trim())
}

fn name_part(selection: &str) -> &str {
    selection
        .split(['(', '（'])
        .next()
        .unwrap_or(selection)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            vec![
                Record::new("000001", "PingAn Bank", "Finance", "1991-04-03"),
                Record::new("000002", "Vanke A", "Real Estate", "1991-01-29"),
                Record::new("600010", "Vanke A", "Manufacturing", "2000-01-31"),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let keys = table().display_keys();
        assert_eq!(search("  VANKE ", &keys), vec![keys[1].clone(), keys[2].clone()]);
        assert_eq!(search("000001", &keys), vec![keys[0].clone()]);
    }

    #[test]
    fn blank_search_returns_list_unchanged() {
        let keys = vec!["b", "a", "c"];
        assert_eq!(search("   ", &keys), vec!["b", "a", "c"]);
    }

    #[test]
    fn unmatched_search_returns_sentinel() {
        let keys = table().display_keys();
        assert_eq!(search("zzz", &keys), vec![NO_MATCH.to_string()]);
    }

    #[test]
    fn code_disambiguates_same_named_companies() {
        let table = table();
        let record = resolve("Vanke A(600010)-Manufacturing", &table).expect("record");
        assert_eq!(record.industry, "Manufacturing");

        let record = resolve("Vanke A（000002）-Real Estate", &table).expect("record");
        assert_eq!(record.code, "000002");
    }

    #[test]
    fn bare_name_resolves_first_same_named_company() {
        let table = table();
        let record = resolve("Vanke A", &table).expect("record");
        assert_eq!(record.code, "000002");
    }

    #[test]
    fn unknown_code_falls_back_to_first_record() {
        let table = table();
        let record = resolve("Ghost(999999)-Nowhere", &table).expect("record");
        assert_eq!(record.code, "000001");
        assert_eq!(resolve("", &table).map(|record| record.code.as_str()), Some("000001"));
        assert_eq!(
            resolve(NO_MATCH, &table).map(|record| record.code.as_str()),
            Some("000001")
        );
    }

    #[test]
    fn display_key_match_covers_unparenthesized_keys() {
        let table = Table::new(
            vec![
                Record::new("1", "Alpha", "Energy", "2001-01-01"),
                Record {
                    display_key: "custom key".to_string(),
                    ..Record::new("2", "Beta", "Energy", "2001-01-01")
                },
            ],
            Vec::new(),
        );
        let record = resolve("custom key", &table).expect("record");
        assert_eq!(record.code, "2");
    }

    #[test]
    fn parenthesized_code_handles_both_widths() {
        assert_eq!(parenthesized_code("平安银行（000001）-金融"), Some("000001"));
        assert_eq!(parenthesized_code("Alpha( 42 )-x"), Some("42"));
        assert_eq!(parenthesized_code("Alpha(42"), None);
        assert_eq!(parenthesized_code("Alpha"), None);
    }
}
