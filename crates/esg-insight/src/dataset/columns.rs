use std::ops::RangeInclusive;

/// Markers used to recognise one kind of year-indexed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMarker {
    /// Marker that must appear next to a target year, e.g. `华证ESG评级`.
    pub strict: String,
    /// Bare marker word tried when the strict pass finds nothing.
    pub loose: String,
}

impl ColumnMarker {
    pub fn new(strict: impl Into<String>, loose: impl Into<String>) -> Self {
        Self {
            strict: strict.into(),
            loose: loose.into(),
        }
    }
}

/// Finds the columns carrying `marker` for the given years, ordered by the
/// year embedded in their names.
pub(crate) fn discover<'a, I>(
    columns: I,
    marker: &ColumnMarker,
    years: &RangeInclusive<i32>,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let strict: Vec<String> = columns
        .clone()
        .into_iter()
        .filter(|name| name.contains(marker.strict.as_str()))
        .filter(|name| years.clone().any(|year| name.contains(&year.to_string())))
        .map(str::to_string)
        .collect();

    let mut found = if strict.is_empty() {
        columns
            .into_iter()
            .filter(|name| name.contains(marker.loose.as_str()))
            .map(str::to_string)
            .collect()
    } else {
        strict
    };

    found.sort_by(|left, right| {
        sort_year(left)
            .cmp(&sort_year(right))
            .then_with(|| left.cmp(right))
    });
    found
}

/// First column whose name mentions `year`.
pub fn column_for_year(columns: &[String], year: i32) -> Option<&str> {
    let needle = year.to_string();
    columns
        .iter()
        .find(|name| name.contains(&needle))
        .map(String::as_str)
}

// Names without a year sort after every dated column.
fn sort_year(name: &str) -> i32 {
    embedded_year(name).unwrap_or(i32::MAX)
}

/// First standalone run of four ASCII digits in a column name.
pub(crate) fn embedded_year(name: &str) -> Option<i32> {
    let bytes = name.as_bytes();
    bytes.windows(4).enumerate().find_map(|(start, window)| {
        let digits = window.iter().all(u8::is_ascii_digit);
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_digit();
        let after_ok = bytes
            .get(start + 4)
            .map_or(true, |next| !next.is_ascii_digit());
        if digits && before_ok && after_ok {
            name.get(start..start + 4)?.parse().ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating_marker() -> ColumnMarker {
        ColumnMarker::new("华证ESG评级", "评级")
    }

    #[test]
    fn strict_discovery_orders_by_embedded_year() {
        let columns = [
            "证券代码",
            "2017年华证ESG评级",
            "2015年华证ESG评级",
            "2021年华证ESG评级",
            "2016年华证ESG评级",
        ];
        let found = discover(columns.iter().copied(), &rating_marker(), &(2015..=2020));
        assert_eq!(
            found,
            vec!["2015年华证ESG评级", "2016年华证ESG评级", "2017年华证ESG评级"]
        );
    }

    #[test]
    fn loose_marker_applies_only_when_strict_pass_is_empty() {
        let columns = ["评级2019", "评级2018", "name"];
        let found = discover(columns.iter().copied(), &rating_marker(), &(2015..=2020));
        assert_eq!(found, vec!["评级2018", "评级2019"]);

        let none = discover(["name", "code"].iter().copied(), &rating_marker(), &(2015..=2020));
        assert!(none.is_empty());
    }

    #[test]
    fn embedded_year_ignores_longer_digit_runs() {
        assert_eq!(embedded_year("2018_量化值"), Some(2018));
        assert_eq!(embedded_year("600000"), None);
        assert_eq!(embedded_year("score"), None);
    }

    #[test]
    fn column_for_year_picks_first_match() {
        let columns = vec!["2019_量化值".to_string(), "2020_量化值".to_string()];
        assert_eq!(column_for_year(&columns, 2020), Some("2020_量化值"));
        assert_eq!(column_for_year(&columns, 2015), None);
    }
}
