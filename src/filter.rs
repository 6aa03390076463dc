// Row filters over the dataset.
//
// Every filter borrows its input and returns the matching records in their
// original order, so filters compose and the dataset itself is never copied.
use crate::types::SocietyRecord;
use chrono::Datelike;

/// Rows whose society name equals `name` exactly. Empty when nothing matches.
pub fn filter_by_society<'a, I>(rows: I, name: &str) -> Vec<&'a SocietyRecord>
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    rows.into_iter().filter(|r| r.name == name).collect()
}

/// Rows whose state equals `state` exactly (no case folding).
pub fn filter_by_state<'a, I>(rows: I, state: &str) -> Vec<&'a SocietyRecord>
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    rows.into_iter().filter(|r| r.state == state).collect()
}

/// Rows registered between `start_year` and `end_year`, both inclusive.
///
/// Undated rows never match. An inverted range yields an empty subset.
pub fn filter_by_year_range<'a, I>(rows: I, start_year: i32, end_year: i32) -> Vec<&'a SocietyRecord>
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    if start_year > end_year {
        return Vec::new();
    }
    rows.into_iter()
        .filter(|r| {
            r.registration_date
                .is_some_and(|d| (start_year..=end_year).contains(&d.year()))
        })
        .collect()
}
