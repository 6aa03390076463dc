// Utility helpers for parsing and formatting.
//
// Cell-level date handling and the area-of-operation splitting live here so
// the loader and the pipeline can work with typed values.
use chrono::{Days, NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use num_format::{Locale, ToFormattedString};

/// Text formats accepted for a registration date. ISO first, then the
/// day-first layouts used by Indian registries.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d-%b-%Y", "%d %b %Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Parse a textual registration date.
///
/// Returns `None` for anything that matches none of the accepted layouts;
/// the caller decides whether that is fatal.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Convert a spreadsheet serial day number (1900 date system) to a date.
///
/// Serial 1 is 1900-01-01 and serial 60 is the fictitious 1900-02-29, which
/// has no calendar date. Serials from 61 on count from 1899-12-30.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let day = serial.floor() as u64;
    let epoch = match day {
        1..=59 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        60 => return None,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_days(Days::new(day))
}

/// Split an area-of-operation cell into trimmed, non-empty state names.
pub fn split_areas(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|a| !a.is_empty())
}

/// Deduplicate area names across several cells, keeping first-seen order.
pub fn unique_areas<'a>(cells: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for cell in cells {
        seen.extend(split_areas(cell));
    }
    seen.into_iter().map(str::to_string).collect()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p)
}
