// Derived views over the registry.
//
// Each function reads a set of records (the whole dataset or a filtered
// subset) and builds a fresh view. Nothing here mutates its input, so every
// view can be recomputed on each interaction with identical results.
use crate::error::{DashboardError, Result};
use crate::filter::filter_by_state;
use crate::types::{
    AreaOfOperationRow, CrossTab, FrequencyRow, FrequencyTable, MonthlyCount, MonthlySeries,
    SocietyProfile, SocietyProfileView, SocietyRecord, TokenFrequency,
};
use crate::util::unique_areas;
use crate::wordcloud::{token_frequency, CloudOptions};
use chrono::{Datelike, NaiveDate};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

pub const STATE_TOP_N: RangeInclusive<usize> = 1..=15;
pub const DISTRICT_TOP_N: RangeInclusive<usize> = 1..=20;

pub const SECTOR_DIMENSION: &str = "Sector Type";
pub const STATE_DIMENSION: &str = "State";
pub const DISTRICT_DIMENSION: &str = "District";

/// Profile of a single society from the rows already selected for it.
///
/// Scalar fields come from the first row; the area list merges every row.
/// An empty subset is the one case that is an error rather than an empty view.
pub fn society_profile<'a, I>(subset: I, society: &str) -> Result<SocietyProfileView>
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    let rows: Vec<&SocietyRecord> = subset.into_iter().collect();
    let first = rows.first().ok_or_else(|| DashboardError::NoMatch {
        society: society.to_string(),
    })?;

    let blank = rows
        .iter()
        .filter(|r| r.area_of_operation.trim().is_empty())
        .count();
    if blank > 0 {
        warn!(society, rows = blank, "rows without area of operation ignored");
    }

    let areas = unique_areas(rows.iter().map(|r| r.area_of_operation.as_str()))
        .into_iter()
        .enumerate()
        .map(|(idx, area)| AreaOfOperationRow {
            serial_no: idx + 1,
            area,
        })
        .collect();

    Ok(SocietyProfileView {
        profile: SocietyProfile {
            name: first.name.clone(),
            address: first.address.clone(),
            state: first.state.clone(),
            district: first.district.clone().unwrap_or_default(),
            registration_date: first
                .registration_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            sector_type: first.sector_type.clone(),
        },
        areas,
    })
}

/// Rows per sector type, most common first; ties keep first-seen order.
pub fn sector_frequency<'a, I>(rows: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    let mut counts = count_by(rows, |r| Some(r.sector_type.as_str()));
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    debug!(categories = counts.len(), "computed sector frequency");
    FrequencyTable {
        dimension: SECTOR_DIMENSION.to_string(),
        rows: counts,
    }
}

/// The `n` states with the most societies. `n` is clamped into [`STATE_TOP_N`].
pub fn top_states<'a, I>(rows: I, n: usize) -> FrequencyTable
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    let n = clamp_top_n(n, &STATE_TOP_N, STATE_DIMENSION);
    FrequencyTable {
        dimension: STATE_DIMENSION.to_string(),
        rows: top_n(count_by(rows, |r| Some(r.state.as_str())), n),
    }
}

/// Registrations per calendar month, ascending.
///
/// Only months with at least one registration appear; undated rows are left
/// out. See [`MonthlySeries::with_gaps_filled`] for a continuous axis.
pub fn monthly_registrations<'a, I>(rows: I) -> MonthlySeries
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut undated = 0usize;
    for r in rows {
        match r.registration_date {
            Some(d) => *per_day.entry(d).or_insert(0) += 1,
            None => undated += 1,
        }
    }
    if undated > 0 {
        debug!(rows = undated, "undated rows left out of monthly series");
    }

    let mut per_month: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for (day, count) in per_day {
        if let Some(month) = day.with_day(1) {
            *per_month.entry(month).or_insert(0) += count;
        }
    }
    MonthlySeries {
        points: per_month
            .into_iter()
            .map(|(month, count)| MonthlyCount::new(month, count))
            .collect(),
    }
}

/// Sector frequency restricted to one state.
pub fn state_sector_frequency<'a, I>(rows: I, state: &str) -> FrequencyTable
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    sector_frequency(filter_by_state(rows, state))
}

/// The `n` districts with the most societies. Rows without a district are not
/// counted. `n` is clamped into [`DISTRICT_TOP_N`].
pub fn top_districts<'a, I>(rows: I, n: usize) -> FrequencyTable
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    let n = clamp_top_n(n, &DISTRICT_TOP_N, DISTRICT_DIMENSION);
    FrequencyTable {
        dimension: DISTRICT_DIMENSION.to_string(),
        rows: top_n(count_by(rows, |r| r.district.as_deref()), n),
    }
}

/// Count of societies for every state and sector pair. Rows and columns are
/// in first-seen order.
pub fn state_sector_crosstab<'a, I>(rows: I) -> CrossTab
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    let mut states: IndexSet<&str> = IndexSet::new();
    let mut sectors: IndexSet<&str> = IndexSet::new();
    let mut cells: Vec<(usize, usize)> = Vec::new();
    for r in rows {
        let (row, _) = states.insert_full(r.state.as_str());
        let (col, _) = sectors.insert_full(r.sector_type.as_str());
        cells.push((row, col));
    }

    let mut counts = vec![vec![0usize; sectors.len()]; states.len()];
    for (row, col) in cells {
        counts[row][col] += 1;
    }
    CrossTab {
        row_labels: states.into_iter().map(str::to_string).collect(),
        column_labels: sectors.into_iter().map(str::to_string).collect(),
        counts,
    }
}

/// Word frequencies over the names of every society registered in `state`.
pub fn name_token_frequency<'a, I>(rows: I, state: &str, options: &CloudOptions) -> TokenFrequency
where
    I: IntoIterator<Item = &'a SocietyRecord>,
{
    let text = filter_by_state(rows, state)
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    token_frequency(&text, options)
}

fn count_by<'a, I, F>(rows: I, key: F) -> Vec<FrequencyRow>
where
    I: IntoIterator<Item = &'a SocietyRecord>,
    F: Fn(&'a SocietyRecord) -> Option<&'a str>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for r in rows {
        if let Some(k) = key(r) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(category, count)| FrequencyRow {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Descending by count, ascending by name on ties, first `n` kept.
fn top_n(mut rows: Vec<FrequencyRow>, n: usize) -> Vec<FrequencyRow> {
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    rows.truncate(n);
    rows
}

fn clamp_top_n(n: usize, range: &RangeInclusive<usize>, dimension: &str) -> usize {
    let clamped = n.clamp(*range.start(), *range.end());
    if clamped != n {
        warn!(requested = n, used = clamped, dimension, "top-N out of range");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_by_society, filter_by_year_range};

    fn record(name: &str, state: &str, sector: &str) -> SocietyRecord {
        SocietyRecord {
            name: name.to_string(),
            address: format!("{name} Road"),
            state: state.to_string(),
            district: None,
            registration_date: None,
            sector_type: sector.to_string(),
            area_of_operation: state.to_string(),
        }
    }

    fn dated(mut r: SocietyRecord, y: i32, m: u32, d: u32) -> SocietyRecord {
        r.registration_date = NaiveDate::from_ymd_opt(y, m, d);
        r
    }

    fn in_district(mut r: SocietyRecord, district: &str) -> SocietyRecord {
        r.district = Some(district.to_string());
        r
    }

    fn three_rows() -> Vec<SocietyRecord> {
        vec![
            record("A", "KERALA", "Dairy"),
            record("B", "KERALA", "Credit"),
            record("C", "TAMIL NADU", "Dairy"),
        ]
    }

    #[test]
    fn three_row_example() {
        let rows = three_rows();

        let sectors = sector_frequency(&rows);
        assert_eq!(sectors.rows[0], FrequencyRow { category: "Dairy".into(), count: 2 });
        assert_eq!(sectors.rows[1], FrequencyRow { category: "Credit".into(), count: 1 });

        let states = top_states(&rows, 1);
        assert_eq!(states.rows, vec![FrequencyRow { category: "KERALA".into(), count: 2 }]);

        let tab = state_sector_crosstab(&rows);
        assert_eq!(tab.get("KERALA", "Dairy"), 1);
        assert_eq!(tab.get("KERALA", "Credit"), 1);
        assert_eq!(tab.get("TAMIL NADU", "Dairy"), 1);
        assert_eq!(tab.get("TAMIL NADU", "Credit"), 0);
        assert_eq!(tab.total(), 3);
    }

    #[test]
    fn sector_ties_keep_first_seen_order() {
        let rows = vec![
            record("A", "GOA", "Credit"),
            record("B", "GOA", "Dairy"),
            record("C", "GOA", "Dairy"),
            record("D", "GOA", "Credit"),
            record("E", "GOA", "Housing"),
        ];
        let sectors = sector_frequency(&rows);
        let order: Vec<(&str, usize)> = sectors
            .rows
            .iter()
            .map(|r| (r.category.as_str(), r.count))
            .collect();
        assert_eq!(order, vec![("Credit", 2), ("Dairy", 2), ("Housing", 1)]);
    }

    #[test]
    fn profile_of_empty_subset_is_no_match() {
        let rows = three_rows();
        let subset = filter_by_society(&rows, "Nobody");
        let err = society_profile(subset, "Nobody").unwrap_err();
        assert!(err.is_no_match());
    }

    #[test]
    fn profile_uses_first_row_and_merges_areas() {
        let mut first = dated(record("Coop", "KERALA", "Tourism"), 2009, 3, 4);
        first.area_of_operation = "Kerala, Tamil Nadu".to_string();
        let mut second = record("Coop", "GOA", "Credit");
        second.area_of_operation = "Tamil Nadu , Karnataka".to_string();
        let rows = vec![first, record("Other", "GOA", "Dairy"), second];

        let view = society_profile(filter_by_society(&rows, "Coop"), "Coop").unwrap();
        assert_eq!(view.profile.state, "KERALA");
        assert_eq!(view.profile.registration_date, "2009-03-04");
        assert_eq!(view.profile.district, "");
        let areas: Vec<(usize, &str)> = view
            .areas
            .iter()
            .map(|a| (a.serial_no, a.area.as_str()))
            .collect();
        assert_eq!(areas, vec![(1, "Kerala"), (2, "Tamil Nadu"), (3, "Karnataka")]);
    }

    #[test]
    fn top_states_break_ties_alphabetically() {
        let rows = vec![
            record("A", "TRIPURA", "Dairy"),
            record("B", "ASSAM", "Dairy"),
            record("C", "GOA", "Dairy"),
            record("D", "GOA", "Dairy"),
        ];
        let top = top_states(&rows, 3);
        let names: Vec<&str> = top.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["GOA", "ASSAM", "TRIPURA"]);
    }

    #[test]
    fn top_n_is_clamped() {
        let rows = three_rows();
        assert_eq!(top_states(&rows, 0).len(), 1);
        assert_eq!(top_states(&rows, 99).len(), 2);
    }

    #[test]
    fn districts_skip_missing_values() {
        let rows = vec![
            in_district(record("A", "KERALA", "Dairy"), "Ernakulam"),
            record("B", "KERALA", "Dairy"),
            in_district(record("C", "KERALA", "Dairy"), "Ernakulam"),
            in_district(record("D", "KERALA", "Dairy"), "Idukki"),
        ];
        let top = top_districts(&rows, 20);
        assert_eq!(top.total(), 3);
        assert_eq!(top.get("Ernakulam"), Some(2));
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn monthly_series_buckets_days_into_months() {
        let rows = vec![
            dated(record("A", "GOA", "Dairy"), 2020, 3, 5),
            dated(record("B", "GOA", "Dairy"), 2019, 1, 31),
            dated(record("C", "GOA", "Dairy"), 2020, 3, 5),
            dated(record("D", "GOA", "Dairy"), 2020, 3, 28),
            record("E", "GOA", "Dairy"),
        ];
        let series = monthly_registrations(&rows);
        let points: Vec<(&str, usize)> = series
            .points
            .iter()
            .map(|p| (p.month.as_str(), p.count))
            .collect();
        assert_eq!(points, vec![("2019-01", 1), ("2020-03", 3)]);
        assert_eq!(series.total(), 4);
    }

    #[test]
    fn monthly_series_after_year_filter() {
        let rows = vec![
            dated(record("A", "GOA", "Dairy"), 2018, 7, 1),
            dated(record("B", "GOA", "Dairy"), 2019, 7, 1),
        ];
        let series = monthly_registrations(filter_by_year_range(&rows, 2019, 2019));
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].month, "2019-07");
    }

    #[test]
    fn state_sector_frequency_only_counts_state() {
        let rows = three_rows();
        let kerala = state_sector_frequency(&rows, "KERALA");
        assert_eq!(kerala.total(), 2);
        assert!(state_sector_frequency(&rows, "BIHAR").is_empty());
    }

    #[test]
    fn token_frequency_is_per_state() {
        let rows = vec![
            record("Milk Producers Society", "KERALA", "Dairy"),
            record("Milk Union", "KERALA", "Dairy"),
            record("Milk Federation", "GOA", "Dairy"),
        ];
        let freq = name_token_frequency(&rows, "KERALA", &CloudOptions::default());
        assert_eq!(freq.get("Milk"), Some(2));
        assert_eq!(freq.get("Federation"), None);
    }

    #[test]
    fn empty_input_gives_empty_views() {
        let rows: Vec<SocietyRecord> = Vec::new();
        assert!(sector_frequency(&rows).is_empty());
        assert!(top_states(&rows, 8).is_empty());
        assert!(top_districts(&rows, 10).is_empty());
        assert!(monthly_registrations(&rows).is_empty());
        assert!(state_sector_crosstab(&rows).is_empty());
        assert!(name_token_frequency(&rows, "KERALA", &CloudOptions::default()).is_empty());
    }
}
