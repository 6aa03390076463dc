// Records, the loaded dataset, and the row types of every derived view.
//
// View rows derive `Tabled` with display names matching the dashboard's
// column headers.
use chrono::{Datelike, NaiveDate};
use indexmap::IndexSet;
use tabled::Tabled;

/// One row of the unified registry: a registered cooperative society.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocietyRecord {
    pub name: String,
    pub address: String,
    pub state: String,
    /// Absent when the source sheet has no district column or the cell is blank.
    pub district: Option<String>,
    /// Absent only when the source cell was blank.
    pub registration_date: Option<NaiveDate>,
    pub sector_type: String,
    /// Comma-separated list of state names, as typed in the source.
    pub area_of_operation: String,
}

/// The unified dataset. Built once by the loader and only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SocietyRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SocietyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SocietyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Society names in first-seen order, for the society selector.
    pub fn distinct_societies(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.name.as_str()))
    }

    /// State names in first-seen order, for the state selectors.
    pub fn distinct_states(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.state.as_str()))
    }

    /// Earliest and latest registration year, if any record carries a date.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self
            .records
            .iter()
            .filter_map(|r| r.registration_date)
            .map(|d| d.year());
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values.collect::<IndexSet<_>>().into_iter().collect()
}

#[derive(Debug, Tabled, Clone, PartialEq, Eq)]
pub struct SocietyProfile {
    #[tabled(rename = "Society Name")]
    pub name: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "District")]
    pub district: String,
    #[tabled(rename = "Date of Registration")]
    pub registration_date: String,
    #[tabled(rename = "Sector Type")]
    pub sector_type: String,
}

#[derive(Debug, Tabled, Clone, PartialEq, Eq)]
pub struct AreaOfOperationRow {
    #[tabled(rename = "S. No.")]
    pub serial_no: usize,
    #[tabled(rename = "Area of Operation")]
    pub area: String,
}

/// Profile of one society plus the deduplicated states it operates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocietyProfileView {
    pub profile: SocietyProfile,
    pub areas: Vec<AreaOfOperationRow>,
}

#[derive(Debug, Tabled, Clone, PartialEq, Eq)]
pub struct FrequencyRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

/// Category counts over one dimension of the dataset (sector, state, district).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub dimension: String,
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn get(&self, category: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.count)
    }

    /// Each category's share of the total, in percent. Empty for an empty table.
    pub fn percentages(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.rows
            .iter()
            .map(|r| (r.category.as_str(), r.count as f64 * 100.0 / total as f64))
            .collect()
    }
}

#[derive(Debug, Tabled, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    /// First day of the calendar month; used for ordering only.
    #[tabled(skip)]
    pub period: NaiveDate,
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Number of Registrations")]
    pub count: usize,
}

impl MonthlyCount {
    pub fn new(period: NaiveDate, count: usize) -> Self {
        Self {
            period,
            month: period.format("%Y-%m").to_string(),
            count,
        }
    }
}

/// Registrations per calendar month, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySeries {
    pub points: Vec<MonthlyCount>,
}

impl MonthlySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.points.iter().map(|p| p.count).max().unwrap_or(0)
    }

    /// Same series with a zero point for every month between the first and
    /// last observed month.
    pub fn with_gaps_filled(&self) -> Self {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Self::default();
        };
        let mut points = Vec::new();
        let mut observed = self.points.iter().peekable();
        let mut period = first.period;
        while period <= last.period {
            let count = match observed.peek() {
                Some(p) if p.period == period => {
                    let c = p.count;
                    observed.next();
                    c
                }
                _ => 0,
            };
            points.push(MonthlyCount::new(period, count));
            period = match next_month(period) {
                Some(p) => p,
                None => break,
            };
        }
        Self { points }
    }
}

fn next_month(d: NaiveDate) -> Option<NaiveDate> {
    if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
    }
}

/// State by sector count matrix. Absent combinations are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossTab {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `counts[row][column]`
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> usize {
        let r = self.row_labels.iter().position(|l| l == row);
        let c = self.column_labels.iter().position(|l| l == column);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn row_total(&self, row: usize) -> usize {
        self.counts.get(row).map(|r| r.iter().sum()).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

#[derive(Debug, Tabled, Clone, PartialEq)]
pub struct TokenCount {
    #[tabled(rename = "Word")]
    pub token: String,
    #[tabled(rename = "Count")]
    pub count: usize,
    /// Relative weight in `(0, 1]`; the most frequent word has weight 1.
    #[tabled(rename = "Weight", display_with = "display_weight")]
    pub weight: f64,
}

fn display_weight(w: &f64) -> String {
    format!("{:.2}", w)
}

/// Word frequencies behind the word cloud, most frequent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    pub entries: Vec<TokenCount>,
}

impl TokenFrequency {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.token == token)
            .map(|e| e.count)
    }
}
