// Registry workbook loader.
//
// Every sheet is read with calamine, checked against the expected columns,
// and appended to one combined table. The combined table's trailing column is
// dropped before rows become `SocietyRecord`s.
use crate::error::{DashboardError, Result};
use crate::types::{Dataset, SocietyRecord};
use crate::util::{excel_serial_to_date, parse_date_text};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use indexmap::IndexSet;
use std::path::Path;
use tracing::{debug, info, warn};

pub const NAME_COLUMN: &str = "Name of Society";
pub const ADDRESS_COLUMN: &str = "Address";
pub const STATE_COLUMN: &str = "State";
pub const DISTRICT_COLUMN: &str = "District";
pub const DATE_COLUMN: &str = "Date of Registration";
pub const SECTOR_COLUMN: &str = "Sector Type";
pub const AREA_COLUMN: &str = "Area of Operation";

/// Columns every sheet must carry. `District` is optional.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    NAME_COLUMN,
    ADDRESS_COLUMN,
    STATE_COLUMN,
    DATE_COLUMN,
    SECTOR_COLUMN,
    AREA_COLUMN,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub sheets: usize,
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Non-blank rows dropped because they had no society name.
    pub skipped_rows: usize,
    pub undated_rows: usize,
}

/// One worksheet as read from the workbook: a header row plus data rows.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl RawSheet {
    pub fn from_range(name: &str, range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let header = rows
            .next()
            .map(|cells| cells.iter().map(|c| cell_text(c).trim().to_string()).collect())
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            header,
            rows: rows.map(<[Data]>::to_vec).collect(),
        }
    }

    /// A worksheet with neither a header nor data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.header.iter().all(String::is_empty)
    }

    /// Fails on the first required column missing from this sheet's header.
    pub fn validate(&self) -> Result<()> {
        match REQUIRED_COLUMNS
            .iter()
            .find(|column| !self.header.iter().any(|h| h == *column))
        {
            Some(column) => Err(DashboardError::data_format(
                &self.name,
                1,
                format!("missing required column '{column}'"),
            )),
            None => Ok(()),
        }
    }
}

/// Load every sheet of the registry workbook into one dataset.
///
/// Sheets are concatenated in workbook order and the trailing column of the
/// combined table is discarded before records are built.
pub fn load(path: impl AsRef<Path>) -> Result<(Dataset, LoadReport)> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        debug!(sheet = %name, rows = range.height(), "read worksheet");
        sheets.push(RawSheet::from_range(&name, &range));
    }
    if sheets.is_empty() {
        return Err(DashboardError::data_format(
            &path.display().to_string(),
            0,
            "workbook has no sheets",
        ));
    }
    let (dataset, report) = unify(sheets)?;
    info!(
        path = %path.display(),
        sheets = report.sheets,
        rows = report.loaded_rows,
        skipped = report.skipped_rows,
        undated = report.undated_rows,
        "loaded registry"
    );
    Ok((dataset, report))
}

/// Concatenate already-read sheets and convert them into records.
pub fn unify(sheets: Vec<RawSheet>) -> Result<(Dataset, LoadReport)> {
    let sheet_count = sheets.len();
    let mut table = CombinedTable::default();
    for sheet in sheets {
        if sheet.is_empty() {
            warn!(sheet = %sheet.name, "skipping empty worksheet");
            continue;
        }
        sheet.validate()?;
        table.append(sheet);
    }
    table.drop_last_column();
    let columns = ColumnMap::resolve(&table)?;

    let mut report = LoadReport {
        sheets: sheet_count,
        ..LoadReport::default()
    };
    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        report.total_rows += 1;
        if row.cells.iter().all(is_blank) {
            continue;
        }
        let name = cell_text(row.cell(columns.name));
        if name.trim().is_empty() {
            warn!(sheet = %row.sheet, row = row.line, "skipping row without society name");
            report.skipped_rows += 1;
            continue;
        }
        let registration_date = parse_date_cell(row.cell(columns.date))
            .map_err(|message| DashboardError::data_format(&row.sheet, row.line, message))?;
        if registration_date.is_none() {
            report.undated_rows += 1;
        }
        let district = columns
            .district
            .map(|idx| cell_text(row.cell(idx)))
            .filter(|d| !d.trim().is_empty());
        records.push(SocietyRecord {
            name,
            address: cell_text(row.cell(columns.address)),
            state: cell_text(row.cell(columns.state)),
            district,
            registration_date,
            sector_type: cell_text(row.cell(columns.sector)),
            area_of_operation: cell_text(row.cell(columns.area)),
        });
    }
    report.loaded_rows = records.len();
    Ok((Dataset::new(records), report))
}

#[derive(Debug)]
struct CombinedRow {
    sheet: String,
    /// 1-based line in the source sheet (the header is line 1).
    line: usize,
    cells: Vec<Data>,
}

static EMPTY: Data = Data::Empty;

impl CombinedRow {
    fn cell(&self, idx: usize) -> &Data {
        self.cells.get(idx).unwrap_or(&EMPTY)
    }
}

/// Union of all sheet columns in first-seen order, like a dataframe concat.
#[derive(Debug, Default)]
struct CombinedTable {
    sheets: Vec<String>,
    columns: IndexSet<String>,
    rows: Vec<CombinedRow>,
}

impl CombinedTable {
    fn append(&mut self, sheet: RawSheet) {
        let mut used: IndexSet<String> = IndexSet::new();
        let mapping: Vec<usize> = sheet
            .header
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let base = if h.is_empty() {
                    format!("Unnamed: {idx}")
                } else {
                    h.clone()
                };
                let mut name = base.clone();
                let mut n = 1;
                while used.contains(&name) {
                    name = format!("{base}.{n}");
                    n += 1;
                }
                used.insert(name.clone());
                self.columns.insert_full(name).0
            })
            .collect();

        for (i, cells) in sheet.rows.into_iter().enumerate() {
            let mut combined = vec![Data::Empty; self.columns.len()];
            for (src, cell) in cells.into_iter().enumerate() {
                if let Some(&dst) = mapping.get(src) {
                    combined[dst] = cell;
                }
            }
            self.rows.push(CombinedRow {
                sheet: sheet.name.clone(),
                line: i + 2,
                cells: combined,
            });
        }
        self.sheets.push(sheet.name);
    }

    fn drop_last_column(&mut self) {
        if let Some(dropped) = self.columns.pop() {
            debug!(column = %dropped, "dropping trailing column");
            let width = self.columns.len();
            for row in &mut self.rows {
                row.cells.truncate(width);
            }
        }
    }
}

struct ColumnMap {
    name: usize,
    address: usize,
    state: usize,
    district: Option<usize>,
    date: usize,
    sector: usize,
    area: usize,
}

impl ColumnMap {
    fn resolve(table: &CombinedTable) -> Result<Self> {
        let required = |column: &str| {
            table.columns.get_index_of(column).ok_or_else(|| {
                DashboardError::data_format(
                    &table.sheets.join(", "),
                    1,
                    format!("missing required column '{column}'"),
                )
            })
        };
        Ok(Self {
            name: required(NAME_COLUMN)?,
            address: required(ADDRESS_COLUMN)?,
            state: required(STATE_COLUMN)?,
            district: table.columns.get_index_of(DISTRICT_COLUMN),
            date: required(DATE_COLUMN)?,
            sector: required(SECTOR_COLUMN)?,
            area: required(AREA_COLUMN)?,
        })
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Text content of a cell. Whole floats print without a fractional part so
/// numeric codes read the way they were typed.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

/// `Ok(None)` for a blank cell, `Err` for anything that is not a date.
fn parse_date_cell(cell: &Data) -> std::result::Result<Option<NaiveDate>, String> {
    let parsed = match cell {
        Data::Empty => return Ok(None),
        Data::String(s) if s.trim().is_empty() => return Ok(None),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::Float(f) => excel_serial_to_date(*f),
        Data::Int(i) => excel_serial_to_date(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        Data::Bool(_) | Data::DurationIso(_) | Data::Error(_) => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| format!("cannot parse '{}' as a registration date", cell_text(cell)))
}
