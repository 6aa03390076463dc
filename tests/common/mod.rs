#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

pub const FULL_HEADER: [&str; 8] = [
    "Name of Society",
    "Address",
    "State",
    "District",
    "Date of Registration",
    "Sector Type",
    "Area of Operation",
    "Unnamed: 7",
];

pub const NO_DISTRICT_HEADER: [&str; 7] = [
    "Name of Society",
    "Address",
    "State",
    "Date of Registration",
    "Sector Type",
    "Area of Operation",
    "Unnamed: 6",
];

#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    /// Spreadsheet serial day number written with a date format.
    Date(f64),
    Blank,
}

pub struct SheetSpec {
    pub name: &'static str,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

pub fn write_workbook(dir: &Path, file: &str, sheets: &[SheetSpec]) -> PathBuf {
    let path = dir.join(file);
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for spec in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(spec.name).unwrap();
        for (col, title) in spec.header.iter().enumerate() {
            ws.write_string(0, col as u16, *title).unwrap();
        }
        for (r, row) in spec.rows.iter().enumerate() {
            let r = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => {
                        ws.write_string(r, col, *s).unwrap();
                    }
                    Cell::Date(serial) => {
                        ws.write_number_with_format(r, col, *serial, &date_format).unwrap();
                    }
                    Cell::Blank => {}
                }
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}

/// Registry spread over two sheets; the second sheet has no district column.
pub fn registry_workbook(dir: &Path) -> PathBuf {
    use Cell::{Blank, Date, Text};
    let kerala = vec![
        vec![
            Text("Travancore Cochin Tourism Cooperative Society Ltd"),
            Text("MG Road, Kochi"),
            Text("KERALA"),
            Text("Ernakulam"),
            Text("12/05/2016"),
            Text("Tourism"),
            Text("Kerala, Tamil Nadu"),
            Text("x"),
        ],
        vec![
            Text("Kerala Milk Producers Cooperative Society Ltd"),
            Text("Thrissur"),
            Text("KERALA"),
            Text("Thrissur"),
            Date(43831.0),
            Text("Dairy"),
            Text("Kerala"),
            Blank,
        ],
        vec![
            Text("Malabar Credit Cooperative Society Ltd"),
            Text("Kozhikode"),
            Text("KERALA"),
            Text("Ernakulam"),
            Text("2016-05-30"),
            Text("Credit"),
            Text("Kerala,Karnataka , Kerala"),
            Blank,
        ],
        vec![
            Text("Travancore Cochin Tourism Cooperative Society Ltd"),
            Text("Second office"),
            Text("TAMIL NADU"),
            Text("Chennai"),
            Text("2018-11-02"),
            Text("Tourism"),
            Text("Tamil Nadu, Puducherry"),
            Blank,
        ],
    ];
    let maharashtra = vec![
        vec![
            Text("Pune Milk Cooperative Society Ltd"),
            Text("Pune"),
            Text("MAHARASHTRA"),
            Text("2019-01-15"),
            Text("Dairy"),
            Text("Maharashtra, Goa"),
            Text("x"),
        ],
        vec![
            Text("Nagpur Credit Cooperative Society Ltd"),
            Text("Nagpur"),
            Text("MAHARASHTRA"),
            Text("2019-01-20"),
            Text("Credit"),
            Text("Maharashtra"),
            Blank,
        ],
        vec![Blank, Blank, Blank, Blank, Blank, Blank, Blank],
    ];
    write_workbook(
        dir,
        "registry.xlsx",
        &[
            SheetSpec {
                name: "Kerala",
                header: FULL_HEADER.to_vec(),
                rows: kerala,
            },
            SheetSpec {
                name: "Maharashtra",
                header: NO_DISTRICT_HEADER.to_vec(),
                rows: maharashtra,
            },
        ],
    )
}
