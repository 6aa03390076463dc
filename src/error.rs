// Error type shared by the loader, the view pipeline and the menu.
use thiserror::Error;

/// Errors raised while loading the registry workbook or building a view.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The workbook does not have the expected shape, or a cell cannot be
    /// interpreted. Fatal: nothing should be rendered from such a dataset.
    #[error("Data format error in sheet '{sheet}' (row {row}): {message}")]
    DataFormat {
        sheet: String,
        row: usize,
        message: String,
    },

    #[error("No society named '{society}' in the dataset")]
    NoMatch { society: String },

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn data_format(sheet: &str, row: usize, message: impl Into<String>) -> Self {
        Self::DataFormat {
            sheet: sheet.to_string(),
            row,
            message: message.into(),
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
