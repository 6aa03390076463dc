// Terminal dashboard over the registry of cooperative societies.
//
// The workbook is loaded once into an immutable `Dataset`; filters and the
// view pipeline borrow it to build fresh derived views on every interaction.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod types;
pub mod util;
pub mod wordcloud;

pub use error::{DashboardError, Result};
pub use types::{Dataset, SocietyRecord};
