// Command-line configuration and the live state of the dashboard controls.
use crate::pipeline::{DISTRICT_TOP_N, STATE_TOP_N};
use crate::types::Dataset;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_FILE: &str = "dummydataset.xlsx";
pub const DEFAULT_SOCIETY: &str = "Travancore Cochin Tourism Cooperative Society Ltd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Bar,
    Pie,
}

/// Command-line configuration for the dashboard.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "crcs_dashboard",
    about = "Terminal dashboard over the registry of cooperative societies"
)]
pub struct DashboardConfig {
    /// Registry workbook (xlsx, xls, xlsb or ods); every sheet is read.
    #[arg(long, default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Society shown in the profile panel.
    #[arg(long, default_value = DEFAULT_SOCIETY)]
    pub society: String,

    /// Chart used for the sector panel.
    #[arg(long, value_enum, default_value_t = ChartKind::Pie)]
    pub sector_chart: ChartKind,

    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(1..=15))]
    pub top_states: u8,

    /// State for the per-state sector panel.
    #[arg(long, default_value = "MAHARASHTRA")]
    pub sector_state: String,

    /// State for the per-state registrations panel.
    #[arg(long, default_value = "KERALA")]
    pub timeline_state: String,

    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub top_districts: u8,

    /// State for the word cloud panel.
    #[arg(long, default_value = "KERALA")]
    pub cloud_state: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl DashboardConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence when set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Current value of every dashboard control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub society: String,
    pub sector_chart: ChartKind,
    pub top_states: usize,
    /// Inclusive year range for the registrations timeline.
    pub years: Option<(i32, i32)>,
    pub sector_state: String,
    pub timeline_state: String,
    pub top_districts: usize,
    pub cloud_state: String,
}

impl Controls {
    /// Initial controls: configured values, with selections that do not exist
    /// in the dataset replaced by its first distinct value.
    pub fn from_config(config: &DashboardConfig, dataset: &Dataset) -> Self {
        let societies = dataset.distinct_societies();
        let states = dataset.distinct_states();
        Self {
            society: pick(&config.society, &societies, "society"),
            sector_chart: config.sector_chart,
            top_states: usize::from(config.top_states)
                .clamp(*STATE_TOP_N.start(), *STATE_TOP_N.end()),
            years: dataset.year_bounds(),
            sector_state: pick(&config.sector_state, &states, "sector state"),
            timeline_state: pick(&config.timeline_state, &states, "timeline state"),
            top_districts: usize::from(config.top_districts)
                .clamp(*DISTRICT_TOP_N.start(), *DISTRICT_TOP_N.end()),
            cloud_state: pick(&config.cloud_state, &states, "word cloud state"),
        }
    }
}

fn pick(wanted: &str, options: &[&str], control: &str) -> String {
    if options.contains(&wanted) {
        return wanted.to_string();
    }
    let fallback = options.first().copied().unwrap_or_default();
    warn!(control, wanted, fallback, "default selection not in dataset");
    fallback.to_string()
}
