// Entry point and high-level CLI flow.
//
// - The workbook is loaded once at startup; a malformed workbook stops the
//   process before anything is rendered.
// - The interactive menu then runs until the user quits. Nothing is written
//   back to disk.
use clap::Parser;
use crcs_dashboard::config::{Controls, DashboardConfig};
use crcs_dashboard::dashboard::Dashboard;
use crcs_dashboard::{loader, util};
use std::io;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &DashboardConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(config: &DashboardConfig) -> crcs_dashboard::Result<()> {
    let (dataset, report) = loader::load(&config.file)?;
    println!(
        "Processing dataset... ({} rows loaded from {} sheets)",
        util::format_int(report.loaded_rows),
        report.sheets
    );
    if report.skipped_rows > 0 {
        println!(
            "Note: {} rows skipped because they have no society name.",
            util::format_int(report.skipped_rows)
        );
    }
    println!();

    let controls = Controls::from_config(config, &dataset);
    let stdin = io::stdin();
    let mut dashboard = Dashboard::new(&dataset, controls, stdin.lock(), io::stdout());
    dashboard.run()
}

fn main() -> ExitCode {
    let config = DashboardConfig::parse();
    init_logging(&config);
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Failed: {e}");
            ExitCode::FAILURE
        }
    }
}
