use std::{io, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use cpu_scheduler_sim::{
    config::{Config, Format},
    report::{self, Completed},
    scheduler::ReplayRunner,
    Workload,
};
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};

fn main() -> Result<ExitCode> {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    let mut workload = Workload::load(&config.input)
        .with_context(|| format!("failed to load workload {}", config.input.display()))?;
    if let Some(quantum) = config.quantum {
        workload = workload.with_quantum(quantum)?;
    }

    let reports = report::run_all(&config.policies(), &workload);
    match config.format {
        Format::Text => print!("{}", report::render_text(&reports)),
        Format::Json => println!(
            "{}",
            report::render_json(&reports).context("failed to serialize the report")?
        ),
    }

    let all_ok = reports.iter().all(|report| report.is_ok());

    if config.interactive {
        let schedules = reports
            .into_iter()
            .filter_map(|report| report.result.ok())
            .map(|Completed { schedule, .. }| schedule)
            .collect();

        execute!(io::stdout(), Clear(ClearType::All))?;
        let mut runner =
            ReplayRunner::new(schedules, config.tick_rate()).context("failed to open the terminal")?;

        while runner.run()? {}

        drop(runner);
        execute!(io::stdout(), Clear(ClearType::All))?;
    }

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
