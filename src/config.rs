use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Parser, ValueEnum};

use crate::scheduler::{Policy, Ticks};

const DEFAULT_TICK_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "cpu-scheduler-sim",
    about = "Simulate FCFS, SRT and Round Robin CPU scheduling over a fixed workload"
)]
pub struct Config {
    /// Workload file: `n quantum` followed by `n` pairs of `arrival burst`
    #[arg(value_name = "INPUT", default_value = "processes.txt")]
    pub input: PathBuf,

    /// Override the round robin quantum given by the workload
    #[arg(short, long, value_name = "TICKS", value_parser = clap::value_parser!(u64).range(1..))]
    pub quantum: Option<Ticks>,

    /// Policies to run, in the order given (defaults to fcfs, srt, rr)
    #[arg(short, long = "policy", value_enum)]
    pub policies: Vec<Policy>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Replay the schedules in an interactive terminal view after printing
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub interactive: bool,

    /// Replay speed in milliseconds per timeline slice
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn policies(&self) -> Vec<Policy> {
        if self.policies.is_empty() {
            Policy::ALL.to_vec()
        } else {
            self.policies.clone()
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
