mod context;
mod display;
mod fcfs;
mod metrics;
mod process;
mod round_robin;
mod runner;
mod srt;
mod timeline;

use std::fmt;

use serde::Serialize;

use crate::{error::SimulationError, workload::Workload};

pub use display::DisplayTerminal;
pub use fcfs::FcfsScheduler;
pub use metrics::Summary;
pub use process::{Completion, Process, ProcessState};
pub use round_robin::RoundRobinScheduler;
pub use runner::{Frame, ReplayRunner};
pub use srt::SrtScheduler;
pub use timeline::{Slice, Timeline};

pub type Pid = u32;
pub type Ticks = u64;

pub trait Scheduler {
    const NAME: &'static str;
    const POLICY: Policy;

    /// Simulates the workload on a private copy of its processes.
    fn schedule(&self, workload: &Workload) -> Result<Schedule, SimulationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum Policy {
    #[serde(rename = "FCFS")]
    Fcfs,
    #[serde(rename = "SRT")]
    Srt,
    #[serde(rename = "RR")]
    #[value(name = "rr", alias = "round-robin")]
    RoundRobin,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Fcfs, Policy::Srt, Policy::RoundRobin];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => FcfsScheduler::NAME,
            Policy::Srt => SrtScheduler::NAME,
            Policy::RoundRobin => RoundRobinScheduler::NAME,
        }
    }

    /// Time a Gantt chart entry is labelled with: FCFS records the dispatch
    /// instant, the preemptive policies record where the slice ended.
    pub fn mark(self, slice: &Slice) -> Ticks {
        match self {
            Policy::Fcfs => slice.start,
            Policy::Srt | Policy::RoundRobin => slice.end,
        }
    }

    pub fn run(self, workload: &Workload) -> Result<Schedule, SimulationError> {
        match self {
            Policy::Fcfs => FcfsScheduler.schedule(workload),
            Policy::Srt => SrtScheduler.schedule(workload),
            Policy::RoundRobin => RoundRobinScheduler::new(workload.quantum()).schedule(workload),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Policy::Fcfs => "FCFS",
            Policy::Srt => "SRT",
            Policy::RoundRobin => "RR",
        })
    }
}

/// Outcome of one engine run: the Gantt chart plus every process finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub policy: Policy,
    pub timeline: Timeline,
    pub processes: Vec<Process>,
}

impl Schedule {
    pub fn summary(&self) -> Result<Summary, SimulationError> {
        Summary::from_processes(&self.processes)
    }

    /// `(pid, time)` Gantt chart entries, labelled per [`Policy::mark`].
    pub fn marks(&self) -> impl Iterator<Item = (Pid, Ticks)> + '_ {
        self.timeline
            .iter()
            .map(|slice| (slice.pid, self.policy.mark(slice)))
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.iter().find(|process| process.pid() == pid)
    }
}
