use std::{io, path::PathBuf};

use crate::scheduler::{Pid, Ticks};

#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    #[error("failed to read workload from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("workload ended before {what}")]
    MissingValue { what: String },
    #[error("invalid {what}: {token:?} is not a non-negative integer")]
    InvalidNumber { what: String, token: String },
    #[error("process P{pid} has a burst time of zero")]
    ZeroBurst { pid: Pid },
    #[error("time quantum must be greater than zero")]
    ZeroQuantum,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("ready queue drained at t={time} with processes {pending:?} still pending")]
    Stall { time: Ticks, pending: Vec<Pid> },
    #[error("workload has no processes")]
    EmptyWorkload,
    #[error("process P{pid} never completed")]
    Incomplete { pid: Pid },
}
