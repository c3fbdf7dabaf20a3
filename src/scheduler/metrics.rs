use serde::Serialize;

use super::{Process, Ticks};
use crate::error::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub average_waiting: f64,
    pub average_turnaround: f64,
    /// `(makespan - total waiting) / makespan * 100`. Waiting time stands in
    /// for idle time here, so the value can drop below zero under contention.
    pub cpu_utilization: f64,
    pub makespan: Ticks,
    pub total_waiting: Ticks,
    pub total_turnaround: Ticks,
}

impl Summary {
    pub fn from_processes(processes: &[Process]) -> Result<Self, SimulationError> {
        if processes.is_empty() {
            return Err(SimulationError::EmptyWorkload);
        }

        let mut makespan = 0;
        let mut total_waiting = 0;
        let mut total_turnaround = 0;
        for process in processes {
            let completion = process
                .completion()
                .ok_or(SimulationError::Incomplete { pid: process.pid() })?;
            makespan = makespan.max(completion.finish);
            total_waiting += completion.waiting;
            total_turnaround += completion.turnaround;
        }

        let count = processes.len() as f64;
        let cpu_utilization =
            (makespan as f64 - total_waiting as f64) / makespan as f64 * 100.0;

        Ok(Self {
            average_waiting: total_waiting as f64 / count,
            average_turnaround: total_turnaround as f64 / count,
            cpu_utilization,
            makespan,
            total_waiting,
            total_turnaround,
        })
    }
}
