use super::{Pid, Policy, Process, ProcessState, Schedule, Ticks, Timeline};
use crate::workload::Workload;

/// Mutable state of one engine run. Processes live in an arena indexed by
/// load order, so index `i` always holds pid `i + 1`.
#[derive(Debug)]
pub(crate) struct SimContext {
    pub now: Ticks,
    pub processes: Vec<Process>,
    pub completed: usize,
    pub running: Option<usize>,
    pub timeline: Timeline,
    slice_start: Ticks,
}

impl SimContext {
    pub fn new(workload: &Workload) -> Self {
        Self {
            now: 0,
            processes: workload.processes().to_vec(),
            completed: 0,
            running: None,
            timeline: Timeline::new(),
            slice_start: 0,
        }
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.processes.len()
    }

    pub fn pid(&self, index: usize) -> Pid {
        self.processes[index].pid()
    }

    /// Indices ordered by arrival time, ties kept in pid order.
    pub fn arrival_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.processes.len()).collect();
        order.sort_by_key(|&index| self.processes[index].arrival());
        order
    }

    pub fn mark_ready(&mut self, index: usize) {
        self.processes[index].set_state(ProcessState::Ready);
    }

    /// Makes `index` the running process and opens its slice at the current time.
    pub fn dispatch(&mut self, index: usize) {
        debug_assert!(self.running.is_none(), "dispatch while another process runs");
        self.running = Some(index);
        self.slice_start = self.now;
        self.processes[index].set_state(ProcessState::Running);
    }

    /// Runs the current process for `ticks` and advances the clock.
    /// Returns true if the process finished.
    pub fn advance(&mut self, ticks: Ticks) -> bool {
        let Some(index) = self.running else {
            self.now += ticks;
            return false;
        };

        let used = self.processes[index].run(ticks);
        debug_assert_eq!(used, ticks, "P{} overran its burst", self.pid(index));
        self.now += used;

        if self.processes[index].is_completed() {
            self.processes[index].complete(self.now);
            self.completed += 1;
            self.close_slice();
            true
        } else {
            false
        }
    }

    /// Closes the running slice at the current time and clears the runner.
    /// Returns the index of the process that was running.
    pub fn close_slice(&mut self) -> Option<usize> {
        let index = self.running.take()?;
        self.timeline.push(self.pid(index), self.slice_start, self.now);
        Some(index)
    }

    /// Closes the current slice and returns the process to the ready state.
    pub fn preempt(&mut self) -> Option<usize> {
        let index = self.close_slice()?;
        self.mark_ready(index);
        Some(index)
    }

    pub fn pending(&self) -> Vec<Pid> {
        self.processes
            .iter()
            .filter(|process| !process.is_completed())
            .map(Process::pid)
            .collect()
    }

    pub fn into_schedule(self, policy: Policy) -> Schedule {
        Schedule {
            policy,
            timeline: self.timeline,
            processes: self.processes,
        }
    }
}
