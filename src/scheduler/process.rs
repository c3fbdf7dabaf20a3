use super::{Pid, Ticks};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    Unarrived,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub finish: Ticks,
    pub waiting: Ticks,
    pub turnaround: Ticks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    pid: Pid,
    arrival: Ticks,
    burst: Ticks,
    remaining: Ticks,
    state: ProcessState,
    #[serde(flatten)]
    completion: Option<Completion>,
}

impl Process {
    pub fn new(pid: Pid, arrival: Ticks, burst: Ticks) -> Self {
        Self {
            pid,
            arrival,
            burst,
            remaining: burst,
            state: ProcessState::Unarrived,
            completion: None,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival(&self) -> Ticks {
        self.arrival
    }

    pub fn burst(&self) -> Ticks {
        self.burst
    }

    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn finish(&self) -> Option<Ticks> {
        self.completion.map(|c| c.finish)
    }

    pub fn waiting(&self) -> Option<Ticks> {
        self.completion.map(|c| c.waiting)
    }

    pub fn turnaround(&self) -> Option<Ticks> {
        self.completion.map(|c| c.turnaround)
    }

    pub fn is_eligible(&self, now: Ticks) -> bool {
        self.arrival <= now && self.remaining > 0
    }

    pub fn is_completed(&self) -> bool {
        self.remaining == 0
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Consumes up to `ticks` of CPU time and returns how much was actually used.
    pub(crate) fn run(&mut self, ticks: Ticks) -> Ticks {
        let used = ticks.min(self.remaining);
        self.remaining -= used;
        self.state = ProcessState::Running;
        used
    }

    /// Records completion at `finish` and derives turnaround and waiting time.
    pub(crate) fn complete(&mut self, finish: Ticks) {
        debug_assert_eq!(self.remaining, 0, "P{} completed with work left", self.pid);
        debug_assert!(
            finish >= self.arrival + self.burst,
            "P{} finished at {finish} before it could have",
            self.pid
        );

        let turnaround = finish - self.arrival;
        self.completion = Some(Completion {
            finish,
            turnaround,
            waiting: turnaround - self.burst,
        });
        self.state = ProcessState::Completed;
    }
}
