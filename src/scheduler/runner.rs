use std::{io, time::Duration};

use super::{display::DisplayTerminal, Pid, Schedule, Slice, Ticks};

pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    NextPolicy,
    Tick,
    None,
}

/// State of a schedule after its first `cursor` slices have executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub cursor: usize,
    pub now: Ticks,
    pub current: Option<Slice>,
    /// `(pid, remaining)` in process order.
    pub remaining: Vec<(Pid, Ticks)>,
    pub done: bool,
}

impl Frame {
    pub fn at(schedule: &Schedule, cursor: usize) -> Self {
        let cursor = cursor.min(schedule.timeline.len());
        let executed = || schedule.timeline.iter().take(cursor);

        let remaining = schedule
            .processes
            .iter()
            .map(|process| {
                let used: Ticks = executed()
                    .filter(|slice| slice.pid == process.pid())
                    .map(Slice::len)
                    .sum();
                (process.pid(), process.burst() - used)
            })
            .collect();

        let current = cursor
            .checked_sub(1)
            .and_then(|index| schedule.timeline.get(index))
            .copied();

        Self {
            cursor,
            now: current.map_or(0, |slice| slice.end),
            current,
            remaining,
            done: cursor == schedule.timeline.len(),
        }
    }

    pub fn remaining_of(&self, pid: Pid) -> Option<Ticks> {
        self.remaining
            .iter()
            .find(|&&(candidate, _)| candidate == pid)
            .map(|&(_, remaining)| remaining)
    }
}

/// Replays finished schedules slice by slice in the terminal.
pub struct ReplayRunner {
    terminal: DisplayTerminal,
    schedules: Vec<Schedule>,
    selected: usize,
    cursor: usize,
    paused: bool,
}

impl ReplayRunner {
    pub fn new(schedules: Vec<Schedule>, tick_rate: Duration) -> io::Result<Self> {
        let terminal = DisplayTerminal::new(tick_rate)?;

        Ok(Self {
            terminal,
            schedules,
            selected: 0,
            cursor: 0,
            paused: false,
        })
    }

    fn step(&mut self) {
        if let Some(schedule) = self.schedules.get(self.selected) {
            if self.cursor < schedule.timeline.len() {
                self.cursor += 1;
            }
        }
    }

    fn next_policy(&mut self) {
        if !self.schedules.is_empty() {
            self.selected = (self.selected + 1) % self.schedules.len();
            self.cursor = 0;
        }
    }

    // Returns false if the viewer should close
    pub fn run(&mut self) -> io::Result<bool> {
        let Some(schedule) = self.schedules.get(self.selected) else {
            return Ok(false);
        };

        let frame = Frame::at(schedule, self.cursor);
        self.terminal.draw(schedule, &frame, self.paused)?;

        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            RunnerEvent::Pause if !self.paused => self.paused = true,
            RunnerEvent::Resume if self.paused => self.paused = false,
            RunnerEvent::Step if self.paused => self.step(),
            RunnerEvent::NextPolicy => self.next_policy(),
            RunnerEvent::Tick if !self.paused => self.step(),
            _ => {}
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{test_support::textbook, Policy};

    #[test]
    fn frame_tracks_remaining_work() {
        let schedule = Policy::Srt.run(&textbook()).unwrap();

        let start = Frame::at(&schedule, 0);
        assert_eq!(start.now, 0);
        assert_eq!(start.current, None);
        assert_eq!(start.remaining, vec![(1, 5), (2, 3), (3, 8)]);

        let after_two = Frame::at(&schedule, 2);
        assert_eq!(after_two.now, 4);
        assert_eq!(after_two.remaining_of(1), Some(4));
        assert_eq!(after_two.remaining_of(2), Some(0));
        assert!(!after_two.done);
    }

    #[test]
    fn frame_cursor_is_clamped() {
        let schedule = Policy::Fcfs.run(&textbook()).unwrap();
        let frame = Frame::at(&schedule, 99);

        assert!(frame.done);
        assert_eq!(frame.cursor, 3);
        assert!(frame.remaining.iter().all(|&(_, remaining)| remaining == 0));
    }
}
