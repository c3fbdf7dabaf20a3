use super::{Pid, Ticks};
use serde::Serialize;
use std::slice;

/// One contiguous stretch of CPU time given to a single process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub pid: Pid,
    pub start: Ticks,
    pub end: Ticks,
}

impl Slice {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }
}

/// Gantt chart of a single engine run. Append-only and chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    slices: Vec<Slice>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pid: Pid, start: Ticks, end: Ticks) {
        debug_assert!(end > start, "empty slice for P{pid} at {start}");
        debug_assert!(
            self.slices.last().map_or(true, |last| last.end <= start),
            "slice for P{pid} at {start} overlaps the previous one"
        );
        self.slices.push(Slice { pid, start, end });
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slice> {
        self.slices.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Slice> {
        self.slices.iter()
    }

    /// `(pid, end)` pairs, the classic Gantt chart rendering.
    pub fn marks(&self) -> impl Iterator<Item = (Pid, Ticks)> + '_ {
        self.slices.iter().map(|slice| (slice.pid, slice.end))
    }

    pub fn busy_time(&self) -> Ticks {
        self.slices.iter().map(Slice::len).sum()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Slice;
    type IntoIter = slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
