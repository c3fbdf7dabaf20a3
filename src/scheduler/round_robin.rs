use std::collections::VecDeque;

use super::{context::SimContext, Policy, Schedule, Scheduler, Ticks};
use crate::{error::SimulationError, workload::Workload};

pub struct RoundRobinScheduler {
    quantum: Ticks,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks) -> Self {
        debug_assert!(quantum > 0, "round robin needs a non-zero quantum");
        Self { quantum }
    }
}

/// FIFO of arena indices with a membership table kept in lockstep.
struct ReadyQueue {
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl ReadyQueue {
    fn new(len: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(len),
            queued: vec![false; len],
        }
    }

    fn push_back(&mut self, index: usize) {
        debug_assert!(!self.queued[index], "index {index} queued twice");
        self.queued[index] = true;
        self.queue.push_back(index);
    }

    fn pop_front(&mut self) -> Option<usize> {
        let index = self.queue.pop_front()?;
        self.queued[index] = false;
        Some(index)
    }

    fn contains(&self, index: usize) -> bool {
        self.queued[index]
    }

    /// Enqueues, in pid order, every eligible process that is not already
    /// queued. `skip` holds back the process that was just preempted.
    fn admit(&mut self, ctx: &mut SimContext, skip: Option<usize>) {
        for index in 0..ctx.processes.len() {
            if Some(index) == skip || self.contains(index) {
                continue;
            }
            if ctx.processes[index].is_eligible(ctx.now) {
                log::trace!("rr: t={} P{} joins the ready queue", ctx.now, ctx.pid(index));
                ctx.mark_ready(index);
                self.push_back(index);
            }
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin Scheduler";
    const POLICY: Policy = Policy::RoundRobin;

    fn schedule(&self, workload: &Workload) -> Result<Schedule, SimulationError> {
        let mut ctx = SimContext::new(workload);
        let mut ready = ReadyQueue::new(ctx.processes.len());

        loop {
            ready.admit(&mut ctx, None);

            let Some(index) = ready.pop_front() else {
                break;
            };

            ctx.dispatch(index);
            if ctx.processes[index].remaining() > self.quantum {
                ctx.advance(self.quantum);
                ctx.preempt();
                log::debug!("rr: t={} P{} used its quantum", ctx.now, ctx.pid(index));

                // Arrivals during the slice queue up ahead of the preempted process.
                ready.admit(&mut ctx, Some(index));
                ready.push_back(index);
            } else {
                let remaining = ctx.processes[index].remaining();
                ctx.advance(remaining);
                log::debug!("rr: t={} P{} completes", ctx.now, ctx.pid(index));
            }
        }

        if !ctx.all_completed() {
            let pending = ctx.pending();
            log::warn!("rr: ready queue drained at t={} with {:?} pending", ctx.now, pending);
            return Err(SimulationError::Stall {
                time: ctx.now,
                pending,
            });
        }

        Ok(ctx.into_schedule(Self::POLICY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::test_support::{textbook, workload};

    #[test]
    fn first_slice_is_a_full_quantum() {
        let schedule = RoundRobinScheduler::new(4).schedule(&textbook()).unwrap();

        assert_eq!(
            schedule.timeline.marks().collect::<Vec<_>>(),
            vec![(1, 4), (2, 7), (3, 11), (1, 12), (3, 16)]
        );
        assert!(schedule.marks().eq(schedule.timeline.marks()));
        let waiting: Vec<_> = schedule.processes.iter().map(|p| p.waiting().unwrap()).collect();
        assert_eq!(waiting, vec![7, 3, 6]);
    }

    #[test]
    fn arrivals_during_a_slice_precede_the_preempted_process() {
        // P1 runs 0..2; P2 arrives at 1 and must be served before P1 resumes.
        let schedule = RoundRobinScheduler::new(2)
            .schedule(&workload(&[(0, 3), (1, 1)], 2))
            .unwrap();

        let order: Vec<_> = schedule.timeline.iter().map(|s| s.pid).collect();
        assert_eq!(order, vec![1, 2, 1]);
    }

    #[test]
    fn exact_quantum_completes_without_requeue() {
        let schedule = RoundRobinScheduler::new(3)
            .schedule(&workload(&[(0, 3), (0, 3)], 3))
            .unwrap();

        assert_eq!(
            schedule.timeline.marks().collect::<Vec<_>>(),
            vec![(1, 3), (2, 6)]
        );
    }

    #[test]
    fn late_arrival_after_drain_is_a_stall() {
        let err = RoundRobinScheduler::new(2)
            .schedule(&workload(&[(0, 2), (5, 1)], 2))
            .unwrap_err();

        assert_eq!(
            err,
            SimulationError::Stall {
                time: 2,
                pending: vec![2],
            }
        );
    }

    #[test]
    fn ready_queue_membership_tracks_pushes_and_pops() {
        let mut ready = ReadyQueue::new(3);
        ready.push_back(2);
        ready.push_back(0);
        assert!(ready.contains(2) && ready.contains(0) && !ready.contains(1));

        assert_eq!(ready.pop_front(), Some(2));
        assert!(!ready.contains(2));
        assert_eq!(ready.pop_front(), Some(0));
        assert_eq!(ready.pop_front(), None);
    }
}
