use std::{cmp::Reverse, collections::BinaryHeap};

use super::{context::SimContext, Policy, Schedule, Scheduler, Ticks};
use crate::{error::SimulationError, workload::Workload};

/// Preemptive shortest-remaining-time.
///
/// The choice of runner can only change when a process arrives or completes,
/// so instead of stepping one tick at a time the clock jumps straight to the
/// next of those events. Ready processes sit in a min-heap keyed by
/// `(remaining, index)`: the index component reproduces the pid-order tie
/// break, and the running process only yields to a strictly smaller key.
pub struct SrtScheduler;

impl Scheduler for SrtScheduler {
    const NAME: &'static str = "Shortest-Remaining-Time Scheduler";
    const POLICY: Policy = Policy::Srt;

    fn schedule(&self, workload: &Workload) -> Result<Schedule, SimulationError> {
        let mut ctx = SimContext::new(workload);
        let arrivals = ctx.arrival_order();
        let mut next_arrival = 0;
        let mut ready: BinaryHeap<Reverse<(Ticks, usize)>> = BinaryHeap::new();

        while !ctx.all_completed() {
            while let Some(&index) = arrivals.get(next_arrival) {
                if ctx.processes[index].arrival() > ctx.now {
                    break;
                }
                log::trace!("srt: t={} P{} arrives", ctx.now, ctx.pid(index));
                ctx.mark_ready(index);
                ready.push(Reverse((ctx.processes[index].remaining(), index)));
                next_arrival += 1;
            }

            if let Some(&Reverse((remaining, candidate))) = ready.peek() {
                let preempts = ctx
                    .running
                    .map_or(true, |running| remaining < ctx.processes[running].remaining());

                if preempts {
                    ready.pop();
                    if let Some(previous) = ctx.preempt() {
                        log::debug!(
                            "srt: t={} P{} preempts P{}",
                            ctx.now,
                            ctx.pid(candidate),
                            ctx.pid(previous)
                        );
                        ready.push(Reverse((ctx.processes[previous].remaining(), previous)));
                    }
                    ctx.dispatch(candidate);
                }
            }

            let upcoming = arrivals
                .get(next_arrival)
                .map(|&index| ctx.processes[index].arrival());

            let Some(running) = ctx.running else {
                // Nothing is ready, so the next event has to be an arrival.
                match upcoming {
                    Some(arrival) => {
                        log::trace!("srt: idle {} -> {}", ctx.now, arrival);
                        ctx.now = arrival;
                        continue;
                    }
                    None => {
                        return Err(SimulationError::Stall {
                            time: ctx.now,
                            pending: ctx.pending(),
                        })
                    }
                }
            };

            let remaining = ctx.processes[running].remaining();
            let run_for = upcoming.map_or(remaining, |arrival| remaining.min(arrival - ctx.now));
            if ctx.advance(run_for) {
                log::debug!("srt: t={} P{} completes", ctx.now, ctx.pid(running));
            }
        }

        Ok(ctx.into_schedule(Self::POLICY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::test_support::{textbook, workload};

    #[test]
    fn shorter_arrival_preempts() {
        let schedule = SrtScheduler.schedule(&textbook()).unwrap();

        assert_eq!(
            schedule.timeline.marks().collect::<Vec<_>>(),
            vec![(1, 1), (2, 4), (1, 8), (3, 16)]
        );
        let finish: Vec<_> = schedule.processes.iter().map(|p| p.finish().unwrap()).collect();
        assert_eq!(finish, vec![8, 4, 16]);
    }

    #[test]
    fn equal_remaining_keeps_incumbent() {
        // At t=1 both have 3 units left; P1 keeps the CPU.
        let schedule = SrtScheduler
            .schedule(&workload(&[(0, 4), (1, 3)], 1))
            .unwrap();

        assert_eq!(
            schedule.timeline.marks().collect::<Vec<_>>(),
            vec![(1, 4), (2, 7)]
        );
    }

    #[test]
    fn ties_between_waiting_processes_go_to_lower_pid() {
        let schedule = SrtScheduler
            .schedule(&workload(&[(0, 2), (1, 3), (0, 3)], 1))
            .unwrap();

        let order: Vec<_> = schedule.timeline.iter().map(|s| s.pid).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn idle_gap_has_no_timeline_entry() {
        let schedule = SrtScheduler
            .schedule(&workload(&[(0, 1), (5, 2)], 1))
            .unwrap();

        let slices: Vec<_> = schedule.timeline.iter().map(|s| (s.pid, s.start, s.end)).collect();
        assert_eq!(slices, vec![(1, 0, 1), (2, 5, 7)]);
    }
}
