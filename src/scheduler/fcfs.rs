use super::{context::SimContext, Policy, Schedule, Scheduler};
use crate::{error::SimulationError, workload::Workload};

/// Non-preemptive first-come-first-served.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    const NAME: &'static str = "First-Come-First-Served Scheduler";
    const POLICY: Policy = Policy::Fcfs;

    fn schedule(&self, workload: &Workload) -> Result<Schedule, SimulationError> {
        let mut ctx = SimContext::new(workload);

        for index in ctx.arrival_order() {
            let arrival = ctx.processes[index].arrival();
            if ctx.now < arrival {
                log::trace!("fcfs: idle {} -> {}", ctx.now, arrival);
                ctx.now = arrival;
            }

            ctx.dispatch(index);
            let burst = ctx.processes[index].burst();
            log::debug!("fcfs: t={} run P{} for {}", ctx.now, ctx.pid(index), burst);
            ctx.advance(burst);
        }

        Ok(ctx.into_schedule(Self::POLICY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::test_support::{textbook, workload};

    #[test]
    fn runs_in_arrival_order() {
        let schedule = FcfsScheduler.schedule(&textbook()).unwrap();

        // FCFS charts each process at the instant it was dispatched.
        assert_eq!(
            schedule.marks().collect::<Vec<_>>(),
            vec![(1, 0), (2, 5), (3, 8)]
        );
        let ends: Vec<_> = schedule.timeline.iter().map(|s| s.end).collect();
        assert_eq!(ends, vec![5, 8, 16]);
        let waiting: Vec<_> = schedule.processes.iter().map(|p| p.waiting().unwrap()).collect();
        assert_eq!(waiting, vec![0, 4, 6]);
    }

    #[test]
    fn reorders_by_arrival_with_pid_ties() {
        let schedule = FcfsScheduler
            .schedule(&workload(&[(4, 1), (0, 2), (0, 3)], 2))
            .unwrap();

        let order: Vec<_> = schedule.timeline.iter().map(|s| s.pid).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(schedule.process(1).unwrap().finish(), Some(6));
    }

    #[test]
    fn idles_until_next_arrival() {
        let schedule = FcfsScheduler
            .schedule(&workload(&[(0, 2), (10, 3)], 1))
            .unwrap();

        let second = schedule.timeline.get(1).unwrap();
        assert_eq!((second.start, second.end), (10, 13));
        assert_eq!(schedule.process(2).unwrap().waiting(), Some(0));
    }
}
