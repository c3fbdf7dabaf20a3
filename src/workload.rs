use std::{fs, path::Path, str::FromStr};

use crate::{
    error::WorkloadError,
    scheduler::{Process, Ticks},
};

/// The immutable input shared by every engine: processes in pid order plus
/// the round robin time quantum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    processes: Vec<Process>,
    quantum: Ticks,
}

impl Workload {
    /// Builds a workload from `(arrival, burst)` pairs, assigning pids from 1.
    pub fn new<I>(pairs: I, quantum: Ticks) -> Result<Self, WorkloadError>
    where
        I: IntoIterator<Item = (Ticks, Ticks)>,
    {
        if quantum == 0 {
            return Err(WorkloadError::ZeroQuantum);
        }

        let processes = pairs
            .into_iter()
            .zip(1..)
            .map(|((arrival, burst), pid)| {
                if burst == 0 {
                    Err(WorkloadError::ZeroBurst { pid })
                } else {
                    Ok(Process::new(pid, arrival, burst))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { processes, quantum })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkloadError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| WorkloadError::Io {
            path: path.to_owned(),
            source,
        })?;

        let workload: Self = input.parse()?;
        log::info!(
            "loaded {} processes from {} (quantum {})",
            workload.len(),
            path.display(),
            workload.quantum
        );
        Ok(workload)
    }

    /// Replaces the quantum given by the input source.
    pub fn with_quantum(mut self, quantum: Ticks) -> Result<Self, WorkloadError> {
        if quantum == 0 {
            return Err(WorkloadError::ZeroQuantum);
        }
        self.quantum = quantum;
        Ok(self)
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn total_burst(&self) -> Ticks {
        self.processes.iter().map(Process::burst).sum()
    }
}

impl FromStr for Workload {
    type Err = WorkloadError;

    /// Whitespace separated integers: `n quantum` followed by `n` pairs of
    /// `arrival burst`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut tokens = input.split_ascii_whitespace();
        let mut next = |what: String| -> Result<u64, WorkloadError> {
            let token = tokens
                .next()
                .ok_or_else(|| WorkloadError::MissingValue { what: what.clone() })?;
            token.parse().map_err(|_| WorkloadError::InvalidNumber {
                what,
                token: token.to_owned(),
            })
        };

        let count = next("the process count".to_owned())?;
        let quantum = next("the time quantum".to_owned())?;

        let mut pairs = Vec::new();
        for pid in 1..=count {
            let arrival = next(format!("the arrival time of P{pid}"))?;
            let burst = next(format!("the burst time of P{pid}"))?;
            pairs.push((arrival, burst));
        }

        let trailing = tokens.count();
        if trailing > 0 {
            log::warn!("ignoring {trailing} values after the last process");
        }

        Self::new(pairs, quantum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_quantum_and_pairs() {
        let workload: Workload = "3 4\n0 5\n1 3\n2 8\n".parse().unwrap();

        assert_eq!(workload.quantum(), 4);
        assert_eq!(workload.len(), 3);
        let p2 = &workload.processes()[1];
        assert_eq!((p2.pid(), p2.arrival(), p2.burst(), p2.remaining()), (2, 1, 3, 3));
        assert_eq!(workload.total_burst(), 16);
    }

    #[test]
    fn empty_workload_parses() {
        let workload: Workload = "0 2".parse().unwrap();
        assert!(workload.is_empty());
    }

    #[test]
    fn truncated_input_names_the_missing_value() {
        let err = "2 4 0 5 1".parse::<Workload>().unwrap_err();
        assert!(matches!(err, WorkloadError::MissingValue { ref what } if what.contains("P2")));
    }

    #[test]
    fn negative_arrival_is_invalid() {
        let err = "1 4 -1 5".parse::<Workload>().unwrap_err();
        assert!(matches!(err, WorkloadError::InvalidNumber { ref token, .. } if token == "-1"));
    }

    #[test]
    fn zero_burst_and_quantum_are_rejected() {
        assert!(matches!(
            "2 4 0 5 1 0".parse::<Workload>(),
            Err(WorkloadError::ZeroBurst { pid: 2 })
        ));
        assert!(matches!(
            "1 0 0 5".parse::<Workload>(),
            Err(WorkloadError::ZeroQuantum)
        ));
    }

    #[test]
    fn quantum_override() {
        let workload: Workload = "1 4 0 5".parse().unwrap();
        assert_eq!(workload.clone().with_quantum(2).unwrap().quantum(), 2);
        assert!(matches!(workload.with_quantum(0), Err(WorkloadError::ZeroQuantum)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Workload::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, WorkloadError::Io { .. }));
    }
}
