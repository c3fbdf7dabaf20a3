use std::fmt;

use serde::Serialize;

use crate::{
    error::SimulationError,
    scheduler::{Policy, Process, Schedule, Summary, Timeline},
    workload::Workload,
};

const RULE: &str = "------------------------------------------------------------------------";

#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub schedule: Schedule,
    pub summary: Summary,
}

/// Result of running one policy, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyReport {
    pub policy: Policy,
    pub result: Result<Completed, SimulationError>,
}

impl PolicyReport {
    pub fn run(policy: Policy, workload: &Workload) -> Self {
        let result = policy.run(workload).and_then(|schedule| {
            let summary = schedule.summary()?;
            Ok(Completed { schedule, summary })
        });

        if let Err(err) = &result {
            log::warn!("{policy} failed: {err}");
        }
        Self { policy, result }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs each policy in order on its own copy of the workload.
pub fn run_all(policies: &[Policy], workload: &Workload) -> Vec<PolicyReport> {
    policies
        .iter()
        .map(|&policy| PolicyReport::run(policy, workload))
        .collect()
}

pub struct GanttChart<'a>(pub &'a Schedule);

impl fmt::Display for GanttChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gantt Chart:")?;
        for (pid, time) in self.0.marks() {
            write!(f, " [P{pid} | {time}ms]")?;
        }
        Ok(())
    }
}

pub struct ProcessTable<'a>(pub &'a [Process]);

impl fmt::Display for ProcessTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10}{:<15}{:<15}{}",
            "Process", "Finish Time", "Waiting Time", "Turnaround Time"
        )?;

        let mut rows: Vec<&Process> = self.0.iter().collect();
        rows.sort_by_key(|process| process.pid());
        for process in rows {
            let cell = |value: Option<u64>| value.map_or_else(|| "-".to_owned(), |v| v.to_string());
            writeln!(
                f,
                "{:<10}{:<15}{:<15}{}",
                format!("P{}", process.pid()),
                cell(process.finish()),
                cell(process.waiting()),
                cell(process.turnaround())
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Waiting Time: {:.2} ms", self.average_waiting)?;
        writeln!(f, "Average Turnaround Time: {:.2} ms", self.average_turnaround)?;
        write!(f, "CPU Utilization: {:.2}%", self.cpu_utilization)
    }
}

impl fmt::Display for PolicyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.policy)?;
        match &self.result {
            Ok(Completed { schedule, summary }) => {
                writeln!(f, "\n{}", GanttChart(schedule))?;
                write!(f, "{}", ProcessTable(&schedule.processes))?;
                writeln!(f, "\n{summary}")
            }
            Err(err) => writeln!(f, "\nerror: {err}"),
        }
    }
}

/// Every report in order, each section closed by a horizontal rule.
pub struct TextReport<'a>(pub &'a [PolicyReport]);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        for report in self.0 {
            write!(f, "\n{report}\n{RULE}\n")?;
        }
        Ok(())
    }
}

pub fn render_text(reports: &[PolicyReport]) -> String {
    TextReport(reports).to_string()
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonReport<'a> {
    Completed {
        policy: Policy,
        timeline: &'a Timeline,
        processes: &'a [Process],
        summary: &'a Summary,
    },
    Failed {
        policy: Policy,
        error: String,
    },
}

pub fn render_json(reports: &[PolicyReport]) -> serde_json::Result<String> {
    let entries: Vec<JsonReport<'_>> = reports
        .iter()
        .map(|report| match &report.result {
            Ok(completed) => JsonReport::Completed {
                policy: report.policy,
                timeline: &completed.schedule.timeline,
                processes: &completed.schedule.processes,
                summary: &completed.summary,
            },
            Err(err) => JsonReport::Failed {
                policy: report.policy,
                error: err.to_string(),
            },
        })
        .collect();

    serde_json::to_string_pretty(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> Workload {
        "3 4 0 5 1 3 2 8".parse().unwrap()
    }

    #[test]
    fn text_report_lists_every_section_in_order() {
        let reports = run_all(&Policy::ALL, &textbook());
        let text = render_text(&reports);

        let fcfs = text.find("FCFS:").unwrap();
        let srt = text.find("SRT:").unwrap();
        let rr = text.find("RR:").unwrap();
        assert!(fcfs < srt && srt < rr);

        assert!(text.contains("Gantt Chart: [P1 | 0ms] [P2 | 5ms] [P3 | 8ms]\n"));
        assert!(text.contains("Gantt Chart: [P1 | 1ms] [P2 | 4ms] [P1 | 8ms] [P3 | 16ms]"));
        assert!(text.contains("Average Waiting Time: 3.33 ms"));
        assert!(text.contains("CPU Utilization: 37.50%"));
    }

    #[test]
    fn fcfs_chart_marks_dispatch_times_across_idle_gaps() {
        let workload: Workload = "2 2 0 2 5 1".parse().unwrap();
        let text = render_text(&run_all(&[Policy::Fcfs], &workload));

        assert!(text.contains("Gantt Chart: [P1 | 0ms] [P2 | 5ms]\n"));
    }

    #[test]
    fn table_rows_are_in_pid_order() {
        let schedule = Policy::Srt.run(&textbook()).unwrap();
        let table = ProcessTable(&schedule.processes).to_string();
        let rows: Vec<&str> = table.lines().skip(1).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("P1        8"));
        assert!(rows[1].starts_with("P2        4"));
    }

    #[test]
    fn failed_policy_does_not_hide_the_others() {
        let workload: Workload = "2 2 0 2 5 1".parse().unwrap();
        let reports = run_all(&Policy::ALL, &workload);

        assert!(reports[0].is_ok());
        assert!(reports[1].is_ok());
        assert!(matches!(
            reports[2].result,
            Err(SimulationError::Stall { time: 2, .. })
        ));
        assert!(render_text(&reports).contains("error: ready queue drained at t=2"));
    }

    #[test]
    fn json_report_carries_errors_and_summaries() {
        let workload: Workload = "0 2".parse().unwrap();
        let json = render_json(&run_all(&[Policy::Fcfs], &workload)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["policy"], "FCFS");
        assert_eq!(value[0]["error"], "workload has no processes");

        let json = render_json(&run_all(&[Policy::RoundRobin], &textbook())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["policy"], "RR");
        assert_eq!(value[0]["timeline"][0]["end"], 4);
        assert_eq!(value[0]["processes"][1]["finish"], 7);
        assert_eq!(value[0]["summary"]["makespan"], 16);
    }
}
