pub mod config;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod workload;

pub use error::{SimulationError, WorkloadError};
pub use scheduler::{Policy, Process, Schedule, Scheduler, Summary};
pub use workload::Workload;
