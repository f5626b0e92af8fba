#![allow(dead_code)]

use status_sync::{PollConfig, PolledEntity, StatusPhase};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Expired,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Expired => "EXPIRED",
        };
        f.write_str(label)
    }
}

impl StatusPhase for JobStatus {
    fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Processing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: u32,
    pub status: JobStatus,
}

impl PolledEntity for Job {
    type Id = u32;
    type Status = JobStatus;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn status(&self) -> JobStatus {
        self.status
    }
}

pub fn job(id: u32, status: JobStatus) -> Job {
    Job { id, status }
}

/// One-second ticks keep the timelines in the tests easy to read.
pub fn one_second() -> PollConfig {
    PollConfig::with_interval_ms(1000).unwrap()
}

/// Advances paused Tokio time.
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
