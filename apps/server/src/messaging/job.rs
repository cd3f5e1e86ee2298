//! Job payloads carried on the dispatch queues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::topology::{
    ELEMENT_TEST_KEY, ELEMENT_TEST_QUEUE, TEST_EXCHANGE, TEST_RUN_EXCHANGE, TEST_RUN_KEY,
    TEST_RUN_QUEUE, TEST_SUITE_KEY, TEST_SUITE_QUEUE,
};

/// What a job asks a worker to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    TestRun,
    TestSuite,
    ElementTest,
}

impl JobKind {
    /// Exchange and routing key a job of this kind is published with.
    pub fn route(&self) -> (&'static str, &'static str) {
        match self {
            JobKind::TestRun => (TEST_RUN_EXCHANGE, TEST_RUN_KEY),
            JobKind::TestSuite => (TEST_EXCHANGE, TEST_SUITE_KEY),
            JobKind::ElementTest => (TEST_RUN_EXCHANGE, ELEMENT_TEST_KEY),
        }
    }

    /// Queue consumers read this kind from.
    pub fn queue(&self) -> &'static str {
        match self {
            JobKind::TestRun => TEST_RUN_QUEUE,
            JobKind::TestSuite => TEST_SUITE_QUEUE,
            JobKind::ElementTest => ELEMENT_TEST_QUEUE,
        }
    }
}

/// JSON job message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestJob {
    pub job_id: Uuid,
    pub kind: JobKind,
    /// Run, suite or test case ID depending on `kind`
    pub target_id: i64,
    pub requested_by: Option<i64>,
    pub requested_at: DateTime<Utc>,
}

impl TestJob {
    pub fn new(kind: JobKind, target_id: i64, requested_by: Option<i64>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            kind,
            target_id,
            requested_by,
            requested_at: Utc::now(),
        }
    }
}
