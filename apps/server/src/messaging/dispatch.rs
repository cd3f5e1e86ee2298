//! Job publisher and queue consumers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::job::{JobKind, TestJob};
use super::retry::RetryPolicy;
use super::topology::ListenerSettings;
use super::{Broker, MessagingError};
use crate::config::MessagingSettings;

/// Failure reported by a job handler.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct JobError(pub String);

/// Publishes test jobs with the shared retry policy.
pub struct JobPublisher<B: Broker + ?Sized> {
    broker: Arc<B>,
    retry: RetryPolicy,
}

impl<B: Broker + ?Sized> JobPublisher<B> {
    pub fn new(broker: Arc<B>, retry: RetryPolicy) -> Self {
        Self { broker, retry }
    }

    pub async fn publish_test_run(
        &self,
        run_id: i64,
        requested_by: Option<i64>,
    ) -> Result<TestJob, MessagingError> {
        self.publish(TestJob::new(JobKind::TestRun, run_id, requested_by))
            .await
    }

    pub async fn publish_test_suite(
        &self,
        suite_id: i64,
        requested_by: Option<i64>,
    ) -> Result<TestJob, MessagingError> {
        self.publish(TestJob::new(JobKind::TestSuite, suite_id, requested_by))
            .await
    }

    pub async fn publish_element_test(
        &self,
        test_case_id: i64,
        requested_by: Option<i64>,
    ) -> Result<TestJob, MessagingError> {
        self.publish(TestJob::new(JobKind::ElementTest, test_case_id, requested_by))
            .await
    }

    /// Serialize and publish `job` on its kind's exchange and routing key.
    pub async fn publish(&self, job: TestJob) -> Result<TestJob, MessagingError> {
        let (exchange, routing_key) = job.kind.route();
        let payload = serde_json::to_vec(&job)?;

        let routed = self
            .retry
            .run("Job publish", |_| {
                let broker = Arc::clone(&self.broker);
                let payload = payload.clone();
                async move { broker.publish(exchange, routing_key, payload).await }
            })
            .await
            .map_err(|exhausted| exhausted.last_error)?;

        if routed == 0 {
            warn!(
                "Job {} on {}/{} matched no queue",
                job.job_id, exchange, routing_key
            );
        } else {
            info!(
                job_id = %job.job_id,
                kind = ?job.kind,
                target_id = job.target_id,
                "Published job to {}",
                exchange
            );
        }

        Ok(job)
    }
}

/// What happened to one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Acked {
        job_id: Uuid,
    },
    /// Rejected after `attempts` handler runs. `job_id` is `None` when the
    /// payload could not be decoded.
    Rejected {
        job_id: Option<Uuid>,
        attempts: u32,
        requeued: bool,
    },
}

/// Reads jobs from one queue and runs a handler on each.
pub struct JobConsumer<B: Broker + ?Sized> {
    broker: Arc<B>,
    queue: String,
    settings: ListenerSettings,
    retry: RetryPolicy,
}

impl<B: Broker + ?Sized> JobConsumer<B> {
    pub fn new(broker: Arc<B>, queue: &str, settings: ListenerSettings, retry: RetryPolicy) -> Self {
        Self {
            broker,
            queue: queue.to_string(),
            settings,
            retry,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Handle at most one delivery. Returns `None` when the queue is empty.
    ///
    /// The handler is retried in place; when it keeps failing the delivery is
    /// rejected with the listener's requeue setting.
    pub async fn poll_once<H, Fut>(
        &self,
        handler: &H,
    ) -> Result<Option<DeliveryOutcome>, MessagingError>
    where
        H: Fn(TestJob) -> Fut,
        Fut: Future<Output = Result<(), JobError>>,
    {
        let Some(delivery) = self.broker.get(&self.queue).await? else {
            return Ok(None);
        };
        let requeue = self.settings.default_requeue_rejected;

        let job: TestJob = match serde_json::from_slice(&delivery.message.payload) {
            Ok(job) => job,
            Err(err) => {
                // Decoding will never succeed on retry
                warn!(
                    "Rejecting undecodable message {} on {}: {}",
                    delivery.message.id, self.queue, err
                );
                self.broker.reject(delivery.delivery_tag, requeue).await?;
                return Ok(Some(DeliveryOutcome::Rejected {
                    job_id: None,
                    attempts: 0,
                    requeued: requeue,
                }));
            }
        };
        let job_id = job.job_id;

        let result = self
            .retry
            .run("Job handler", |_| handler(job.clone()))
            .await;

        match result {
            Ok(()) => {
                self.broker.ack(delivery.delivery_tag).await?;
                info!("Job {} on {} completed", job_id, self.queue);
                Ok(Some(DeliveryOutcome::Acked { job_id }))
            }
            Err(exhausted) => {
                error!(
                    "Job {} on {} failed after {} attempts: {}",
                    job_id, self.queue, exhausted.attempts, exhausted.last_error
                );
                self.broker.reject(delivery.delivery_tag, requeue).await?;
                Ok(Some(DeliveryOutcome::Rejected {
                    job_id: Some(job_id),
                    attempts: exhausted.attempts,
                    requeued: requeue,
                }))
            }
        }
    }

    /// Poll forever, sleeping `idle_interval` whenever the queue is empty.
    pub async fn run<H, Fut>(self, handler: H, idle_interval: Duration)
    where
        H: Fn(TestJob) -> Fut,
        Fut: Future<Output = Result<(), JobError>>,
    {
        info!("Consumer started on {}", self.queue);
        loop {
            match self.poll_once(&handler).await {
                Ok(Some(_)) => {}
                Ok(None) => tokio::time::sleep(idle_interval).await,
                Err(e) => {
                    error!("Consumer on {} failed: {}", self.queue, e);
                    tokio::time::sleep(idle_interval).await;
                }
            }
        }
    }
}

/// Spawn one consumer per work queue, each running `handler` on its jobs.
///
/// Returns the consumer tasks; they poll until aborted. Nothing in the HTTP
/// server publishes jobs, so this is for processes that embed the dispatch
/// layer and share `broker` with their own [`JobPublisher`].
pub fn spawn_job_consumers<B, H, Fut>(
    broker: Arc<B>,
    settings: &MessagingSettings,
    handler: H,
) -> Vec<JoinHandle<()>>
where
    B: Broker + ?Sized + 'static,
    H: Fn(TestJob) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    [JobKind::TestRun, JobKind::TestSuite, JobKind::ElementTest]
        .into_iter()
        .map(|kind| {
            let consumer = JobConsumer::new(
                Arc::clone(&broker),
                kind.queue(),
                ListenerSettings::default(),
                settings.retry.clone(),
            );
            tokio::spawn(consumer.run(handler.clone(), settings.consumer_poll_interval))
        })
        .collect()
}
