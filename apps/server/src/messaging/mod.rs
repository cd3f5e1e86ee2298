//! Test job dispatch.
//!
//! The broker topology is declared as data ([`Topology::job_dispatch`]) and
//! applied to a [`Broker`]. Publishers and consumers share one
//! [`RetryPolicy`]; a consumer that exhausts it rejects the delivery without
//! requeue, so the broker dead-letters it instead of redelivering forever.
//!
//! [`InMemoryBroker`] is the only broker implementation. It lives inside one
//! process, so the HTTP server does not start consumers; tests and embedding
//! processes publish and consume through a shared `Arc` of it.

mod broker;
pub mod dispatch;
pub mod job;
pub mod retry;
pub mod topology;

pub use broker::{Broker, Delivery, InMemoryBroker, Message};
pub use dispatch::{
    DeliveryOutcome, JobConsumer, JobError, JobPublisher, spawn_job_consumers,
};
pub use job::{JobKind, TestJob};
pub use retry::{RetryExhausted, RetryPolicy};
pub use topology::{
    BindingDecl, ExchangeDecl, ExchangeKind, ListenerSettings, QueueDecl, Topology,
};

/// Errors raised by the broker and the dispatch layer.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("Unknown exchange: {0}")]
    UnknownExchange(String),

    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    #[error("Unknown delivery tag: {0}")]
    UnknownDeliveryTag(u64),

    #[error("Exchange {0} already declared with different settings")]
    DeclarationMismatch(String),

    #[error("Job payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Broker state poisoned")]
    StatePoisoned,
}
