//! Broker abstraction and an in-process implementation.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::MessagingError;
use super::topology::{ExchangeDecl, ExchangeKind, QueueDecl, Topology, topic_matches};

/// A message as stored on a queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub exchange: String,
    pub routing_key: String,
    pub payload: Vec<u8>,
    /// Times this message has been dead-lettered
    pub death_count: u32,
}

/// A message handed to a consumer, pending ack or reject.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub delivery_tag: u64,
    pub queue: String,
    pub redelivered: bool,
    pub message: Message,
}

/// AMQP-style broker operations used by the dispatch layer.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Declare every exchange, queue and binding. Redeclaring is a no-op.
    async fn declare(&self, topology: &Topology) -> Result<(), MessagingError>;

    /// Publish to an exchange and return how many queues received a copy.
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
    ) -> Result<usize, MessagingError>;

    /// Take the next ready message off `queue`.
    async fn get(&self, queue: &str) -> Result<Option<Delivery>, MessagingError>;

    async fn ack(&self, delivery_tag: u64) -> Result<(), MessagingError>;

    /// Reject a delivery. Without requeue the queue's dead-letter settings
    /// decide where the message goes.
    async fn reject(&self, delivery_tag: u64, requeue: bool) -> Result<(), MessagingError>;
}

struct QueueState {
    decl: QueueDecl,
    // (message, redelivered)
    ready: VecDeque<(Message, bool)>,
}

#[derive(Default)]
struct BrokerState {
    exchanges: HashMap<String, ExchangeDecl>,
    queues: HashMap<String, QueueState>,
    bindings: Vec<(String, String, String)>,
    unacked: HashMap<u64, (String, Message)>,
    next_tag: u64,
}

impl BrokerState {
    fn route(&mut self, message: Message) -> Result<usize, MessagingError> {
        let kind = self
            .exchanges
            .get(&message.exchange)
            .map(|e| e.kind)
            .ok_or_else(|| MessagingError::UnknownExchange(message.exchange.clone()))?;

        let targets: BTreeSet<&str> = self
            .bindings
            .iter()
            .filter(|(_, exchange, _)| *exchange == message.exchange)
            .filter(|(_, _, pattern)| match kind {
                ExchangeKind::Topic => topic_matches(pattern, &message.routing_key),
                ExchangeKind::Direct => *pattern == message.routing_key,
                ExchangeKind::Fanout => true,
            })
            .map(|(queue, _, _)| queue.as_str())
            .collect();

        let targets: Vec<String> = targets.into_iter().map(str::to_string).collect();
        for queue in &targets {
            if let Some(state) = self.queues.get_mut(queue) {
                state.ready.push_back((message.clone(), false));
            }
        }

        Ok(targets.len())
    }

    fn dead_letter(&mut self, queue: &str, mut message: Message) {
        let Some(decl) = self.queues.get(queue).map(|q| q.decl.clone()) else {
            return;
        };

        let Some(exchange) = decl.dead_letter_exchange() else {
            debug!("Dropped rejected message {} from {}", message.id, queue);
            return;
        };

        let routing_key = decl
            .dead_letter_routing_key()
            .unwrap_or(message.routing_key.as_str())
            .to_string();
        message.exchange = exchange.to_string();
        message.routing_key = routing_key;
        message.death_count += 1;

        let id = message.id;
        match self.route(message) {
            Ok(0) => warn!(
                "Dead letter {} from {} is unroutable on {}, dropping it",
                id, queue, exchange
            ),
            Ok(copies) => info!(
                "Dead-lettered message {} from {} via {} ({} queues)",
                id, queue, exchange, copies
            ),
            Err(err) => warn!("Dead letter {} from {} dropped: {}", id, queue, err),
        }
    }
}

/// In-process broker with topic routing and dead-lettering.
#[derive(Default)]
pub struct InMemoryBroker {
    state: Mutex<BrokerState>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BrokerState>, MessagingError> {
        self.state.lock().map_err(|_| MessagingError::StatePoisoned)
    }

    /// Messages waiting on `queue`, not counting unacked deliveries.
    pub fn queue_depth(&self, queue: &str) -> Result<usize, MessagingError> {
        let state = self.lock()?;
        state
            .queues
            .get(queue)
            .map(|q| q.ready.len())
            .ok_or_else(|| MessagingError::UnknownQueue(queue.to_string()))
    }

    pub fn unacked_count(&self) -> Result<usize, MessagingError> {
        Ok(self.lock()?.unacked.len())
    }
}

#[async_trait]
impl Broker for InMemoryBroker {
    async fn declare(&self, topology: &Topology) -> Result<(), MessagingError> {
        let mut state = self.lock()?;

        for exchange in &topology.exchanges {
            match state.exchanges.get(&exchange.name) {
                Some(existing) if existing != exchange => {
                    return Err(MessagingError::DeclarationMismatch(exchange.name.clone()));
                }
                Some(_) => {}
                None => {
                    state
                        .exchanges
                        .insert(exchange.name.clone(), exchange.clone());
                }
            }
        }

        for queue in &topology.queues {
            state
                .queues
                .entry(queue.name.clone())
                .or_insert_with(|| QueueState {
                    decl: queue.clone(),
                    ready: VecDeque::new(),
                });
        }

        for binding in &topology.bindings {
            if !state.exchanges.contains_key(&binding.exchange) {
                return Err(MessagingError::UnknownExchange(binding.exchange.clone()));
            }
            if !state.queues.contains_key(&binding.queue) {
                return Err(MessagingError::UnknownQueue(binding.queue.clone()));
            }
            let entry = (
                binding.queue.clone(),
                binding.exchange.clone(),
                binding.routing_key.clone(),
            );
            if !state.bindings.contains(&entry) {
                state.bindings.push(entry);
            }
        }

        info!(
            "Declared {} exchanges, {} queues, {} bindings",
            topology.exchanges.len(),
            topology.queues.len(),
            topology.bindings.len()
        );
        Ok(())
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
    ) -> Result<usize, MessagingError> {
        let message = Message {
            id: Uuid::new_v4(),
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            payload,
            death_count: 0,
        };
        self.lock()?.route(message)
    }

    async fn get(&self, queue: &str) -> Result<Option<Delivery>, MessagingError> {
        let mut state = self.lock()?;

        let next = state
            .queues
            .get_mut(queue)
            .ok_or_else(|| MessagingError::UnknownQueue(queue.to_string()))?
            .ready
            .pop_front();

        let Some((message, redelivered)) = next else {
            return Ok(None);
        };

        state.next_tag += 1;
        let delivery_tag = state.next_tag;
        state
            .unacked
            .insert(delivery_tag, (queue.to_string(), message.clone()));

        Ok(Some(Delivery {
            delivery_tag,
            queue: queue.to_string(),
            redelivered,
            message,
        }))
    }

    async fn ack(&self, delivery_tag: u64) -> Result<(), MessagingError> {
        self.lock()?
            .unacked
            .remove(&delivery_tag)
            .map(|_| ())
            .ok_or(MessagingError::UnknownDeliveryTag(delivery_tag))
    }

    async fn reject(&self, delivery_tag: u64, requeue: bool) -> Result<(), MessagingError> {
        let mut state = self.lock()?;
        let (queue, message) = state
            .unacked
            .remove(&delivery_tag)
            .ok_or(MessagingError::UnknownDeliveryTag(delivery_tag))?;

        if requeue {
            if let Some(q) = state.queues.get_mut(&queue) {
                q.ready.push_front((message, true));
            }
        } else {
            state.dead_letter(&queue, message);
        }
        Ok(())
    }
}
