//! Exchanges, queues and bindings for test job dispatch.

use std::collections::BTreeMap;

use serde::Serialize;

pub const TEST_RUN_EXCHANGE: &str = "testRunExchange";
pub const TEST_EXCHANGE: &str = "test.exchange";
pub const DEAD_LETTER_EXCHANGE: &str = "dlx.exchange";

pub const TEST_RUN_QUEUE: &str = "testRunQueue";
pub const TEST_RUN_KEY: &str = "testRunKey";
pub const DEAD_LETTER_QUEUE: &str = "dlq.testRunKey";
pub const TEST_SUITE_QUEUE: &str = "testSuiteQueue";
pub const TEST_SUITE_KEY: &str = "testSuiteKey";
pub const ELEMENT_TEST_QUEUE: &str = "elementTestQueue";
pub const ELEMENT_TEST_KEY: &str = "elementTestKey";

pub const ARG_DEAD_LETTER_EXCHANGE: &str = "x-dead-letter-exchange";
pub const ARG_DEAD_LETTER_ROUTING_KEY: &str = "x-dead-letter-routing-key";

/// Exchange routing behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Direct,
    Fanout,
    Topic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeDecl {
    pub name: String,
    pub kind: ExchangeKind,
    pub durable: bool,
    pub auto_delete: bool,
}

impl ExchangeDecl {
    /// Durable, non auto-deleting topic exchange.
    pub fn topic(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ExchangeKind::Topic,
            durable: true,
            auto_delete: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueDecl {
    pub name: String,
    pub durable: bool,
    pub arguments: BTreeMap<String, String>,
}

impl QueueDecl {
    pub fn durable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            durable: true,
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_argument(mut self, key: &str, value: &str) -> Self {
        self.arguments.insert(key.to_string(), value.to_string());
        self
    }

    pub fn dead_letter_exchange(&self) -> Option<&str> {
        self.arguments
            .get(ARG_DEAD_LETTER_EXCHANGE)
            .map(String::as_str)
    }

    /// Routing key for dead letters; `None` keeps the message's own key.
    pub fn dead_letter_routing_key(&self) -> Option<&str> {
        self.arguments
            .get(ARG_DEAD_LETTER_ROUTING_KEY)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingDecl {
    pub queue: String,
    pub exchange: String,
    pub routing_key: String,
}

impl BindingDecl {
    pub fn new(queue: &str, exchange: &str, routing_key: &str) -> Self {
        Self {
            queue: queue.to_string(),
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
        }
    }
}

/// Consumer-side delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSettings {
    /// Whether a rejected delivery goes back to its queue. Off, so rejected
    /// jobs are dead-lettered.
    pub default_requeue_rejected: bool,
    pub content_type: &'static str,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            default_requeue_rejected: false,
            content_type: "application/json",
        }
    }
}

/// Everything a broker must declare before jobs can flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub exchanges: Vec<ExchangeDecl>,
    pub queues: Vec<QueueDecl>,
    pub bindings: Vec<BindingDecl>,
}

impl Topology {
    /// Topology used for test run, suite and element test jobs.
    pub fn job_dispatch() -> Self {
        let exchanges = vec![
            ExchangeDecl::topic(TEST_RUN_EXCHANGE),
            ExchangeDecl::topic(TEST_EXCHANGE),
            ExchangeDecl::topic(DEAD_LETTER_EXCHANGE),
        ];

        let queues = vec![
            QueueDecl::durable(TEST_RUN_QUEUE)
                .with_argument(ARG_DEAD_LETTER_EXCHANGE, TEST_RUN_EXCHANGE)
                .with_argument(ARG_DEAD_LETTER_ROUTING_KEY, DEAD_LETTER_QUEUE),
            QueueDecl::durable(DEAD_LETTER_QUEUE),
            // Dead letters keep the `testSuiteKey` routing key on dlx.exchange
            QueueDecl::durable(TEST_SUITE_QUEUE)
                .with_argument(ARG_DEAD_LETTER_EXCHANGE, DEAD_LETTER_EXCHANGE),
            QueueDecl::durable(ELEMENT_TEST_QUEUE),
        ];

        let bindings = vec![
            BindingDecl::new(TEST_RUN_QUEUE, TEST_RUN_EXCHANGE, TEST_RUN_KEY),
            BindingDecl::new(DEAD_LETTER_QUEUE, TEST_RUN_EXCHANGE, DEAD_LETTER_QUEUE),
            BindingDecl::new(TEST_SUITE_QUEUE, TEST_EXCHANGE, TEST_SUITE_KEY),
            BindingDecl::new(ELEMENT_TEST_QUEUE, TEST_RUN_EXCHANGE, ELEMENT_TEST_KEY),
        ];

        Self {
            exchanges,
            queues,
            bindings,
        }
    }

    pub fn exchange(&self, name: &str) -> Option<&ExchangeDecl> {
        self.exchanges.iter().find(|e| e.name == name)
    }

    pub fn queue(&self, name: &str) -> Option<&QueueDecl> {
        self.queues.iter().find(|q| q.name == name)
    }
}

/// AMQP topic matching: `*` matches one word, `#` zero or more.
pub fn topic_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = routing_key.split('.').collect();
    match_words(&pattern, &key)
}

fn match_words(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&"#", rest)) => (0..=key.len()).any(|skip| match_words(rest, &key[skip..])),
        Some((&"*", rest)) => !key.is_empty() && match_words(rest, &key[1..]),
        Some((word, rest)) => key.first() == Some(word) && match_words(rest, &key[1..]),
    }
}
