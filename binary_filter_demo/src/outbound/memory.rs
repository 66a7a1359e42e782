//! An in-process stand-in for the topic, its subscriptions and their queues.
//! Which way binary attributes are treated during filtering is a switch, so both the documented
//! and the observed platform behaviour can be asserted against.

use crate::domain::{
    models::{
        DeliveryResult, MessageAttribute, OutboundMessage, QueueUrl, ReceivedMessage,
        TRACE_ATTRIBUTE, TRACE_VALUE, TopicArn,
    },
    ports::{QueueClient, TopicPublisher},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// How the platform evaluates a filter policy against a message with a binary attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryAttributeHandling {
    /// binary attributes are skipped and the string attributes alone decide
    Ignore,
    /// any binary attribute keeps the message out of the subscription
    DropMessage,
}

/// A subscription filter policy, attribute name to the string values it admits.
/// Every named attribute has to match for a message to be delivered.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct FilterPolicy(HashMap<String, Vec<String>>);

impl FilterPolicy {
    /// parse a policy written the way the platform takes it, e.g. `{"Trace": ["true"]}`
    pub fn from_json(policy: &str) -> serde_json::Result<Self> {
        serde_json::from_str(policy)
    }

    /// the policy the demo queue is subscribed with
    pub fn trace() -> Self {
        FilterPolicy(HashMap::from([(
            TRACE_ATTRIBUTE.to_string(),
            vec![TRACE_VALUE.to_string()],
        )]))
    }

    /// whether `message` passes this policy
    pub fn admits(&self, message: &OutboundMessage, handling: BinaryAttributeHandling) -> bool {
        if handling == BinaryAttributeHandling::DropMessage && message.has_binary_attribute() {
            return false;
        }

        self.0.iter().all(|(name, allowed)| {
            message
                .attributes
                .get(name)
                .and_then(MessageAttribute::as_str)
                .is_some_and(|value| allowed.iter().any(|a| a == value))
        })
    }
}

/// The errors the in-memory platform produces
#[derive(Debug, Error)]
pub enum InMemoryPlatformErr {
    /// nothing was registered for this topic arn
    #[error("topic does not exist: {0}")]
    UnknownTopic(String),
    /// nothing was registered for this queue url
    #[error("queue does not exist: {0}")]
    UnknownQueue(String),
    /// the purge was refused, mirrors the platform's one purge per minute rule
    #[error("purge already in progress for {0}")]
    PurgeInProgress(String),
}

#[derive(Debug)]
struct Subscription {
    queue_url: String,
    policy: FilterPolicy,
}

#[derive(Debug, Default)]
struct PlatformState {
    subscriptions: HashMap<String, Vec<Subscription>>,
    queues: HashMap<String, Vec<ReceivedMessage>>,
    published: Vec<(String, OutboundMessage)>,
    purged: Vec<String>,
    receives: Vec<(String, i32)>,
    refuse_purge: bool,
}

/// A topic with filtered queue subscriptions, shared between clones
#[derive(Debug, Clone)]
pub struct InMemoryPlatform {
    handling: BinaryAttributeHandling,
    state: Arc<Mutex<PlatformState>>,
}

impl InMemoryPlatform {
    /// create an empty platform
    pub fn new(handling: BinaryAttributeHandling) -> Self {
        InMemoryPlatform {
            handling,
            state: Default::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// create the queue if needed and subscribe it to the topic
    pub fn subscribe(&self, topic_arn: &TopicArn, queue_url: &QueueUrl, policy: FilterPolicy) {
        let mut state = self.state();
        state.queues.entry(queue_url.to_string()).or_default();
        state
            .subscriptions
            .entry(topic_arn.to_string())
            .or_default()
            .push(Subscription {
                queue_url: queue_url.to_string(),
                policy,
            });
    }

    /// put a message straight into a queue, bypassing the topic
    pub fn enqueue(&self, queue_url: &QueueUrl, message: ReceivedMessage) {
        self.state()
            .queues
            .entry(queue_url.to_string())
            .or_default()
            .push(message);
    }

    /// make every following purge fail
    pub fn refuse_purges(&self) {
        self.state().refuse_purge = true;
    }

    /// every message accepted by a topic, with its topic arn, in publish order
    pub fn published(&self) -> Vec<(String, OutboundMessage)> {
        self.state().published.clone()
    }

    /// the queue urls that were purged, in order
    pub fn purged(&self) -> Vec<String> {
        self.state().purged.clone()
    }

    /// the queue url and batch size of every receive call, in order
    pub fn receives(&self) -> Vec<(String, i32)> {
        self.state().receives.clone()
    }

    /// what a queue currently holds
    pub fn queue_contents(&self, queue_url: &QueueUrl) -> Vec<ReceivedMessage> {
        self.state()
            .queues
            .get(queue_url.as_str())
            .cloned()
            .unwrap_or_default()
    }
}

fn delivered(message: &OutboundMessage) -> ReceivedMessage {
    ReceivedMessage {
        message_id: Some(uuid::Uuid::new_v4().to_string()),
        receipt_handle: Some(uuid::Uuid::new_v4().to_string()),
        md5_of_body: None,
        body: Some(message.body.clone()),
        attributes: HashMap::new(),
        message_attributes: message
            .attributes
            .iter()
            .map(|(name, attr)| {
                let value = match attr {
                    MessageAttribute::String(s) => s.clone(),
                    MessageAttribute::Binary(b) => String::from_utf8_lossy(b).into_owned(),
                };
                (name.clone(), value)
            })
            .collect(),
    }
}

impl TopicPublisher for InMemoryPlatform {
    type Err = InMemoryPlatformErr;

    async fn publish(
        &self,
        topic_arn: &TopicArn,
        message: OutboundMessage,
    ) -> Result<DeliveryResult, Self::Err> {
        let mut state = self.state();
        let PlatformState {
            subscriptions,
            queues,
            published,
            ..
        } = &mut *state;

        let subscriptions = subscriptions
            .get(topic_arn.as_str())
            .ok_or_else(|| InMemoryPlatformErr::UnknownTopic(topic_arn.to_string()))?;

        for subscription in subscriptions {
            if !subscription.policy.admits(&message, self.handling) {
                tracing::trace!(queue_url=%subscription.queue_url, body=%message.body, "filtered out");
                continue;
            }
            queues
                .entry(subscription.queue_url.clone())
                .or_default()
                .push(delivered(&message));
        }

        published.push((topic_arn.to_string(), message));

        Ok(DeliveryResult {
            success: true,
            message_id: Some(uuid::Uuid::new_v4().to_string()),
            sequence_number: None,
            request_id: Some(uuid::Uuid::new_v4().to_string()),
        })
    }
}

impl QueueClient for InMemoryPlatform {
    type Err = InMemoryPlatformErr;

    async fn purge(&self, queue_url: &QueueUrl) -> Result<(), Self::Err> {
        let mut state = self.state();
        if state.refuse_purge {
            return Err(InMemoryPlatformErr::PurgeInProgress(queue_url.to_string()));
        }

        let queue = state
            .queues
            .get_mut(queue_url.as_str())
            .ok_or_else(|| InMemoryPlatformErr::UnknownQueue(queue_url.to_string()))?;
        queue.clear();
        state.purged.push(queue_url.to_string());

        Ok(())
    }

    async fn receive(
        &self,
        queue_url: &QueueUrl,
        max_messages: i32,
    ) -> Result<Vec<ReceivedMessage>, Self::Err> {
        let mut state = self.state();
        state.receives.push((queue_url.to_string(), max_messages));

        let queue = state
            .queues
            .get(queue_url.as_str())
            .ok_or_else(|| InMemoryPlatformErr::UnknownQueue(queue_url.to_string()))?;

        let take = usize::try_from(max_messages).unwrap_or_default();
        Ok(queue.iter().take(take).cloned().collect())
    }
}
