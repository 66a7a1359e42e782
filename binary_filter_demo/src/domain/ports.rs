//! This module defines all of the ports the demo run requires from the messaging platform

use crate::domain::models::{DeliveryResult, OutboundMessage, QueueUrl, ReceivedMessage, TopicArn};

/// Trait for publishing messages to a notification topic
#[cfg_attr(test, mockall::automock(type Err = anyhow::Error;))]
pub trait TopicPublisher: Send + Sync + 'static {
    /// The error type that can occur
    type Err: Send;

    /// publish a single message with its attributes
    fn publish(
        &self,
        topic_arn: &TopicArn,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<DeliveryResult, Self::Err>> + Send;
}

/// Trait for the queue which is subscribed to the topic
#[cfg_attr(test, mockall::automock(type Err = anyhow::Error;))]
pub trait QueueClient: Send + Sync + 'static {
    /// The error type that can occur
    type Err: Send;

    /// discard every message currently in the queue
    fn purge(&self, queue_url: &QueueUrl) -> impl Future<Output = Result<(), Self::Err>> + Send;

    /// read up to `max_messages` messages without removing them from the queue
    fn receive(
        &self,
        queue_url: &QueueUrl,
        max_messages: i32,
    ) -> impl Future<Output = Result<Vec<ReceivedMessage>, Self::Err>> + Send;
}
