mod message_attribute;

use std::collections::HashMap;

use anyhow::Context;
use aws_sdk_sns::operation::publish::PublishOutput;
use aws_sdk_sns::types::MessageAttributeValue;

pub use message_attribute::{build_binary_message_attribute, build_string_message_attribute};

#[derive(Clone, Debug)]
pub struct SNS {
    inner: aws_sdk_sns::Client,
}

impl SNS {
    pub fn new(inner: aws_sdk_sns::Client) -> Self {
        Self { inner }
    }

    /// Publishes a plain text message to the topic.
    ///
    /// # Arguments
    ///
    /// * `topic_arn` - The ARN of the topic to publish to
    /// * `message` - The message body
    /// * `message_attributes` - Optional message attributes, these are what subscription filter
    ///   policies are evaluated against
    ///
    /// # Returns
    ///
    /// * `Ok(PublishOutput)` once the topic has accepted the message. Acceptance says nothing
    ///   about whether any subscription delivered it.
    /// * `Err` if the publish call failed
    #[tracing::instrument(skip(self, message_attributes))]
    pub async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        message_attributes: Option<HashMap<String, MessageAttributeValue>>,
    ) -> anyhow::Result<PublishOutput> {
        let output = self
            .inner
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .set_message_attributes(message_attributes)
            .send()
            .await
            .context("unable to publish message to topic")?;

        tracing::trace!(message_id=?output.message_id(), "published message");

        Ok(output)
    }
}
