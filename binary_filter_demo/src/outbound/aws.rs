//! Adapters from the domain ports to sns and sqs

use crate::domain::{
    models::{
        DeliveryResult, MessageAttribute, OutboundMessage, QueueUrl, ReceivedMessage, TopicArn,
    },
    ports::{QueueClient, TopicPublisher},
};
use aws_sdk_sns::operation::RequestId;
use sns_client::{SNS, build_binary_message_attribute, build_string_message_attribute};
use sqs_client::SQS;
use std::collections::HashMap;


/// publishes to an sns topic
#[derive(Clone, Debug)]
pub struct SnsTopicPublisher {
    inner: SNS,
}

impl SnsTopicPublisher {
    pub fn new(inner: SNS) -> Self {
        Self { inner }
    }
}

/// purges and reads an sqs queue
#[derive(Clone, Debug)]
pub struct SqsQueueClient {
    inner: SQS,
}

impl SqsQueueClient {
    pub fn new(inner: SQS) -> Self {
        Self { inner }
    }
}

pub(crate) fn to_sns_attributes(
    attributes: &HashMap<String, MessageAttribute>,
) -> anyhow::Result<HashMap<String, aws_sdk_sns::types::MessageAttributeValue>> {
    attributes
        .iter()
        .map(|(name, attr)| -> anyhow::Result<_> {
            let value = match attr {
                MessageAttribute::String(s) => build_string_message_attribute(s)?,
                MessageAttribute::Binary(b) => build_binary_message_attribute(b)?,
            };
            Ok((name.clone(), value))
        })
        .collect()
}

pub(crate) fn from_sqs_message(message: aws_sdk_sqs::types::Message) -> ReceivedMessage {
    let attributes = message
        .attributes()
        .map(|attrs| {
            attrs
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.clone()))
                .collect()
        })
        .unwrap_or_default();

    let message_attributes = message
        .message_attributes()
        .map(|attrs| {
            attrs
                .iter()
                .map(|(k, v)| {
                    let value = match (v.string_value(), v.binary_value()) {
                        (Some(s), _) => s.to_string(),
                        (None, Some(b)) => String::from_utf8_lossy(b.as_ref()).into_owned(),
                        (None, None) => String::new(),
                    };
                    (k.clone(), value)
                })
                .collect()
        })
        .unwrap_or_default();

    ReceivedMessage {
        message_id: message.message_id,
        receipt_handle: message.receipt_handle,
        md5_of_body: message.md5_of_body,
        body: message.body,
        attributes,
        message_attributes,
    }
}

impl TopicPublisher for SnsTopicPublisher {
    type Err = anyhow::Error;

    #[tracing::instrument(err, skip(self, message), fields(body=%message.body))]
    async fn publish(
        &self,
        topic_arn: &TopicArn,
        message: OutboundMessage,
    ) -> anyhow::Result<DeliveryResult> {
        let attributes = to_sns_attributes(&message.attributes)?;

        let output = self
            .inner
            .publish(topic_arn.as_str(), &message.body, Some(attributes))
            .await?;

        // the sdk turns every non 2xx response into an error
        Ok(DeliveryResult {
            success: true,
            request_id: output.request_id().map(str::to_string),
            message_id: output.message_id,
            sequence_number: output.sequence_number,
        })
    }
}

impl QueueClient for SqsQueueClient {
    type Err = anyhow::Error;

    async fn purge(&self, queue_url: &QueueUrl) -> anyhow::Result<()> {
        self.inner.purge_queue(queue_url.as_str()).await
    }

    async fn receive(
        &self,
        queue_url: &QueueUrl,
        max_messages: i32,
    ) -> anyhow::Result<Vec<ReceivedMessage>> {
        let messages = self
            .inner
            .receive_messages(queue_url.as_str(), max_messages, None)
            .await?;

        Ok(messages.into_iter().map(from_sqs_message).collect())
    }
}
