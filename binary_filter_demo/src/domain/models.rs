//! The types which flow through the demo run

use std::{borrow::Cow, collections::HashMap, fmt::Display, str::FromStr, time::Duration};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// The string attribute the subscription filter policy matches on
pub const TRACE_ATTRIBUTE: &str = "Trace";
/// The value of [TRACE_ATTRIBUTE] that the filter policy admits
pub const TRACE_VALUE: &str = "true";
/// The name of the binary attribute attached to the first message
pub const BINARY_ATTRIBUTE: &str = "FlyInTheOintment";
/// The bytes carried by [BINARY_ATTRIBUTE]
pub const BINARY_ATTRIBUTE_VALUE: &[u8] = b"Oh Dear";
/// Body of the message published with the binary attribute
pub const MESSAGE_WITH_BINARY: &str = "msg1";
/// Body of the message published without the binary attribute
pub const MESSAGE_WITHOUT_BINARY: &str = "msg2";
/// How long the run waits between publishing and reading by default
pub const DEFAULT_WAIT: Duration = Duration::from_millis(5000);

/// A typed value attached to an outbound message.
/// The variant is the attribute's data type, so a value can never disagree with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageAttribute {
    /// A `String` data type attribute
    String(String),
    /// A `Binary` data type attribute
    Binary(Vec<u8>),
}

impl MessageAttribute {
    /// the data type name as the messaging platform spells it
    pub fn data_type(&self) -> &'static str {
        match self {
            MessageAttribute::String(_) => "String",
            MessageAttribute::Binary(_) => "Binary",
        }
    }

    /// the text value, if this is a string attribute
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MessageAttribute::String(s) => Some(s.as_str()),
            MessageAttribute::Binary(_) => None,
        }
    }

    /// the raw bytes, if this is a binary attribute
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            MessageAttribute::Binary(b) => Some(b.as_slice()),
            MessageAttribute::String(_) => None,
        }
    }

    /// true if this is a binary attribute
    pub fn is_binary(&self) -> bool {
        matches!(self, MessageAttribute::Binary(_))
    }
}

/// A message body plus its attributes, built right before it is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// the message text
    pub body: String,
    /// attributes keyed by name
    pub attributes: HashMap<String, MessageAttribute>,
}

impl OutboundMessage {
    /// create a message with no attributes
    pub fn new(body: impl Into<String>) -> Self {
        OutboundMessage {
            body: body.into(),
            attributes: HashMap::new(),
        }
    }

    /// add (or replace) an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: MessageAttribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Build one of the demo messages.
    /// Every message carries `Trace="true"`, optionally the binary `FlyInTheOintment` as well.
    pub fn traced(body: impl Into<String>, with_binary_attribute: bool) -> Self {
        let message = OutboundMessage::new(body).with_attribute(
            TRACE_ATTRIBUTE,
            MessageAttribute::String(TRACE_VALUE.to_string()),
        );

        if with_binary_attribute {
            message.with_attribute(
                BINARY_ATTRIBUTE,
                MessageAttribute::Binary(BINARY_ATTRIBUTE_VALUE.to_vec()),
            )
        } else {
            message
        }
    }

    /// true if any attribute has the binary data type
    pub fn has_binary_attribute(&self) -> bool {
        self.attributes.values().any(MessageAttribute::is_binary)
    }
}

/// What the platform told us about a publish call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryResult {
    /// whether the topic accepted the message
    pub success: bool,
    /// id the topic assigned to the message
    pub message_id: Option<String>,
    /// only set for fifo topics
    pub sequence_number: Option<String>,
    /// the request id of the publish call
    pub request_id: Option<String>,
}

/// A message as read back from the queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// id the queue assigned to the message
    pub message_id: Option<String>,
    /// handle which would be needed to delete the message
    pub receipt_handle: Option<String>,
    /// md5 digest of the body
    pub md5_of_body: Option<String>,
    /// the raw body
    pub body: Option<String>,
    /// system attributes e.g. `SentTimestamp`
    pub attributes: HashMap<String, String>,
    /// message attributes rendered as text, binary values are decoded lossily as utf-8
    pub message_attributes: HashMap<String, String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NotificationEnvelope {
    r#type: String,
    message: String,
}

impl ReceivedMessage {
    /// The message as it was published.
    /// When the subscription does not use raw message delivery the queue receives a json
    /// notification envelope, in that case the inner `Message` field is returned.
    pub fn notification_message(&self) -> Option<Cow<'_, str>> {
        let body = self.body.as_deref()?;
        match serde_json::from_str::<NotificationEnvelope>(body) {
            Ok(envelope) if envelope.r#type == "Notification" => Some(Cow::Owned(envelope.message)),
            _ => Some(Cow::Borrowed(body)),
        }
    }
}

/// An aws account id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountId(String);

impl From<String> for AccountId {
    fn from(account_id: String) -> Self {
        AccountId(account_id)
    }
}

/// Any text is taken as is, a bad id only shows up as a failed remote call
impl FromStr for AccountId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AccountId(s.to_string()))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The arn of the topic both messages are published to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicArn(String);

impl TopicArn {
    /// `arn:aws:sns:<region>:<account>:<topic>`
    pub fn new(region: &str, account_id: &AccountId, topic_name: &str) -> Self {
        TopicArn(format!("arn:aws:sns:{region}:{account_id}:{topic_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TopicArn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The url of the queue subscribed to the topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueUrl(String);

impl QueueUrl {
    /// `https://sqs.<region>.amazonaws.com/<account>/<queue>`
    pub fn new(region: &str, account_id: &AccountId, queue_name: &str) -> Self {
        QueueUrl(format!(
            "https://sqs.{region}.amazonaws.com/{account_id}/{queue_name}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QueueUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The pair of remote resources a run talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoTarget {
    /// where messages are published
    pub topic_arn: TopicArn,
    /// where the filtered messages end up
    pub queue_url: QueueUrl,
}

impl DemoTarget {
    /// build both identifiers for the same account and region
    pub fn new(region: &str, account_id: &AccountId, topic_name: &str, queue_name: &str) -> Self {
        DemoTarget {
            topic_arn: TopicArn::new(region, account_id, topic_name),
            queue_url: QueueUrl::new(region, account_id, queue_name),
        }
    }
}

/// How the run waits for asynchronous delivery before reading the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// sleep once then read once
    Fixed(Duration),
    /// read repeatedly with a doubling interval until something arrives or the deadline passes
    Poll {
        /// the first pause between reads
        interval: Duration,
        /// the pause never grows past this
        max_interval: Duration,
        /// total time after which the last read is returned even if empty
        deadline: Duration,
    },
}

impl Default for WaitStrategy {
    fn default() -> Self {
        WaitStrategy::Fixed(DEFAULT_WAIT)
    }
}

impl WaitStrategy {
    /// a polling strategy starting at 250ms and capped at 4s between reads
    pub fn poll_until(deadline: Duration) -> Self {
        WaitStrategy::Poll {
            interval: Duration::from_millis(250),
            max_interval: Duration::from_secs(4),
            deadline,
        }
    }
}

/// Everything a completed run observed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// message body and what the platform said about it, in publish order
    pub deliveries: Vec<(String, DeliveryResult)>,
    /// what the read step returned
    pub received: Vec<ReceivedMessage>,
}

impl RunReport {
    /// bodies of the received messages, envelopes unwrapped
    pub fn received_bodies(&self) -> Vec<String> {
        self.received
            .iter()
            .filter_map(|m| m.notification_message().map(Cow::into_owned))
            .collect()
    }
}

/// The errors which end a demo run
#[derive(Debug, Error)]
pub enum DemoErr {
    /// the queue could not be purged, nothing was published
    #[error("unable to purge queue {queue_url}")]
    Purge {
        queue_url: String,
        #[source]
        source: anyhow::Error,
    },
    /// the topic rejected a message
    #[error("unable to publish {body} to {topic_arn}")]
    Publish {
        body: String,
        topic_arn: String,
        #[source]
        source: anyhow::Error,
    },
    /// the queue could not be read
    #[error("unable to receive messages from {queue_url}")]
    Receive {
        queue_url: String,
        #[source]
        source: anyhow::Error,
    },
    /// the console output could not be written
    #[error("unable to write console output")]
    Console(#[from] std::io::Error),
}
