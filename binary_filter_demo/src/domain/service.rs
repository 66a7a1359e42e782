//! This module defines the demo run itself

use crate::domain::{
    models::{
        DeliveryResult, DemoErr, DemoTarget, MESSAGE_WITH_BINARY, MESSAGE_WITHOUT_BINARY,
        OutboundMessage, ReceivedMessage, RunReport, WaitStrategy,
    },
    ports::{QueueClient, TopicPublisher},
};
use std::{io::Write, time::Duration};


/// How many messages a single read asks for, the most the queue hands out per call
pub const MAX_MESSAGES: i32 = 10;

/// polling never spins faster than this
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Owns the two platform handles for the lifetime of a run and drives the fixed sequence
/// purge, publish with binary, publish without binary, wait, read.
pub struct DemoRunner<P, Q> {
    publisher: P,
    queue: Q,
    target: DemoTarget,
    wait: WaitStrategy,
}

impl<P, Q> DemoRunner<P, Q>
where
    P: TopicPublisher,
    anyhow::Error: From<P::Err>,
    Q: QueueClient,
    anyhow::Error: From<Q::Err>,
{
    /// create a runner which waits with the default [WaitStrategy]
    pub fn new(publisher: P, queue: Q, target: DemoTarget) -> Self {
        DemoRunner {
            publisher,
            queue,
            target,
            wait: WaitStrategy::default(),
        }
    }

    /// replace the [WaitStrategy]
    pub fn with_wait(mut self, wait: WaitStrategy) -> Self {
        self.wait = wait;
        self
    }

    /// Run the whole sequence, writing the console output to `out`.
    /// Any failure stops the run where it happened.
    #[tracing::instrument(err, skip(self, out), fields(topic_arn=%self.target.topic_arn, queue_url=%self.target.queue_url))]
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunReport, DemoErr> {
        self.clear().await?;

        let mut deliveries = Vec::with_capacity(2);
        for (body, with_binary_attribute) in
            [(MESSAGE_WITH_BINARY, true), (MESSAGE_WITHOUT_BINARY, false)]
        {
            let result = self.publish(body, with_binary_attribute, out).await?;
            deliveries.push((body.to_string(), result));
        }

        let received = self.read(out).await?;

        Ok(RunReport {
            deliveries,
            received,
        })
    }

    /// Purge the queue so only this run's messages can be read back
    #[tracing::instrument(err, skip(self))]
    pub async fn clear(&self) -> Result<(), DemoErr> {
        let queue_url = &self.target.queue_url;
        self.queue
            .purge(queue_url)
            .await
            .map_err(|e| DemoErr::Purge {
                queue_url: queue_url.to_string(),
                source: anyhow::Error::from(e),
            })
    }

    /// Publish one traced message and report whether the topic accepted it
    #[tracing::instrument(err, skip(self, out))]
    pub async fn publish<W: Write>(
        &self,
        body: &str,
        with_binary_attribute: bool,
        out: &mut W,
    ) -> Result<DeliveryResult, DemoErr> {
        let topic_arn = &self.target.topic_arn;
        let message = OutboundMessage::traced(body, with_binary_attribute);

        let result = self
            .publisher
            .publish(topic_arn, message)
            .await
            .map_err(|e| DemoErr::Publish {
                body: body.to_string(),
                topic_arn: topic_arn.to_string(),
                source: anyhow::Error::from(e),
            })?;

        tracing::debug!(message_id=?result.message_id, request_id=?result.request_id, "publish accepted");
        writeln!(out, "{body} published successfully {}", result.success)?;

        Ok(result)
    }

    /// Wait for delivery according to the [WaitStrategy] then print what the queue holds
    #[tracing::instrument(err, skip(self, out))]
    pub async fn read<W: Write>(&self, out: &mut W) -> Result<Vec<ReceivedMessage>, DemoErr> {
        let messages = match self.wait {
            WaitStrategy::Fixed(delay) => {
                tokio::time::sleep(delay).await;
                self.receive().await?
            }
            WaitStrategy::Poll {
                interval,
                max_interval,
                deadline,
            } => self.poll(interval, max_interval, deadline).await?,
        };

        let count = messages.len();
        let plural = if count == 1 { "" } else { "s" };
        writeln!(out, "Read {count} message{plural}")?;
        writeln!(out, "{messages:?}")?;

        Ok(messages)
    }

    async fn receive(&self) -> Result<Vec<ReceivedMessage>, DemoErr> {
        let queue_url = &self.target.queue_url;
        self.queue
            .receive(queue_url, MAX_MESSAGES)
            .await
            .map_err(|e| DemoErr::Receive {
                queue_url: queue_url.to_string(),
                source: anyhow::Error::from(e),
            })
    }

    async fn poll(
        &self,
        interval: Duration,
        max_interval: Duration,
        deadline: Duration,
    ) -> Result<Vec<ReceivedMessage>, DemoErr> {
        let started = tokio::time::Instant::now();
        let max_interval = max_interval.max(MIN_POLL_INTERVAL);
        let mut pause = interval.clamp(MIN_POLL_INTERVAL, max_interval);
        let mut attempts = 0usize;

        loop {
            attempts += 1;
            let messages = self.receive().await?;
            let elapsed = started.elapsed();
            if !messages.is_empty() || elapsed >= deadline {
                tracing::debug!(attempts, ?elapsed, received = messages.len(), "stopped polling");
                return Ok(messages);
            }

            tracing::trace!(?pause, "queue is empty, polling again");
            tokio::time::sleep(pause.min(deadline - elapsed)).await;
            pause = (pause * 2).min(max_interval);
        }
    }
}
