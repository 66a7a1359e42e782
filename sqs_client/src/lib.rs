mod purge_queue;
mod receive_messages;

#[cfg(test)]
mod tests;

use aws_sdk_sqs as sqs;

/// The most messages sqs will hand back from a single receive call
pub const MAX_BATCH_SIZE: i32 = 10;

#[derive(Clone, Debug)]
pub struct SQS {
    inner: sqs::Client,
}

impl SQS {
    pub fn new(inner: sqs::Client) -> Self {
        Self { inner }
    }

    /// Deletes every message currently in the queue.
    /// Sqs only allows one purge per queue every 60 seconds, a second call inside that window fails.
    #[tracing::instrument(skip(self))]
    pub async fn purge_queue(&self, queue_url: &str) -> anyhow::Result<()> {
        purge_queue::purge_queue(&self.inner, queue_url).await
    }

    /// Receives up to `max_messages` messages from the queue. Messages are not deleted.
    /// Pass `None` as `wait_time_seconds` to use the queue's configured receive wait time.
    #[tracing::instrument(skip(self))]
    pub async fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: Option<i32>,
    ) -> anyhow::Result<Vec<sqs::types::Message>> {
        receive_messages::receive_messages(
            &self.inner,
            queue_url,
            max_messages.clamp(1, MAX_BATCH_SIZE),
            wait_time_seconds,
        )
        .await
    }
}
