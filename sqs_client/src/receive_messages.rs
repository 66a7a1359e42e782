use anyhow::Context;
use aws_sdk_sqs::types::MessageSystemAttributeName;

/// Receives messages from the queue.
/// A `wait_time_seconds` of `None` leaves the queue's own receive wait time in effect.
#[tracing::instrument(skip(inner))]
pub async fn receive_messages(
    inner: &aws_sdk_sqs::Client,
    queue_url: &str,
    max_messages: i32,
    wait_time_seconds: Option<i32>,
) -> anyhow::Result<Vec<aws_sdk_sqs::types::Message>> {
    // "*" is needed to get all the message attributes
    let recv_output = inner
        .receive_message()
        .queue_url(queue_url)
        .set_wait_time_seconds(wait_time_seconds)
        .max_number_of_messages(max_messages)
        .set_message_attribute_names(Some(vec!["*".to_string()]))
        .message_system_attribute_names(MessageSystemAttributeName::All)
        .send()
        .await
        .context("unable to receive messages")?;

    Ok(recv_output.messages.unwrap_or_default())
}
