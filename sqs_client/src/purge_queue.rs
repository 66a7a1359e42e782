use anyhow::Context;

pub async fn purge_queue(inner: &aws_sdk_sqs::Client, queue_url: &str) -> anyhow::Result<()> {
    inner
        .purge_queue()
        .queue_url(queue_url)
        .send()
        .await
        .context("unable to purge queue")?;

    Ok(())
}
