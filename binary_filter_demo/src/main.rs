#![recursion_limit = "256"]

use binary_filter_demo::{
    config::Config,
    domain::service::DemoRunner,
    inbound::cli::{Args, execute},
    outbound::aws::{SnsTopicPublisher, SqsQueueClient},
};
use clap::Parser;
use demo_entrypoint::DemoEntrypoint;
use sns_client::SNS;
use sqs_client::SQS;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    DemoEntrypoint::default().init();

    let mut stdout = std::io::stdout().lock();
    execute(args, &mut stdout, |account_id, wait| async move {
        let config = Config::from_env(account_id, wait);
        tracing::info!(config=?config, "starting demo run");

        let sdk_config = config.load_sdk_config().await;
        let publisher = SnsTopicPublisher::new(SNS::new(aws_sdk_sns::Client::new(&sdk_config)));
        let queue = SqsQueueClient::new(SQS::new(aws_sdk_sqs::Client::new(&sdk_config)));

        Ok::<_, anyhow::Error>(DemoRunner::new(publisher, queue, config.target()).with_wait(config.wait))
    })
    .await?;

    Ok(())
}
