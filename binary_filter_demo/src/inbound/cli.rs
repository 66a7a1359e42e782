//! The command line surface of the demo

use crate::domain::{
    models::{AccountId, RunReport, WaitStrategy},
    ports::{QueueClient, TopicPublisher},
    service::DemoRunner,
};
use std::{io::Write, time::Duration};


/// Printed when no account id is given
pub const USAGE: &str = "Usage\n binary_filter_demo aws-account-id";

#[derive(clap::Parser, Debug)]
#[command(name = "binary_filter_demo")]
#[command(
    about = "Publishes two messages to Topic-1, one with a binary attribute, and reads back what reached Queue-1"
)]
pub struct Args {
    /// The aws account which owns the topic and the queue
    pub account_id: Option<String>,

    /// Poll the queue until something arrives instead of sleeping a fixed time
    #[arg(long)]
    pub poll: bool,

    /// How long to sleep between publishing and reading
    #[arg(long, default_value_t = 5000)]
    pub wait_ms: u64,

    /// Give up polling after this many seconds
    #[arg(long, default_value_t = 30)]
    pub poll_deadline_secs: u64,
}

/// What the parsed arguments ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// print [USAGE] and stop
    Usage,
    /// run the demo against this account
    Run {
        account_id: AccountId,
        wait: WaitStrategy,
    },
}

impl Args {
    pub fn invocation(self) -> Invocation {
        let Some(account_id) = self.account_id else {
            return Invocation::Usage;
        };

        let wait = if self.poll {
            WaitStrategy::poll_until(Duration::from_secs(self.poll_deadline_secs))
        } else {
            WaitStrategy::Fixed(Duration::from_millis(self.wait_ms))
        };

        Invocation::Run {
            account_id: AccountId::from(account_id),
            wait,
        }
    }
}

/// Run whatever `args` ask for, writing console output to `out`.
/// `connect` builds the runner and is only called once an account id is known, a usage
/// invocation never touches the platform.
pub async fn execute<W, F, Fut, P, Q>(
    args: Args,
    out: &mut W,
    connect: F,
) -> anyhow::Result<Option<RunReport>>
where
    W: Write,
    F: FnOnce(AccountId, WaitStrategy) -> Fut,
    Fut: Future<Output = anyhow::Result<DemoRunner<P, Q>>>,
    P: TopicPublisher,
    anyhow::Error: From<P::Err>,
    Q: QueueClient,
    anyhow::Error: From<Q::Err>,
{
    match args.invocation() {
        Invocation::Usage => {
            writeln!(out, "{USAGE}")?;
            Ok(None)
        }
        Invocation::Run { account_id, wait } => {
            let runner = connect(account_id, wait).await?;
            let report = runner.run(out).await?;
            Ok(Some(report))
        }
    }
}
