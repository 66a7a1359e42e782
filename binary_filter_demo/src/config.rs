use crate::domain::models::{AccountId, DemoTarget, WaitStrategy};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_sqs::config::{Credentials, Region};
use demo_env::Environment;

#[cfg(test)]
mod tests;

pub const REGION_VAR: &str = "DEMO_REGION";
pub const TOPIC_NAME_VAR: &str = "DEMO_TOPIC_NAME";
pub const QUEUE_NAME_VAR: &str = "DEMO_QUEUE_NAME";
pub const ENDPOINT_URL_VAR: &str = "DEMO_ENDPOINT_URL";
pub const PROFILE_VAR: &str = "DEMO_AWS_PROFILE";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TOPIC_NAME: &str = "Topic-1";
pub const DEFAULT_QUEUE_NAME: &str = "Queue-1";

/// Where the aws credentials for both clients come from
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// env vars, shared profile, sso, container and instance metadata, in the sdk's usual order
    DefaultChain,
    /// a named profile from the shared config files
    Profile(String),
    /// fixed keys, e.g. for LocalStack or tests
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefaultChain => write!(f, "DefaultChain"),
            Self::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
            Self::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// The account that owns the topic and the queue
    pub account_id: AccountId,

    /// The region both resources live in
    pub region: String,

    /// Name of the topic messages are published to
    pub topic_name: String,

    /// Name of the queue subscribed to the topic
    pub queue_name: String,

    /// Overrides the aws endpoints, e.g. to point at LocalStack
    pub endpoint_url: Option<String>,

    pub credentials: CredentialSource,

    pub wait: WaitStrategy,

    /// Where the demo runs, read from `ENVIRONMENT`
    pub environment: Environment,
}

impl Config {
    /// all defaults for the given account
    pub fn new(account_id: AccountId) -> Self {
        Config {
            account_id,
            region: DEFAULT_REGION.to_string(),
            topic_name: DEFAULT_TOPIC_NAME.to_string(),
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            endpoint_url: None,
            credentials: CredentialSource::DefaultChain,
            wait: WaitStrategy::default(),
            environment: Environment::Production,
        }
    }

    pub fn from_env(account_id: AccountId, wait: WaitStrategy) -> Self {
        Self::from_lookup(account_id, wait, |key| std::env::var(key).ok())
    }

    /// Build the config reading overrides through `lookup` instead of the process environment.
    /// Empty values count as unset.
    pub fn from_lookup<F>(account_id: AccountId, wait: WaitStrategy, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = Config::new(account_id);
        Config {
            region: read(REGION_VAR).unwrap_or(defaults.region),
            topic_name: read(TOPIC_NAME_VAR).unwrap_or(defaults.topic_name),
            queue_name: read(QUEUE_NAME_VAR).unwrap_or(defaults.queue_name),
            endpoint_url: read(ENDPOINT_URL_VAR),
            credentials: read(PROFILE_VAR)
                .map(CredentialSource::Profile)
                .unwrap_or(defaults.credentials),
            wait,
            environment: Environment::from_lookup(&read),
            account_id: defaults.account_id,
        }
    }

    pub fn with_credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = credentials;
        self
    }

    /// The topic arn and queue url derived from this config
    pub fn target(&self) -> DemoTarget {
        DemoTarget::new(
            &self.region,
            &self.account_id,
            &self.topic_name,
            &self.queue_name,
        )
    }

    /// Load the shared sdk config both clients are built from
    #[tracing::instrument(skip(self), fields(region=%self.region, credentials=?self.credentials))]
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));

        let loader = match &self.credentials {
            CredentialSource::DefaultChain => loader,
            CredentialSource::Profile(name) => loader.profile_name(name),
            CredentialSource::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                "binary_filter_demo",
            )),
        };

        let loader = match &self.endpoint_url {
            Some(url) => loader.endpoint_url(url),
            None => loader,
        };

        loader.load().await
    }
}
