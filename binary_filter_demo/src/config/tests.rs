use super::*;
use std::{collections::HashMap, time::Duration};

fn account() -> AccountId {
    "123456789012".parse().unwrap()
}

#[test]
fn it_defaults_to_the_demo_resources() {
    let config = Config::from_lookup(account(), WaitStrategy::default(), |_| None);

    assert_eq!(config.region, "us-east-1");
    assert_eq!(config.credentials, CredentialSource::DefaultChain);
    assert_eq!(config.endpoint_url, None);

    let target = config.target();
    assert_eq!(
        target.topic_arn.as_str(),
        "arn:aws:sns:us-east-1:123456789012:Topic-1"
    );
    assert_eq!(
        target.queue_url.as_str(),
        "https://sqs.us-east-1.amazonaws.com/123456789012/Queue-1"
    );
}

#[test]
fn it_reads_overrides_from_the_lookup() {
    let vars = HashMap::from([
        (REGION_VAR, "eu-west-1"),
        (TOPIC_NAME_VAR, "Other-Topic"),
        (QUEUE_NAME_VAR, "Other-Queue"),
        (ENDPOINT_URL_VAR, "http://localhost:4566"),
        (PROFILE_VAR, "sandbox"),
        (demo_env::ENVIRONMENT_VAR, "local"),
    ]);
    let wait = WaitStrategy::poll_until(Duration::from_secs(10));

    let config = Config::from_lookup(account(), wait, |key| {
        vars.get(key).map(|v| v.to_string())
    });

    assert_eq!(config.wait, wait);
    assert_eq!(config.environment, Environment::Local);
    assert_eq!(
        config.credentials,
        CredentialSource::Profile("sandbox".to_string())
    );
    assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));

    let target = config.target();
    assert_eq!(
        target.topic_arn.as_str(),
        "arn:aws:sns:eu-west-1:123456789012:Other-Topic"
    );
    assert_eq!(
        target.queue_url.as_str(),
        "https://sqs.eu-west-1.amazonaws.com/123456789012/Other-Queue"
    );
}

#[test]
fn blank_values_are_ignored() {
    let config = Config::from_lookup(account(), WaitStrategy::default(), |_| {
        Some("  ".to_string())
    });

    assert_eq!(config.region, "us-east-1");
    assert_eq!(config.topic_name, "Topic-1");
    assert_eq!(config.endpoint_url, None);
    assert_eq!(config.credentials, CredentialSource::DefaultChain);
    assert_eq!(config.environment, Environment::Production);
}

#[test]
fn debug_output_hides_the_secret() {
    let credentials = CredentialSource::Static {
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: "super-secret".to_string(),
        session_token: None,
    };

    let rendered = format!("{credentials:?}");
    assert!(rendered.contains("AKIDEXAMPLE"));
    assert!(!rendered.contains("super-secret"));
}

#[tokio::test]
async fn it_loads_an_sdk_config_with_static_credentials() {
    let mut config = Config::new(account()).with_credentials(CredentialSource::Static {
        access_key_id: "test".to_string(),
        secret_access_key: "test".to_string(),
        session_token: None,
    });
    config.region = "eu-central-1".to_string();
    config.endpoint_url = Some("http://localhost:4566".to_string());

    let sdk_config = config.load_sdk_config().await;

    assert_eq!(
        sdk_config.region().map(|r| r.as_ref()),
        Some("eu-central-1")
    );
    assert_eq!(sdk_config.endpoint_url(), Some("http://localhost:4566"));
    assert!(sdk_config.credentials_provider().is_some());
}
