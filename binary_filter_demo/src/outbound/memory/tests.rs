use super::*;
use crate::domain::models::{AccountId, DemoTarget};

fn target() -> DemoTarget {
    let account: AccountId = "123456789012".parse().unwrap();
    DemoTarget::new("us-east-1", &account, "Topic-1", "Queue-1")
}

fn platform(handling: BinaryAttributeHandling) -> (InMemoryPlatform, DemoTarget) {
    let target = target();
    let platform = InMemoryPlatform::new(handling);
    platform.subscribe(&target.topic_arn, &target.queue_url, FilterPolicy::trace());
    (platform, target)
}

#[test]
fn it_parses_a_policy_document() {
    let policy = FilterPolicy::from_json(r#"{"Trace": ["true"]}"#).unwrap();
    assert_eq!(policy, FilterPolicy::trace());
}

#[test]
fn policy_requires_the_string_value() {
    let policy = FilterPolicy::trace();

    let matching = OutboundMessage::traced("a", false);
    assert!(policy.admits(&matching, BinaryAttributeHandling::Ignore));

    let wrong_value = OutboundMessage::new("b")
        .with_attribute("Trace", MessageAttribute::String("false".to_string()));
    assert!(!policy.admits(&wrong_value, BinaryAttributeHandling::Ignore));

    let missing = OutboundMessage::new("c");
    assert!(!policy.admits(&missing, BinaryAttributeHandling::Ignore));

    let binary_trace =
        OutboundMessage::new("d").with_attribute("Trace", MessageAttribute::Binary(b"true".to_vec()));
    assert!(!policy.admits(&binary_trace, BinaryAttributeHandling::Ignore));
}

#[test]
fn binary_handling_decides_the_demo_message() {
    let policy = FilterPolicy::trace();
    let with_binary = OutboundMessage::traced("msg1", true);

    assert!(policy.admits(&with_binary, BinaryAttributeHandling::Ignore));
    assert!(!policy.admits(&with_binary, BinaryAttributeHandling::DropMessage));
}

#[tokio::test]
async fn publish_fans_out_to_matching_queues() {
    let (platform, target) = platform(BinaryAttributeHandling::DropMessage);

    let result = platform
        .publish(&target.topic_arn, OutboundMessage::traced("msg1", true))
        .await
        .unwrap();
    assert!(result.success);
    assert!(result.message_id.is_some());

    platform
        .publish(&target.topic_arn, OutboundMessage::traced("msg2", false))
        .await
        .unwrap();

    let contents = platform.queue_contents(&target.queue_url);
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].body.as_deref(), Some("msg2"));
    assert_eq!(platform.published().len(), 2);
}

#[tokio::test]
async fn receive_does_not_remove_messages() {
    let (platform, target) = platform(BinaryAttributeHandling::Ignore);
    for i in 0..12 {
        platform
            .publish(&target.topic_arn, OutboundMessage::traced(format!("m{i}"), false))
            .await
            .unwrap();
    }

    let first = platform.receive(&target.queue_url, 10).await.unwrap();
    let second = platform.receive(&target.queue_url, 10).await.unwrap();

    assert_eq!(first.len(), 10);
    assert_eq!(first, second);
    assert_eq!(platform.queue_contents(&target.queue_url).len(), 12);
}

#[tokio::test]
async fn purge_empties_the_queue() {
    let (platform, target) = platform(BinaryAttributeHandling::Ignore);
    platform.enqueue(
        &target.queue_url,
        ReceivedMessage {
            body: Some("stale".to_string()),
            ..Default::default()
        },
    );

    platform.purge(&target.queue_url).await.unwrap();

    assert!(platform.queue_contents(&target.queue_url).is_empty());
    assert_eq!(platform.purged(), vec![target.queue_url.to_string()]);
}

#[tokio::test]
async fn refused_purge_keeps_messages() {
    let (platform, target) = platform(BinaryAttributeHandling::Ignore);
    platform.enqueue(&target.queue_url, ReceivedMessage::default());
    platform.refuse_purges();

    let err = platform.purge(&target.queue_url).await.unwrap_err();

    assert!(matches!(err, InMemoryPlatformErr::PurgeInProgress(_)));
    assert_eq!(platform.queue_contents(&target.queue_url).len(), 1);
}

#[tokio::test]
async fn unknown_resources_are_errors() {
    let platform = InMemoryPlatform::new(BinaryAttributeHandling::Ignore);
    let target = target();

    assert!(matches!(
        platform
            .publish(&target.topic_arn, OutboundMessage::new("x"))
            .await,
        Err(InMemoryPlatformErr::UnknownTopic(_))
    ));
    assert!(matches!(
        platform.receive(&target.queue_url, 10).await,
        Err(InMemoryPlatformErr::UnknownQueue(_))
    ));
}
