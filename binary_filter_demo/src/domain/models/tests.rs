use super::*;
use cool_asserts::assert_matches;

#[test]
fn message_with_binary_has_exactly_two_attributes() {
    let message = OutboundMessage::traced(MESSAGE_WITH_BINARY, true);

    assert_eq!(message.body, "msg1");
    assert_eq!(message.attributes.len(), 2);
    assert_matches!(message.attributes.get("Trace"), Some(MessageAttribute::String(v)) => {
        assert_eq!(v, "true");
    });
    assert_matches!(message.attributes.get("FlyInTheOintment"), Some(MessageAttribute::Binary(v)) => {
        assert_eq!(v.as_slice(), b"Oh Dear");
    });
    assert!(message.has_binary_attribute());
}

#[test]
fn message_without_binary_only_has_trace() {
    let message = OutboundMessage::traced(MESSAGE_WITHOUT_BINARY, false);

    assert_eq!(message.body, "msg2");
    assert_eq!(message.attributes.len(), 1);
    assert_matches!(message.attributes.get("Trace"), Some(MessageAttribute::String(v)) => {
        assert_eq!(v, "true");
    });
    assert!(!message.has_binary_attribute());
}

#[test]
fn attribute_accessors_follow_the_data_type() {
    let text = MessageAttribute::String("true".to_string());
    assert_eq!(text.data_type(), "String");
    assert_eq!(text.as_str(), Some("true"));
    assert_eq!(text.as_bytes(), None);

    let bytes = MessageAttribute::Binary(b"Oh Dear".to_vec());
    assert_eq!(bytes.data_type(), "Binary");
    assert_eq!(bytes.as_str(), None);
    assert_eq!(bytes.as_bytes(), Some(b"Oh Dear".as_slice()));
}

#[test]
fn it_builds_topic_and_queue_identifiers() {
    let account: AccountId = "123456789012".parse().unwrap();
    let target = DemoTarget::new("us-east-1", &account, "Topic-1", "Queue-1");

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
fn it_keeps_account_ids_as_given() {
    let account: AccountId = "1234 5678".parse().unwrap();
    assert_eq!(account.as_ref(), "1234 5678");
    assert_eq!(AccountId::from(String::new()).to_string(), "");
}

#[test]
fn it_unwraps_notification_envelopes() {
    let message = ReceivedMessage {
        body: Some(
            r#"{"Type":"Notification","MessageId":"abc","TopicArn":"arn:aws:sns:us-east-1:1:Topic-1","Message":"msg2"}"#
                .to_string(),
        ),
        ..Default::default()
    };
    assert_eq!(message.notification_message().as_deref(), Some("msg2"));
}

#[test]
fn it_returns_raw_bodies_unchanged() {
    let raw = ReceivedMessage {
        body: Some("msg2".to_string()),
        ..Default::default()
    };
    assert_eq!(raw.notification_message().as_deref(), Some("msg2"));

    let other_json = ReceivedMessage {
        body: Some(r#"{"Type":"SubscriptionConfirmation","Message":"confirm"}"#.to_string()),
        ..Default::default()
    };
    assert_matches!(other_json.notification_message(), Some(Cow::Borrowed(_)));

    assert_eq!(ReceivedMessage::default().notification_message(), None);
}

#[test]
fn default_wait_is_five_seconds() {
    assert_eq!(
        WaitStrategy::default(),
        WaitStrategy::Fixed(Duration::from_millis(5000))
    );
}
