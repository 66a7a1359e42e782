use super::*;
use aws_smithy_http_client::test_util::{CaptureRequestReceiver, capture_request};
use sqs::config::{BehaviorVersion, Credentials, Region};

const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/Queue-1";

fn capturing_client() -> (SQS, CaptureRequestReceiver) {
    let (http_client, request) = capture_request(None);
    let config = sqs::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("akid", "secret", None, None, "sqs_client"))
        .http_client(http_client)
        .build();

    (SQS::new(sqs::Client::from_conf(config)), request)
}

fn request_body(request: CaptureRequestReceiver) -> serde_json::Value {
    let request = request.expect_request();
    let body = request.body().bytes().expect("body is in memory");
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn receive_leaves_the_queue_wait_time_alone() {
    let (sqs, request) = capturing_client();

    // the captured response has no body, only the outgoing request matters here
    let _ = sqs.receive_messages(QUEUE_URL, 10, None).await;

    let body = request_body(request);
    assert_eq!(body["QueueUrl"], QUEUE_URL);
    assert_eq!(body["MaxNumberOfMessages"], 10);
    assert_eq!(body["MessageAttributeNames"], serde_json::json!(["*"]));
    assert_eq!(body["MessageSystemAttributeNames"], serde_json::json!(["All"]));
    assert!(body.get("WaitTimeSeconds").is_none());
}

#[tokio::test]
async fn receive_sends_an_explicit_wait_time() {
    let (sqs, request) = capturing_client();

    let _ = sqs.receive_messages(QUEUE_URL, 10, Some(20)).await;

    assert_eq!(request_body(request)["WaitTimeSeconds"], 20);
}

#[tokio::test]
async fn receive_clamps_the_batch_size() {
    let (sqs, request) = capturing_client();

    let _ = sqs.receive_messages(QUEUE_URL, 25, None).await;

    assert_eq!(request_body(request)["MaxNumberOfMessages"], MAX_BATCH_SIZE);
}
