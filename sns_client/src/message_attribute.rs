use aws_sdk_sns::primitives::Blob;
use aws_sdk_sns::types::MessageAttributeValue;

pub fn build_string_message_attribute(attr: &str) -> anyhow::Result<MessageAttributeValue> {
    let result = MessageAttributeValue::builder()
        .data_type("String")
        .string_value(attr)
        .build()?;
    Ok(result)
}

/// Binary attributes are carried as raw bytes, the sdk takes care of the base64 encoding
pub fn build_binary_message_attribute(attr: &[u8]) -> anyhow::Result<MessageAttributeValue> {
    let result = MessageAttributeValue::builder()
        .data_type("Binary")
        .binary_value(Blob::new(attr))
        .build()?;
    Ok(result)
}
