//! DynamoDB task store.
//!
//! One table, partition key `id` (string). Conditional writes rely on
//! DynamoDB's native `attribute_exists` check so existence is verified
//! atomically with the mutation.

mod conversions;
mod error;
mod expression;
mod store;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client;

pub use store::DynamoDbTaskStore;

/// Builds the long-lived DynamoDB client. Credentials come from the default
/// AWS provider chain; `endpoint_url` points at DynamoDB Local when set.
pub async fn connect(region: &str, endpoint_url: Option<&str>) -> Client {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = endpoint_url {
        builder = builder.endpoint_url(url);
    }
    Client::from_conf(builder.build())
}
