//! Conversion between DynamoDB attribute maps and `Task`.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::error::StoreError;
use crate::domain::task::{Task, TaskId, TaskStatus};

pub const ATTR_ID: &str = "id";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_STATUS: &str = "status";
pub const ATTR_CREATED_AT: &str = "createdAt";
pub const ATTR_UPDATED_AT: &str = "updatedAt";

/// RFC 3339 in UTC with as much sub-second precision as the value carries,
/// so a stored timestamp reads back equal to the one written.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn task_to_item(task: &Task) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(ATTR_ID.to_string(), AttributeValue::S(task.id.0.clone()));
    item.insert(ATTR_TITLE.to_string(), AttributeValue::S(task.title.clone()));
    if let Some(desc) = &task.description {
        item.insert(ATTR_DESCRIPTION.to_string(), AttributeValue::S(desc.clone()));
    }
    item.insert(ATTR_STATUS.to_string(), AttributeValue::S(task.status.as_str().to_string()));
    item.insert(ATTR_CREATED_AT.to_string(), AttributeValue::S(format_timestamp(&task.created_at)));
    item.insert(ATTR_UPDATED_AT.to_string(), AttributeValue::S(format_timestamp(&task.updated_at)));
    item
}

pub fn item_to_task(item: &HashMap<String, AttributeValue>) -> Result<Task, StoreError> {
    let status = get_string(item, ATTR_STATUS)?;
    Ok(Task {
        id: TaskId(get_string(item, ATTR_ID)?),
        title: get_string(item, ATTR_TITLE)?,
        description: get_optional_string(item, ATTR_DESCRIPTION),
        status: status
            .parse::<TaskStatus>()
            .map_err(|_| StoreError::Malformed(format!("unknown status {status:?}")))?,
        created_at: get_datetime(item, ATTR_CREATED_AT)?,
        updated_at: get_datetime(item, ATTR_UPDATED_AT)?,
    })
}

fn get_string(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::Malformed(format!("missing or invalid field: {key}")))
}

fn get_optional_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).map(|s| s.to_string())
}

fn get_datetime(item: &HashMap<String, AttributeValue>, key: &str) -> Result<DateTime<Utc>, StoreError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Malformed(format!("invalid datetime {key}: {e}")))
}
