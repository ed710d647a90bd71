use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use super::conversions::{item_to_task, task_to_item, ATTR_ID};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_scan_error,
    map_update_item_error,
};
use super::expression::{build_update_expression, ITEM_EXISTS};
use crate::domain::{
    error::StoreError,
    store::{FieldUpdates, TaskStore},
    task::{Task, TaskId},
};

#[derive(Clone)]
pub struct DynamoDbTaskStore {
    client: Client,
    table_name: String,
}

impl DynamoDbTaskStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self { client, table_name: table_name.into() }
    }

    pub fn table_name(&self) -> &str { &self.table_name }

    fn key(id: &TaskId) -> AttributeValue { AttributeValue::S(id.0.clone()) }
}

#[async_trait]
impl TaskStore for DynamoDbTaskStore {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(task_to_item(task)))
            .send()
            .await
            .map_err(map_put_item_error)?;
        Ok(())
    }

    async fn get_by_key(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::key(id))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.as_ref().map(item_to_task).transpose()
    }

    async fn scan_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_scan_error)?;

            for item in page.items.unwrap_or_default() {
                tasks.push(item_to_task(&item)?);
            }
            match page.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        tracing::debug!(table = %self.table_name, count = tasks.len(), "scan complete");
        Ok(tasks)
    }

    async fn conditional_update(&self, id: &TaskId, updates: &FieldUpdates) -> Result<Task, StoreError> {
        let expr = build_update_expression(updates);
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::key(id))
            .update_expression(expr.expression)
            .condition_expression(ITEM_EXISTS)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(map_update_item_error)?;

        let attributes = result
            .attributes
            .ok_or_else(|| StoreError::Malformed("UpdateItem returned no attributes".to_string()))?;
        item_to_task(&attributes)
    }

    async fn conditional_delete(&self, id: &TaskId) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::key(id))
            .condition_expression(ITEM_EXISTS)
            .expression_attribute_names("#id", ATTR_ID)
            .send()
            .await
            .map_err(map_delete_item_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patch::Patch;
    use crate::domain::task::TaskStatus;
    use aws_sdk_dynamodb::operation::delete_item::{DeleteItemError, DeleteItemOutput};
    use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
    use aws_sdk_dynamodb::operation::put_item::PutItemError;
    use aws_sdk_dynamodb::operation::scan::{ScanError, ScanOutput};
    use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
    use aws_sdk_dynamodb::types::error::{ConditionalCheckFailedException, ResourceNotFoundException};
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use chrono::{DateTime, Utc};

    const TABLE: &str = "todos-test";

    fn at(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    fn sample(id: &str) -> Task {
        Task {
            id: TaskId::from(id),
            title: format!("task {id}"),
            description: None,
            status: TaskStatus::Todo,
            created_at: at("2024-01-01T00:00:00Z"),
            updated_at: at("2024-01-01T00:00:00Z"),
        }
    }

    fn conditional_check_failed() -> ConditionalCheckFailedException {
        ConditionalCheckFailedException::builder().message("The conditional request failed").build()
    }

    #[tokio::test]
    async fn scan_follows_last_evaluated_key_across_pages() {
        let cursor = HashMap::from([(ATTR_ID.to_string(), AttributeValue::S("a".into()))]);
        let first_page = mock!(Client::scan)
            .match_requests(|req| req.table_name() == Some(TABLE) && req.exclusive_start_key().is_none())
            .then_output({
                let cursor = cursor.clone();
                move || {
                    ScanOutput::builder()
                        .items(task_to_item(&sample("a")))
                        .set_last_evaluated_key(Some(cursor.clone()))
                        .build()
                }
            });
        let second_page = mock!(Client::scan)
            .match_requests(move |req| req.exclusive_start_key() == Some(&cursor))
            .then_output(|| ScanOutput::builder().items(task_to_item(&sample("b"))).build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&first_page, &second_page]);

        let tasks = DynamoDbTaskStore::new(client, TABLE).scan_all().await.unwrap();

        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(first_page.num_calls(), 1);
        assert_eq!(second_page.num_calls(), 1);
    }

    #[tokio::test]
    async fn scan_of_missing_table_is_unavailable() {
        let rule = mock!(Client::scan)
            .then_error(|| ScanError::ResourceNotFoundException(ResourceNotFoundException::builder().build()));
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let err = DynamoDbTaskStore::new(client, TABLE).scan_all().await.unwrap_err();
        assert_eq!(err, StoreError::Unavailable("table not found".into()));
    }

    #[tokio::test]
    async fn put_into_missing_table_is_unavailable() {
        let rule = mock!(Client::put_item)
            .match_requests(|req| req.table_name() == Some(TABLE) && req.condition_expression().is_none())
            .then_error(|| PutItemError::ResourceNotFoundException(ResourceNotFoundException::builder().build()));
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let err = DynamoDbTaskStore::new(client, TABLE).put(&sample("a")).await.unwrap_err();
        assert_eq!(err, StoreError::Unavailable("table not found".into()));
    }

    #[tokio::test]
    async fn get_of_absent_key_is_none() {
        let rule = mock!(Client::get_item)
            .match_requests(|req| {
                req.key().and_then(|k| k.get(ATTR_ID)) == Some(&AttributeValue::S("gone".into()))
                    && req.consistent_read() == Some(true)
            })
            .then_output(|| GetItemOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let found = DynamoDbTaskStore::new(client, TABLE).get_by_key(&TaskId::from("gone")).await.unwrap();
        assert_eq!(found, None);
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn update_is_conditional_and_returns_the_new_item() {
        let mut stored = sample("a");
        stored.status = TaskStatus::Completed;
        stored.updated_at = at("2024-01-02T00:00:00Z");
        let returned = task_to_item(&stored);

        let rule = mock!(Client::update_item)
            .match_requests(|req| {
                req.condition_expression() == Some(ITEM_EXISTS)
                    && req.expression_attribute_names().and_then(|n| n.get("#id")).map(String::as_str) == Some(ATTR_ID)
                    && req.return_values() == Some(&ReturnValue::AllNew)
                    && req.update_expression() == Some("SET #updatedAt = :updatedAt, #status = :status")
            })
            .then_output(move || UpdateItemOutput::builder().set_attributes(Some(returned.clone())).build());
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let updates = FieldUpdates {
            status: Patch::Present(TaskStatus::Completed),
            ..FieldUpdates::touching_only_timestamp(stored.updated_at)
        };
        let task = DynamoDbTaskStore::new(client, TABLE)
            .conditional_update(&stored.id, &updates)
            .await
            .unwrap();
        assert_eq!(task, stored);
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_item_is_condition_failure() {
        let rule = mock!(Client::update_item)
            .then_error(|| UpdateItemError::ConditionalCheckFailedException(conditional_check_failed()));
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let err = DynamoDbTaskStore::new(client, TABLE)
            .conditional_update(&TaskId::from("nope"), &FieldUpdates::touching_only_timestamp(Utc::now()))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::ConditionFailed);
    }

    #[tokio::test]
    async fn update_without_returned_attributes_is_malformed() {
        let rule = mock!(Client::update_item).then_output(|| UpdateItemOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let err = DynamoDbTaskStore::new(client, TABLE)
            .conditional_update(&TaskId::from("a"), &FieldUpdates::touching_only_timestamp(Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[tokio::test]
    async fn delete_is_conditional_on_existence() {
        let rule = mock!(Client::delete_item)
            .match_requests(|req| {
                req.condition_expression() == Some(ITEM_EXISTS)
                    && req.expression_attribute_names().and_then(|n| n.get("#id")).map(String::as_str) == Some(ATTR_ID)
            })
            .then_output(|| DeleteItemOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        DynamoDbTaskStore::new(client, TABLE).conditional_delete(&TaskId::from("a")).await.unwrap();
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn delete_of_missing_item_is_condition_failure() {
        let rule = mock!(Client::delete_item)
            .then_error(|| DeleteItemError::ConditionalCheckFailedException(conditional_check_failed()));
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let err = DynamoDbTaskStore::new(client, TABLE).conditional_delete(&TaskId::from("a")).await.unwrap_err();
        assert_eq!(err, StoreError::ConditionFailed);
    }
}
