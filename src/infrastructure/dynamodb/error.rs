//! Maps AWS SDK errors to `StoreError`.
//!
//! A failed `attribute_exists` check becomes `ConditionFailed`; everything
//! else is `Unavailable` with a short description of the cause.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;

use crate::domain::error::StoreError;

const THROUGHPUT_EXCEEDED: &str = "throughput exceeded, please retry";
const REQUEST_LIMIT_EXCEEDED: &str = "request limit exceeded, please retry";
const TABLE_NOT_FOUND: &str = "table not found";
const INTERNAL_ERROR: &str = "DynamoDB internal server error";

fn unavailable(msg: &str) -> StoreError {
    StoreError::Unavailable(msg.to_string())
}

/// Failures that happened before DynamoDB produced a service response.
fn transport_failure<E, R>(op: &'static str, err: &SdkError<E, R>) -> Option<StoreError> {
    match err {
        SdkError::TimeoutError(_) => Some(StoreError::Unavailable(format!("{op} timed out"))),
        SdkError::DispatchFailure(_) => Some(StoreError::Unavailable(format!("{op} could not reach DynamoDB"))),
        SdkError::ConstructionFailure(_) => Some(StoreError::Unavailable(format!("{op} request could not be built"))),
        _ => None,
    }
}

pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(err: SdkError<GetItemError, R>) -> StoreError {
    if let Some(e) = transport_failure("GetItem", &err) {
        return e;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => unavailable(TABLE_NOT_FOUND),
        GetItemError::ProvisionedThroughputExceededException(_) => unavailable(THROUGHPUT_EXCEEDED),
        GetItemError::RequestLimitExceeded(_) => unavailable(REQUEST_LIMIT_EXCEEDED),
        GetItemError::InternalServerError(_) => unavailable(INTERNAL_ERROR),
        err => StoreError::Unavailable(format!("GetItem failed: {err}")),
    }
}

pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    if let Some(e) = transport_failure("Scan", &err) {
        return e;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => unavailable(TABLE_NOT_FOUND),
        ScanError::ProvisionedThroughputExceededException(_) => unavailable(THROUGHPUT_EXCEEDED),
        ScanError::RequestLimitExceeded(_) => unavailable(REQUEST_LIMIT_EXCEEDED),
        ScanError::InternalServerError(_) => unavailable(INTERNAL_ERROR),
        err => StoreError::Unavailable(format!("Scan failed: {err}")),
    }
}

pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(err: SdkError<PutItemError, R>) -> StoreError {
    if let Some(e) = transport_failure("PutItem", &err) {
        return e;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::ConditionFailed,
        PutItemError::ResourceNotFoundException(_) => unavailable(TABLE_NOT_FOUND),
        PutItemError::ProvisionedThroughputExceededException(_) => unavailable(THROUGHPUT_EXCEEDED),
        PutItemError::RequestLimitExceeded(_) => unavailable(REQUEST_LIMIT_EXCEEDED),
        PutItemError::TransactionConflictException(_) => unavailable("transaction conflict, please retry"),
        PutItemError::InternalServerError(_) => unavailable(INTERNAL_ERROR),
        err => StoreError::Unavailable(format!("PutItem failed: {err}")),
    }
}

pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(err: SdkError<UpdateItemError, R>) -> StoreError {
    if let Some(e) = transport_failure("UpdateItem", &err) {
        return e;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => StoreError::ConditionFailed,
        UpdateItemError::ResourceNotFoundException(_) => unavailable(TABLE_NOT_FOUND),
        UpdateItemError::ProvisionedThroughputExceededException(_) => unavailable(THROUGHPUT_EXCEEDED),
        UpdateItemError::RequestLimitExceeded(_) => unavailable(REQUEST_LIMIT_EXCEEDED),
        UpdateItemError::TransactionConflictException(_) => unavailable("transaction conflict, please retry"),
        UpdateItemError::InternalServerError(_) => unavailable(INTERNAL_ERROR),
        err => StoreError::Unavailable(format!("UpdateItem failed: {err}")),
    }
}

pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(err: SdkError<DeleteItemError, R>) -> StoreError {
    if let Some(e) = transport_failure("DeleteItem", &err) {
        return e;
    }
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => StoreError::ConditionFailed,
        DeleteItemError::ResourceNotFoundException(_) => unavailable(TABLE_NOT_FOUND),
        DeleteItemError::ProvisionedThroughputExceededException(_) => unavailable(THROUGHPUT_EXCEEDED),
        DeleteItemError::RequestLimitExceeded(_) => unavailable(REQUEST_LIMIT_EXCEEDED),
        DeleteItemError::TransactionConflictException(_) => unavailable("transaction conflict, please retry"),
        DeleteItemError::InternalServerError(_) => unavailable(INTERNAL_ERROR),
        err => StoreError::Unavailable(format!("DeleteItem failed: {err}")),
    }
}
