//! Builds the sparse `UpdateItem` expression from a set of field updates.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use super::conversions::{
    format_timestamp, ATTR_DESCRIPTION, ATTR_ID, ATTR_STATUS, ATTR_TITLE, ATTR_UPDATED_AT,
};
use crate::domain::patch::Patch;
use crate::domain::store::FieldUpdates;

/// Condition attached to every update and delete.
pub const ITEM_EXISTS: &str = "attribute_exists(#id)";

#[derive(Debug, Default)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    fn set(&mut self, clauses: &mut Vec<String>, attr: &str, value: AttributeValue) {
        clauses.push(format!("#{attr} = :{attr}"));
        self.names.insert(format!("#{attr}"), attr.to_string());
        self.values.insert(format!(":{attr}"), value);
    }
}

/// Every attribute goes through a `#name` placeholder so that reserved
/// words such as `status` never reach the expression verbatim.
pub fn build_update_expression(updates: &FieldUpdates) -> UpdateExpression {
    let mut expr = UpdateExpression::default();
    let mut set_clauses = Vec::new();
    let mut remove_clauses = Vec::new();

    expr.names.insert(format!("#{ATTR_ID}"), ATTR_ID.to_string());
    expr.set(&mut set_clauses, ATTR_UPDATED_AT, AttributeValue::S(format_timestamp(&updates.updated_at)));

    if let Patch::Present(title) = &updates.title {
        expr.set(&mut set_clauses, ATTR_TITLE, AttributeValue::S(title.clone()));
    }
    match &updates.description {
        Patch::Present(Some(desc)) => {
            expr.set(&mut set_clauses, ATTR_DESCRIPTION, AttributeValue::S(desc.clone()));
        }
        Patch::Present(None) => {
            remove_clauses.push(format!("#{ATTR_DESCRIPTION}"));
            expr.names.insert(format!("#{ATTR_DESCRIPTION}"), ATTR_DESCRIPTION.to_string());
        }
        Patch::Absent => {}
    }
    if let Patch::Present(status) = &updates.status {
        expr.set(&mut set_clauses, ATTR_STATUS, AttributeValue::S(status.as_str().to_string()));
    }

    expr.expression = format!("SET {}", set_clauses.join(", "));
    if !remove_clauses.is_empty() {
        expr.expression.push_str(&format!(" REMOVE {}", remove_clauses.join(", ")));
    }
    expr
}
