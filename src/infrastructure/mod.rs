pub mod dynamodb;
pub mod memory_store;
