pub mod clock;
pub mod error;
pub mod patch;
pub mod store;
pub mod task;
