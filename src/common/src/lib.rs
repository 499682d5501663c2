pub mod config;
pub mod error;
pub mod http;
pub mod policy;
pub mod rbac;
pub mod types;

pub use error::Result;

pub const ADMIN_ID: u64 = 1;
pub const DATA_PATH_METADATA: &str = "md";

pub const TASK_STATUS_OPEN: &str = "Open";
pub const TASK_STATUS_FINISHED: &str = "Finished";
