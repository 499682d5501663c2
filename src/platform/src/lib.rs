pub mod accounts;
pub mod auth;
pub mod context;
pub mod error;
pub mod http;
pub mod projects;
pub mod provider;
pub mod tasks;
pub mod types;

pub use context::Context;
pub use error::PlatformError;
pub use error::Result;
pub use provider::PlatformProvider;
pub use types::ListResponse;
pub use types::ResponseMetadata;
