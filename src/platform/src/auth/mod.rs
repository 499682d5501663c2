pub mod password;
pub mod provider;
pub mod token;

pub use provider::Auth;
pub use provider::Config;
