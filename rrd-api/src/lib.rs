pub mod client;
pub mod config;
pub mod error;
pub mod probe;
pub mod query;
pub mod record;
