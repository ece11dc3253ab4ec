pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod types;

pub use config::Config;
pub use error::SinkError;
pub use types::record::{FieldValue, FlatRecord};
