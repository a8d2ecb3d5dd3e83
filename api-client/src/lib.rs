// Flapjack Diner
//
// This crate provides an HTTP client for the Flapjack monitoring API:
// entities, checks, status, acknowledgements, maintenance windows,
// outages and downtime.

pub mod config;
pub mod errors;
pub mod http_client;

// Re-export commonly used items
pub use config::{BaseUrl, ClientConfig};
pub use errors::{ApiError, ConfigError};
pub use flapjack_diner_core::{
    AcknowledgeOptions, ParamValue, ScheduledMaintenance, TimeRange, ValidationError,
};
pub use http_client::DinerClient;
