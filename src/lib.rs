//! myenergi Hub Bridge Library
//!
//! This library polls a myenergi hub's local status endpoint on a fixed
//! interval, walks the heterogeneous per-device readings, derives grid
//! import/export, home consumption and PV self-consumption, and republishes
//! them as named data points through a pluggable display sink.

pub mod config;
pub mod endpoint;
pub mod engine;
pub mod hub_client;
pub mod metrics;
pub mod readings;
pub mod scheduler;
pub mod sink;
pub mod status_text;

// Re-export commonly used types for easier access
pub use config::Config;
pub use endpoint::Endpoint;
pub use engine::PollEngine;
pub use hub_client::{Credentials, FetchError, FetchOutcome, HubClient};
pub use metrics::DerivedMetrics;
pub use readings::{ReadingAccumulator, StatusPayload};
pub use scheduler::PollScheduler;
pub use sink::{DisplaySink, OutputRecord, TracingSink};
