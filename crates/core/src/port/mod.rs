// Port Layer - Interfaces for external dependencies

pub mod device_service;
pub mod report_sink;
pub mod sleeper; // Injected so backoff can be observed without wall-clock waits
pub mod time_provider;
pub mod token_provider;

// Re-exports
pub use device_service::{
    DeviceService, InventoryPage, InventoryQuery, RemovalAction, RemovalRequest, ServiceError,
};
pub use report_sink::ReportSink;
pub use sleeper::{Sleeper, TokioSleeper};
pub use time_provider::{SystemTimeProvider, TimeProvider};
pub use token_provider::{ChainedTokenProvider, StaticTokenProvider, TokenProvider};
