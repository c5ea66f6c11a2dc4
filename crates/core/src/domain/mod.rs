// Domain Layer - Pure business logic and entities

pub mod batch;
pub mod device;
pub mod error;
pub mod timestamp;

// Re-exports
pub use batch::{BatchState, DeviceBatch, VerificationToken};
pub use device::{DeviceId, DeviceRecord, ExclusionCounts, StaleDeviceRecord, StaleSet};
pub use error::DomainError;
pub use timestamp::{parse_timestamp, TimestampError};
