// devsweep Infrastructure - HTTP Adapter
// Implements: DeviceService against the device-management REST API

mod client;
mod config;

pub use client::HttpDeviceService;
pub use config::ServiceConfig;
