// Application Layer - Use Cases and Business Logic

pub mod classifier;
pub mod constants;
pub mod fetcher;
pub mod lifecycle;
pub mod retry;
pub mod sweep;

// Re-exports
pub use classifier::StalenessClassifier;
pub use fetcher::{DeviceFetcher, FetchCompletion, Inventory};
pub use lifecycle::{LifecycleManager, LifecycleOutcome};
pub use retry::{RetryDecision, RetryPolicy};
pub use sweep::{SweepMode, SweepService, SweepSummary};
