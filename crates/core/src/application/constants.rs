// Sweep constants (no magic values)

/// Inventory rows requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Days without a device report before the device counts as stale
pub const DEFAULT_STALE_DAYS: u32 = 60;

/// Attempts per inventory page on timeout/connection failures
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Backoff base (1s): retries wait 2s, then 4s
pub const DEFAULT_BACKOFF_BASE_SECS: u64 = 1;
