// Device Fetcher - paginated inventory retrieval with bounded retry
use crate::application::retry::{RetryDecision, RetryPolicy};
use crate::config::SweepConfig;
use crate::domain::DeviceRecord;
use crate::port::{DeviceService, InventoryPage, InventoryQuery, ServiceError, Sleeper};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Why the page loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCompletion {
    /// An empty page was returned; the inventory is whole
    Complete,
    /// The service answered but refused the page (status=false, HTTP error, bad body)
    Rejected { offset: u64, reason: String },
    /// Every attempt for a page hit a timeout or connection failure
    Exhausted {
        offset: u64,
        attempts: u32,
        last_error: ServiceError,
    },
}

impl std::fmt::Display for FetchCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchCompletion::Complete => write!(f, "complete"),
            FetchCompletion::Rejected { offset, reason } => {
                write!(f, "rejected at offset {}: {}", offset, reason)
            }
            FetchCompletion::Exhausted {
                offset,
                attempts,
                last_error,
            } => write!(
                f,
                "gave up at offset {} after {} attempts: {}",
                offset, attempts, last_error
            ),
        }
    }
}

/// Devices accumulated by one fetch, in service order
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub devices: Vec<DeviceRecord>,
    pub completion: FetchCompletion,
    /// Non-empty pages received
    pub pages: u32,
}

impl Inventory {
    /// True when the loop stopped before seeing the empty terminating page
    pub fn is_partial(&self) -> bool {
        self.completion != FetchCompletion::Complete
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

enum PageFailure {
    Rejected(ServiceError),
    Exhausted { attempts: u32, error: ServiceError },
}

/// Walks the inventory grid page by page.
///
/// Pages are requested strictly one after another: whether another page is
/// needed depends on the previous answer.
pub struct DeviceFetcher {
    service: Arc<dyn DeviceService>,
    retry_policy: Arc<RetryPolicy>,
    sleeper: Arc<dyn Sleeper>,
    page_size: u32,
}

impl DeviceFetcher {
    pub fn new(
        service: Arc<dyn DeviceService>,
        retry_policy: Arc<RetryPolicy>,
        sleeper: Arc<dyn Sleeper>,
        config: &SweepConfig,
    ) -> Self {
        Self {
            service,
            retry_policy,
            sleeper,
            page_size: config.page_size,
        }
    }

    /// Retrieve the entire inventory
    ///
    /// Never fails: a refused or unreachable page ends the loop and whatever
    /// was accumulated so far is returned, tagged with the reason.
    pub async fn fetch_all(&self) -> Inventory {
        let mut devices = Vec::new();
        let mut offset: u64 = 0;
        let mut pages = 0;

        let completion = loop {
            info!(offset = offset, "Fetching devices");
            let query = InventoryQuery::page(offset, self.page_size);

            let page = match self.fetch_with_retry(&query).await {
                Ok(page) => page,
                Err(PageFailure::Rejected(e)) => {
                    error!(offset = offset, error = %e, "Inventory page request rejected");
                    break FetchCompletion::Rejected {
                        offset,
                        reason: e.to_string(),
                    };
                }
                Err(PageFailure::Exhausted { attempts, error }) => {
                    error!(
                        offset = offset,
                        attempts = attempts,
                        error = %error,
                        "Failed to fetch page, aborting"
                    );
                    break FetchCompletion::Exhausted {
                        offset,
                        attempts,
                        last_error: error,
                    };
                }
            };

            if !page.status {
                let reason = page
                    .message
                    .clone()
                    .unwrap_or_else(|| "status=false".to_string());
                error!(offset = offset, message = %reason, "API returned status=false");
                break FetchCompletion::Rejected { offset, reason };
            }

            let rows = page.into_rows();
            info!(offset = offset, rows = rows.len(), "Retrieved devices");
            if rows.is_empty() {
                break FetchCompletion::Complete;
            }

            pages += 1;
            devices.extend(rows);
            offset += u64::from(self.page_size);
        };

        info!(
            devices = devices.len(),
            pages = pages,
            completion = %completion,
            "Inventory fetch finished"
        );

        Inventory {
            devices,
            completion,
            pages,
        }
    }

    async fn fetch_with_retry(&self, query: &InventoryQuery) -> Result<InventoryPage, PageFailure> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let error = match self.service.fetch_page(query).await {
                Ok(page) => return Ok(page),
                Err(e) => e,
            };

            match self.retry_policy.should_retry(attempt, &error) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        offset = query.offset,
                        attempt = attempt,
                        max_attempts = self.retry_policy.max_attempts(),
                        delay = ?delay,
                        error = %error,
                        "Transient failure fetching page, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
                RetryDecision::GiveUp if error.is_transient() => {
                    return Err(PageFailure::Exhausted {
                        attempts: attempt,
                        error,
                    });
                }
                RetryDecision::GiveUp => return Err(PageFailure::Rejected(error)),
            }
        }
    }
}
