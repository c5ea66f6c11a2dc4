// Device Service Port (Interface)
//
// Wire shapes of the inventory grid and delete endpoints live here so the core
// owns the contract; adapters only move bytes.

use crate::domain::{DeviceBatch, DeviceRecord, VerificationToken};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a device service adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl ServiceError {
    /// Timeouts and connection failures are worth another attempt;
    /// anything the service actually answered is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Timeout(_) | ServiceError::Connection(_))
    }
}

/// Inventory grid query for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryQuery {
    #[serde(rename = "ID")]
    pub id: String,
    pub is_tag: bool,
    pub sort_column: String,
    pub sort_order: String,
    pub limit: u32,
    pub offset: u64,
    pub is_search: bool,
    pub is_included_black_listed: bool,
    pub advance_search: bool,
    pub enable_device_global_search: bool,
    pub search_value: String,
}

impl InventoryQuery {
    /// All non-blacklisted devices, sorted by name
    pub fn page(offset: u64, limit: u32) -> Self {
        Self {
            id: "AllDevices".to_string(),
            is_tag: false,
            sort_column: "DeviceName".to_string(),
            sort_order: "asc".to_string(),
            limit,
            offset,
            is_search: true,
            is_included_black_listed: false,
            advance_search: false,
            enable_device_global_search: true,
            search_value: "%".to_string(),
        }
    }
}

/// Inventory grid response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryPage {
    #[serde(default)]
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<InventoryData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryData {
    #[serde(default)]
    pub rows: Option<Vec<DeviceRecord>>,
}

impl InventoryPage {
    /// Successful page carrying `rows`
    pub fn with_rows(rows: Vec<DeviceRecord>) -> Self {
        Self {
            status: true,
            message: None,
            data: Some(InventoryData { rows: Some(rows) }),
        }
    }

    /// Page the service refused with `status: false`
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn into_rows(self) -> Vec<DeviceRecord> {
        self.data.and_then(|d| d.rows).unwrap_or_default()
    }
}

/// Delete endpoint actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalAction {
    #[serde(rename = "SEND_TO_DELETED_LIST")]
    SendToDeletedList,
    #[serde(rename = "FORCEDELETE_DEVICE")]
    ForceDeleteDevice,
}

impl std::fmt::Display for RemovalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalAction::SendToDeletedList => write!(f, "SEND_TO_DELETED_LIST"),
            RemovalAction::ForceDeleteDevice => write!(f, "FORCEDELETE_DEVICE"),
        }
    }
}

/// Delete endpoint body; one request covers the whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRequest {
    #[serde(rename = "Action")]
    pub action: RemovalAction,
    /// Comma-joined device IDs
    #[serde(rename = "DeviceId")]
    pub device_id: String,
    #[serde(rename = "VerificationMsg", skip_serializing_if = "Option::is_none", default)]
    pub verification_msg: Option<String>,
}

impl RemovalRequest {
    pub fn send_to_recycle_bin(batch: &DeviceBatch) -> Self {
        Self {
            action: RemovalAction::SendToDeletedList,
            device_id: batch.joined_ids(),
            verification_msg: None,
        }
    }

    pub fn force_delete(batch: &DeviceBatch, token: &VerificationToken) -> Self {
        Self {
            action: RemovalAction::ForceDeleteDevice,
            device_id: batch.joined_ids(),
            verification_msg: Some(token.as_str().to_string()),
        }
    }
}

/// Remote device-management service
#[async_trait]
pub trait DeviceService: Send + Sync {
    /// Fetch one page of the inventory grid
    async fn fetch_page(&self, query: &InventoryQuery) -> Result<InventoryPage, ServiceError>;

    /// Submit a removal action for a batch of devices
    async fn submit_removal(&self, request: &RemovalRequest) -> Result<(), ServiceError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted DeviceService that records every call.
    ///
    /// Fetch results are served in order; once the script runs out every
    /// further page is empty. Removal results default to success.
    #[derive(Default)]
    pub struct MockDeviceService {
        pages: Mutex<VecDeque<Result<InventoryPage, ServiceError>>>,
        removals: Mutex<VecDeque<Result<(), ServiceError>>>,
        queries: Mutex<Vec<InventoryQuery>>,
        requests: Mutex<Vec<RemovalRequest>>,
    }

    impl MockDeviceService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_page(&self, result: Result<InventoryPage, ServiceError>) {
            self.pages.lock().unwrap().push_back(result);
        }

        pub fn push_rows(&self, rows: Vec<DeviceRecord>) {
            self.push_page(Ok(InventoryPage::with_rows(rows)));
        }

        pub fn push_removal(&self, result: Result<(), ServiceError>) {
            self.removals.lock().unwrap().push_back(result);
        }

        pub fn queries(&self) -> Vec<InventoryQuery> {
            self.queries.lock().unwrap().clone()
        }

        pub fn offsets(&self) -> Vec<u64> {
            self.queries().iter().map(|q| q.offset).collect()
        }

        pub fn requests(&self) -> Vec<RemovalRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeviceService for MockDeviceService {
        async fn fetch_page(&self, query: &InventoryQuery) -> Result<InventoryPage, ServiceError> {
            self.queries.lock().unwrap().push(query.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(InventoryPage::with_rows(Vec::new())))
        }

        async fn submit_removal(&self, request: &RemovalRequest) -> Result<(), ServiceError> {
            self.requests.lock().unwrap().push(request.clone());
            self.removals.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }
}
