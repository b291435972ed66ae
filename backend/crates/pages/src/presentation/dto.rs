//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::{PageView, PublicPageView};
use crate::domain::value_objects::PageStatus;

// ============================================================================
// Owner routes
// ============================================================================

/// Create page request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub template: Option<String>,
    pub sections: Option<Vec<Value>>,
    pub settings: Option<Map<String, Value>>,
}

/// Partial update request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub template: Option<String>,
    pub sections: Option<Vec<Value>>,
    pub settings: Option<Map<String, Value>>,
    pub status: Option<PageStatus>,
    pub revision: Option<u64>,
}

/// Single page response
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub success: bool,
    pub page: PageView,
}

/// Page list response
#[derive(Debug, Clone, Serialize)]
pub struct PageListResponse {
    pub success: bool,
    pub pages: Vec<PageView>,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Slug check
// ============================================================================

/// `?slug=..&excludeId=..`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSlugQuery {
    #[serde(default)]
    pub slug: String,
    pub exclude_id: Option<String>,
}

/// Slug check response
#[derive(Debug, Clone, Serialize)]
pub struct CheckSlugResponse {
    pub success: bool,
    pub slug: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// Public
// ============================================================================

/// Public page response
#[derive(Debug, Clone, Serialize)]
pub struct PublicPageResponse {
    pub success: bool,
    pub page: PublicPageView,
}

/// Conversion response
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResponse {
    pub success: bool,
    pub conversions: u64,
}
