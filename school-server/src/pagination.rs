//! Page/size normalization for paged listings.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page number used when the request does not carry a usable one.
pub const DEFAULT_PAGE: u64 = 0;

/// Number of items per page when not specified in the request.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Raw paging query parameters, exactly as the client sent them.
/// Non-integer values fail extraction; any `i64` is accepted
/// and normalized by [`PageRequest::validate`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page number (default: 0)
    pub page: Option<i64>,
    /// Items per page (default: 10, max: 100)
    pub size: Option<i64>,
}

/// A normalized page/size pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Normalizes optional paging input. Never fails: a missing or negative
    /// page becomes 0, a missing or non-positive size becomes 10, and sizes
    /// above 100 are capped.
    pub fn validate(page: Option<i64>, size: Option<i64>) -> Self {
        let page = match page {
            Some(page) if page >= 0 => page as u64,
            _ => DEFAULT_PAGE,
        };
        let size = match size {
            Some(size) if size > 0 => (size as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, size }
    }

    /// Number of items preceding this page
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        Self::validate(query.page, query.size)
    }
}

/// One page of a larger, id-ordered collection
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub content: Vec<T>,
    /// Zero-based page number
    pub page: u64,
    /// Requested page size
    pub size: u64,
    /// Number of items across all pages
    pub total_elements: u64,
    /// Number of pages
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Cuts the requested page out of the full collection.
    /// A page past the end is empty, not an error.
    pub fn slice(items: Vec<T>, request: PageRequest) -> Self {
        let total_elements = items.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = request.size as usize;
        let content = items.into_iter().skip(offset).take(size).collect();

        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(request.size),
        }
    }
}
