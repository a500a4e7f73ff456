//! Response metadata returned alongside decoded results.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::dispatch::ResourceList;
use crate::pagination::Pagination;

/// A fully-read HTTP response from the OpenProject API.
///
/// Status and headers pass through unchanged. The four pagination fields are
/// filled in when the body decoded to a paginated collection and stay zero
/// otherwise.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub total: u64,
    pub count: u64,
    pub page_size: u64,
    pub offset: u64,
}

impl ApiResponse {
    /// Wrap a raw response with zeroed pagination fields.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            total: 0,
            count: 0,
            page_size: 0,
            offset: 0,
        }
    }

    /// Whether the status is in the 200-299 range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body as lossy UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The pagination fields as one value.
    pub fn pagination(&self) -> Pagination {
        Pagination {
            total: self.total,
            count: self.count,
            page_size: self.page_size,
            offset: self.offset,
        }
    }

    /// Copy pagination values from a decoded list.
    pub(crate) fn populate_page_values(&mut self, list: &ResourceList) {
        let page = list.pagination();
        self.total = page.total;
        self.count = page.count;
        self.page_size = page.page_size;
        self.offset = page.offset;
    }
}
