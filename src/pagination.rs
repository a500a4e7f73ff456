//! Pagination utilities for OpenProject collection responses.

use serde::{Deserialize, Serialize};

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// A paginated collection returned by an OpenProject list endpoint.
///
/// On the wire this is a HAL collection:
/// `{"total": .., "count": .., "pageSize": .., "offset": .., "_embedded": {"elements": [..]}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    /// Total number of elements across all pages.
    #[serde(default)]
    pub total: u64,
    /// Number of elements on this page.
    #[serde(default)]
    pub count: u64,
    /// Requested page size.
    #[serde(default)]
    pub page_size: u64,
    /// Page offset as reported by the server (1-indexed page number).
    #[serde(default)]
    pub offset: u64,
    #[serde(rename = "_embedded", default = "Embedded::empty")]
    embedded: Embedded<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Embedded<T> {
    #[serde(default = "Vec::new")]
    elements: Vec<T>,
}

impl<T> Embedded<T> {
    fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            total: 0,
            count: 0,
            page_size: 0,
            offset: 0,
            embedded: Embedded::empty(),
        }
    }
}

impl<T> Collection<T> {
    /// Build a collection from elements and pagination info.
    #[must_use]
    pub fn new(elements: Vec<T>, total: u64, page_size: u64, offset: u64) -> Self {
        Self {
            total,
            count: elements.len() as u64,
            page_size,
            offset,
            embedded: Embedded { elements },
        }
    }

    /// The pagination metadata of this collection.
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination {
            total: self.total,
            count: self.count,
            page_size: self.page_size,
            offset: self.offset,
        }
    }

    /// Whether further pages exist after this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        if self.page_size == 0 {
            return false;
        }
        self.offset.max(1) * self.page_size < self.total
    }

    /// The elements on this page.
    #[must_use]
    pub fn elements(&self) -> &[T] {
        &self.embedded.elements
    }

    /// Consume the collection and return its elements.
    #[must_use]
    pub fn into_elements(self) -> Vec<T> {
        self.embedded.elements
    }

    /// Map the elements to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Collection<U> {
        Collection {
            total: self.total,
            count: self.count,
            page_size: self.page_size,
            offset: self.offset,
            embedded: Embedded {
                elements: self.embedded.elements.into_iter().map(f).collect(),
            },
        }
    }

    /// Returns true if this page has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.embedded.elements.is_empty()
    }

    /// Returns the number of elements on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.embedded.elements.len()
    }

    /// Returns an iterator over the elements in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.embedded.elements.iter()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.embedded.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.embedded.elements.iter()
    }
}

/// The four pagination fields OpenProject reports on list responses.
///
/// All zero for responses that are not collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub count: u64,
    pub page_size: u64,
    pub offset: u64,
}

/// Query parameters for paginated requests.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl PageParams {
    /// Create pagination params for a specific page.
    #[must_use]
    pub fn for_page(offset: u32, page_size: u32) -> Self {
        Self {
            offset: Some(offset),
            page_size: Some(page_size),
        }
    }

    /// Append these parameters to an endpoint path as a query string.
    #[must_use]
    pub fn apply(&self, endpoint: &str) -> String {
        let mut pairs = Vec::new();
        if let Some(offset) = self.offset {
            pairs.push(format!("offset={offset}"));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(format!("pageSize={page_size}"));
        }
        if pairs.is_empty() {
            return endpoint.to_string();
        }
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{endpoint}{separator}{}", pairs.join("&"))
    }
}
