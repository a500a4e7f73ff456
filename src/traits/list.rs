//! List trait for fetching collections of resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::pagination::{Collection, DEFAULT_PAGE_SIZE};

/// Maximum pages to fetch (safety limit).
pub const MAX_PAGES: u32 = 1000;

/// List resources with filtering and pagination.
///
/// # Example
///
/// ```ignore
/// use openproject_client::{Filters, FilterOperator, OpenProjectClient, WorkPackage, List};
///
/// let client = OpenProjectClient::from_env()?;
/// let open = Filters::new().with("status", FilterOperator::Equal, "1");
///
/// // Fetch a single page
/// let page = WorkPackage::list_page(&client, &open, 1, 50).await?;
///
/// // Fetch all pages
/// let all = WorkPackage::list_all(&client, &open).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// List resources matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The OpenProject API client
    /// * `query` - Query parameters for filtering
    /// * `offset` - Page number (1-indexed)
    /// * `page_size` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>>;

    /// List all resources matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &OpenProjectClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut offset = 1;

        loop {
            let page = Self::list_page(client, query, offset, DEFAULT_PAGE_SIZE).await?;
            let has_more = page.has_more();
            let items_count = page.len();
            all_items.extend(page.into_elements());

            if !has_more || items_count == 0 {
                break;
            }
            offset += 1;

            if offset > MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
        }

        Ok(all_items)
    }
}
