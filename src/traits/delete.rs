//! Delete trait for removing resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::response::ApiResponse;

/// Delete a resource by ID.
///
/// Nothing is decoded from the response; the raw response is returned for
/// inspection (OpenProject answers `204 No Content`).
#[async_trait]
pub trait Delete {
    /// The ID type for this resource.
    type Id: Send;

    /// Delete the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    async fn delete(client: &OpenProjectClient, id: Self::Id) -> Result<ApiResponse>;
}
