//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;

/// Fetch a single resource by ID.
///
/// # Example
///
/// ```ignore
/// use openproject_client::{OpenProjectClient, WorkPackage, Get};
///
/// let client = OpenProjectClient::from_env()?;
/// let wp = WorkPackage::get(&client, 42).await?;
/// ```
#[async_trait]
pub trait Get: Sized + Send {
    /// The ID type for this resource (numeric ID or identifier string).
    type Id: Send;

    /// Fetch the resource by ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OpenProjectError::Status`] if the server rejects the
    /// request (404 included), or a decode error if the body is malformed.
    async fn get(client: &OpenProjectClient, id: Self::Id) -> Result<Self>;
}
