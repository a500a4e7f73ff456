//! Create trait for posting new resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;

/// Create a resource from a populated payload.
///
/// # Example
///
/// ```ignore
/// use openproject_client::{OpenProjectClient, WorkPackage, Create};
///
/// let client = OpenProjectClient::from_env()?;
/// let draft = WorkPackage {
///     subject: "Fix login".to_string(),
///     ..Default::default()
/// };
/// let created = WorkPackage::create(&client, "demo-project".to_string(), draft).await?;
/// println!("created #{}", created.id);
/// ```
#[async_trait]
pub trait Create: Sized + Send {
    /// What the new resource is created under (a project for work packages,
    /// `()` for top-level collections).
    type Parent: Send;

    /// Post `payload` and return the resource as stored by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server rejects it, or the
    /// response body cannot be decoded (the response is kept on the error).
    async fn create(client: &OpenProjectClient, parent: Self::Parent, payload: Self)
        -> Result<Self>;
}
