//! Attachment model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{fetch_one, is_zero, link, Formattable, Link, Links};
use crate::client::OpenProjectClient;
use crate::codec::Timestamp;
use crate::dispatch::{self, ResourceKind};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::traits::{Delete, Get};

/// A file attached to a work package, wiki page or other container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub file_name: String,

    /// Size in bytes.
    #[serde(default)]
    pub file_size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Formattable>,

    #[serde(default)]
    pub content_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

/// Checksum of the stored file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub hash: String,
}

impl Attachment {
    /// Where the file content can be downloaded.
    pub fn download_location(&self) -> Option<Link> {
        link(&self.links, "downloadLocation")
    }

    /// The resource the file is attached to.
    pub fn container(&self) -> Option<Link> {
        link(&self.links, "container")
    }
}

#[async_trait]
impl Get for Attachment {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        fetch_one(client, ResourceKind::Attachment, &format!("api/v3/attachments/{id}")).await
    }
}

#[async_trait]
impl Delete for Attachment {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: u64) -> Result<ApiResponse> {
        let handle = client.handle(ResourceKind::Attachment);
        dispatch::delete(&handle, &format!("api/v3/attachments/{id}")).await
    }
}

impl Attachment {
    /// Download the raw file content of attachment `id`.
    ///
    /// The body is returned as-is; its media type is in the `Content-Type`
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Status`](crate::OpenProjectError::Status)
    /// if the server rejects the request.
    #[tracing::instrument(skip(client))]
    pub async fn download(client: &OpenProjectClient, id: u64) -> Result<ApiResponse> {
        client.get(&format!("api/v3/attachments/{id}/content")).await
    }
}
