//! Work package status model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{fetch_one, fetch_page, is_zero, Links};
use crate::client::OpenProjectClient;
use crate::dispatch::ResourceKind;
use crate::error::Result;
use crate::filters::Filters;
use crate::pagination::Collection;
use crate::traits::{Get, List};

/// A work package status (New, In progress, Closed, ...).
///
/// Statuses are configured by administrators and are read-only through the
/// API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    #[serde(default)]
    pub name: String,

    /// Sort position among all statuses.
    #[serde(default)]
    pub position: u64,

    #[serde(default)]
    pub is_default: bool,

    /// Whether work packages in this status count as closed.
    #[serde(default)]
    pub is_closed: bool,

    #[serde(default)]
    pub is_readonly: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_done_ratio: Option<u8>,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

#[async_trait]
impl Get for Status {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        fetch_one(client, ResourceKind::Status, &format!("api/v3/statuses/{id}")).await
    }
}

#[async_trait]
impl List for Status {
    type Query = Filters;

    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_page(client, ResourceKind::Status, "api/v3/statuses", query, offset, page_size).await
    }
}
