//! Wiki page model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{fetch_one, is_zero, link, Link, Links};
use crate::client::OpenProjectClient;
use crate::dispatch::ResourceKind;
use crate::error::Result;
use crate::traits::Get;

/// A page of a project wiki.
///
/// The API only exposes single pages; there is no collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPage {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl WikiPage {
    /// The project the wiki belongs to.
    pub fn project(&self) -> Option<Link> {
        link(&self.links, "project")
    }
}

#[async_trait]
impl Get for WikiPage {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        fetch_one(client, ResourceKind::WikiPage, &format!("api/v3/wiki_pages/{id}")).await
    }
}
