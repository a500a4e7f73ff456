//! Work package model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    fetch_one, fetch_page, is_zero, link, path_segment, post_new, Formattable, Link, Links,
};
use crate::client::OpenProjectClient;
use crate::codec::{Date, Timestamp};
use crate::dispatch::{self, ResourceKind};
use crate::error::Result;
use crate::filters::Filters;
use crate::pagination::Collection;
use crate::response::ApiResponse;
use crate::traits::{Create, Delete, Get, List};

/// An OpenProject work package (task, bug, milestone, ...).
///
/// Date and time fields are `None` when the server sends `null` and are left
/// out of request bodies when unset. Custom fields (`customFieldN`) and any
/// other attributes this type does not model are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackage {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    /// Server-assigned ID. Zero on unsaved drafts.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Formattable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,

    /// Optimistic-locking counter the server checks on updates.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub lock_version: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkPackage {
    /// A draft with only a subject.
    pub fn draft(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            ..Default::default()
        }
    }

    /// The `status` link (carries the status name as its title).
    pub fn status(&self) -> Option<Link> {
        link(&self.links, "status")
    }

    /// The `type` link (Task, Bug, ...).
    pub fn work_package_type(&self) -> Option<Link> {
        link(&self.links, "type")
    }

    /// The `priority` link.
    pub fn priority(&self) -> Option<Link> {
        link(&self.links, "priority")
    }

    /// The `project` link.
    pub fn project(&self) -> Option<Link> {
        link(&self.links, "project")
    }

    /// Set a `_links` relation, e.g. `("type", "/api/v3/types/1")`.
    #[must_use]
    pub fn with_link(mut self, name: &str, href: &str) -> Self {
        let value = serde_json::json!({ "href": href });
        self.links.insert(name.to_string(), value);
        self
    }
}

#[async_trait]
impl Get for WorkPackage {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        fetch_one(client, ResourceKind::WorkPackage, &format!("api/v3/work_packages/{id}")).await
    }
}

#[async_trait]
impl List for WorkPackage {
    type Query = Filters;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_page(
            client,
            ResourceKind::WorkPackage,
            "api/v3/work_packages",
            query,
            offset,
            page_size,
        )
        .await
    }
}

#[async_trait]
impl Create for WorkPackage {
    /// Project ID or identifier the work package is created in.
    type Parent = String;

    #[tracing::instrument(skip(client, payload))]
    async fn create(client: &OpenProjectClient, project: String, payload: Self) -> Result<Self> {
        let project = path_segment("work package project", &project)?;
        post_new(client, &format!("api/v3/projects/{project}/work_packages"), payload).await
    }
}

#[async_trait]
impl Delete for WorkPackage {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: u64) -> Result<ApiResponse> {
        let handle = client.handle(ResourceKind::WorkPackage);
        dispatch::delete(&handle, &format!("api/v3/work_packages/{id}")).await
    }
}
