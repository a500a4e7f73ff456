//! Work package category model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{fetch_one, fetch_page, is_zero, link, path_segment, Link, Links};
use crate::client::OpenProjectClient;
use crate::dispatch::ResourceKind;
use crate::error::Result;
use crate::filters::Filters;
use crate::pagination::Collection;
use crate::traits::{Get, List};

/// A project-scoped category for grouping work packages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Category {
    pub fn project(&self) -> Option<Link> {
        link(&self.links, "project")
    }

    /// User that new work packages in this category are assigned to.
    pub fn default_assignee(&self) -> Option<Link> {
        link(&self.links, "defaultAssignee")
    }
}

/// Categories are only listed per project.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Project ID or identifier. Required.
    pub project: String,
    pub filters: Filters,
}

impl CategoryListQuery {
    pub fn for_project(project: &str) -> Self {
        Self {
            project: project.to_string(),
            filters: Filters::default(),
        }
    }
}

#[async_trait]
impl Get for Category {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        fetch_one(client, ResourceKind::Category, &format!("api/v3/categories/{id}")).await
    }
}

#[async_trait]
impl List for Category {
    type Query = CategoryListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        let project = path_segment("category listing project", &query.project)?;
        let endpoint = format!("api/v3/projects/{project}/categories");
        fetch_page(
            client,
            ResourceKind::Category,
            &endpoint,
            &query.filters,
            offset,
            page_size,
        )
        .await
    }
}
