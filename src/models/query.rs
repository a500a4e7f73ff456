//! Saved work package query model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{fetch_one, fetch_page, is_zero, link, Link, Links};
use crate::client::OpenProjectClient;
use crate::codec::Timestamp;
use crate::dispatch::{self, ResourceKind};
use crate::error::Result;
use crate::filters::Filters;
use crate::pagination::Collection;
use crate::response::ApiResponse;
use crate::traits::{Delete, Get, List};

/// A saved work package query (a named filter/sort/column set).
///
/// Filter definitions are kept as raw JSON: their shape depends on the
/// filter type and is not needed to run the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<serde_json::Value>,

    #[serde(default)]
    pub sums: bool,

    #[serde(default)]
    pub public: bool,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub starred: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Query {
    /// The owning user.
    pub fn user(&self) -> Option<Link> {
        link(&self.links, "user")
    }

    /// The project the query is scoped to; `None` for global queries.
    pub fn project(&self) -> Option<Link> {
        link(&self.links, "project").filter(|l| l.href.is_some())
    }
}

#[async_trait]
impl Get for Query {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        fetch_one(client, ResourceKind::Query, &format!("api/v3/queries/{id}")).await
    }
}

#[async_trait]
impl List for Query {
    type Query = Filters;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_page(client, ResourceKind::Query, "api/v3/queries", query, offset, page_size).await
    }
}

#[async_trait]
impl Delete for Query {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: u64) -> Result<ApiResponse> {
        let handle = client.handle(ResourceKind::Query);
        dispatch::delete(&handle, &format!("api/v3/queries/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_deserialize() {
        let json = r#"{
            "_type": "Query",
            "id": 9,
            "name": "fdsfdsfdsf",
            "createdAt": "2015-03-20T12:56:56Z",
            "updatedAt": "2015-05-20T18:16:53Z",
            "filters": [{"_type": "StatusQueryFilter", "name": "Status"}],
            "sums": false,
            "public": false,
            "hidden": false,
            "starred": true,
            "_links": {
                "user": {"href": "/api/v3/users/1", "title": "OpenProject Admin"},
                "project": {"href": null}
            }
        }"#;

        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(query.id, 9);
        assert_eq!(query.filters.len(), 1);
        assert!(query.starred);
        assert_eq!(query.user().unwrap().id(), Some("1"));
        assert!(query.project().is_none());
    }
}
