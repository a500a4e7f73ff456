//! User model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{fetch_one, fetch_page, is_zero, post_new, Links};
use crate::client::OpenProjectClient;
use crate::codec::Timestamp;
use crate::dispatch::{self, ResourceKind};
use crate::error::Result;
use crate::filters::Filters;
use crate::pagination::Collection;
use crate::response::ApiResponse;
use crate::traits::{Create, Delete, Get, List};

/// An OpenProject user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub login: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default)]
    pub admin: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub avatar: String,

    /// Account state: `active`, `registered`, `locked` or `invited`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,

    /// Only sent when creating a user; never returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl User {
    /// Whether the account can log in.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[async_trait]
impl Get for User {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        fetch_one(client, ResourceKind::User, &format!("api/v3/users/{id}")).await
    }
}

#[async_trait]
impl List for User {
    type Query = Filters;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_page(client, ResourceKind::User, "api/v3/users", query, offset, page_size).await
    }
}

#[async_trait]
impl Create for User {
    type Parent = ();

    #[tracing::instrument(skip(client, payload))]
    async fn create(client: &OpenProjectClient, _parent: (), payload: Self) -> Result<Self> {
        post_new(client, "api/v3/users", payload).await
    }
}

#[async_trait]
impl Delete for User {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: u64) -> Result<ApiResponse> {
        let handle = client.handle(ResourceKind::User);
        dispatch::delete(&handle, &format!("api/v3/users/{id}")).await
    }
}
