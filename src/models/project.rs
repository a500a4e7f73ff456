//! Project model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    fetch_one, fetch_page, is_zero, link, path_segment, post_new, Formattable, Link, Links,
};
use crate::client::OpenProjectClient;
use crate::codec::Timestamp;
use crate::dispatch::{self, ResourceKind};
use crate::error::Result;
use crate::filters::Filters;
use crate::pagination::Collection;
use crate::response::ApiResponse;
use crate::traits::{Create, Delete, Get, List};

/// An OpenProject project.
///
/// Projects are the containers for work packages, wiki pages and
/// categories. They can be addressed by numeric ID or by `identifier`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_type", default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    /// URL-safe project key (e.g. `"demo-project"`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub public: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Formattable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

fn default_active() -> bool {
    true
}

impl Project {
    /// The parent project link, if this is a subproject.
    pub fn parent(&self) -> Option<Link> {
        link(&self.links, "parent").filter(|l| l.href.is_some())
    }

    /// The value accepted in `api/v3/projects/{..}` paths: the identifier if
    /// known, otherwise the numeric ID.
    pub fn path_key(&self) -> String {
        if self.identifier.is_empty() {
            self.id.to_string()
        } else {
            self.identifier.clone()
        }
    }
}

#[async_trait]
impl Get for Project {
    /// Numeric ID or identifier.
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: String) -> Result<Self> {
        let id = path_segment("project ID", &id)?;
        fetch_one(client, ResourceKind::Project, &format!("api/v3/projects/{id}")).await
    }
}

#[async_trait]
impl List for Project {
    type Query = Filters;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_page(client, ResourceKind::Project, "api/v3/projects", query, offset, page_size).await
    }
}

#[async_trait]
impl Create for Project {
    type Parent = ();

    #[tracing::instrument(skip(client, payload))]
    async fn create(client: &OpenProjectClient, _parent: (), payload: Self) -> Result<Self> {
        post_new(client, "api/v3/projects", payload).await
    }
}

#[async_trait]
impl Delete for Project {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: String) -> Result<ApiResponse> {
        let id = path_segment("project ID", &id)?;
        let handle = client.handle(ResourceKind::Project);
        dispatch::delete(&handle, &format!("api/v3/projects/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserialize() {
        let json = r#"{
            "_type": "Project",
            "id": 1,
            "identifier": "demo-project",
            "name": "Demo project",
            "active": true,
            "public": false,
            "description": {"format": "markdown", "raw": "Lorem", "html": "<p>Lorem</p>"},
            "createdAt": "2015-07-06T13:28:14Z",
            "updatedAt": "2015-10-01T09:55:02Z",
            "_links": {
                "self": {"href": "/api/v3/projects/1", "title": "Demo project"},
                "parent": {"href": null}
            }
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, 1);
        assert_eq!(project.identifier, "demo-project");
        assert_eq!(project.path_key(), "demo-project");
        assert!(project.active);
        assert!(project.parent().is_none());
    }

    #[test]
    fn test_project_defaults_to_active() {
        let project: Project = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(project.active);
        assert_eq!(project.path_key(), "3");
    }

    #[test]
    fn test_subproject_parent_link() {
        let project: Project = serde_json::from_str(
            r#"{"id": 4, "_links": {"parent": {"href": "/api/v3/projects/1", "title": "Demo"}}}"#,
        )
        .unwrap();
        assert_eq!(project.parent().unwrap().id(), Some("1"));
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected_before_sending() {
        use std::sync::Arc;

        use crate::error::OpenProjectError;
        use crate::transport::testing::ScriptedTransport;

        let transport = Arc::new(ScriptedTransport::new());
        let client = OpenProjectClient::builder("https://op.example.com")
            .auth(crate::auth::BasicAuth::api_key("k"))
            .transport(transport.clone())
            .build()
            .unwrap();

        let get = Project::get(&client, String::new()).await;
        assert!(matches!(get, Err(OpenProjectError::Request(_))));
        let delete = Project::delete(&client, "  ".to_string()).await;
        assert!(matches!(delete, Err(OpenProjectError::Request(_))));
        assert_eq!(transport.request_count(), 0);
    }
}
