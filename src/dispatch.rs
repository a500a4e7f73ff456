//! Generic create/read/list/delete dispatch.
//!
//! A [`ServiceHandle`] names a [`ResourceKind`] and points back at the client
//! that issued it. The four operations here resolve the handle, issue one
//! HTTP request, and decode the body into the concrete type registered for
//! that kind: a [`Resource`] for single objects, a [`ResourceList`] for
//! collections. Callers convert the result to their known type with
//! `TryFrom`.
//!
//! Resolution is a closed `match` over [`ResourceKind`]; adding a kind means
//! adding a variant and letting the compiler point at every arm.

use std::fmt;
use std::sync::Weak;

use reqwest::Method;
use serde::de::Error as _;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ClientInner, OpenProjectClient};
use crate::error::{OpenProjectError, Result};
use crate::filters::Filters;
use crate::models::{Attachment, Category, Project, Query, Status, User, WikiPage, WorkPackage};
use crate::pagination::{Collection, Pagination};
use crate::response::ApiResponse;

/// The resource kinds this client can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    WorkPackage,
    User,
    Project,
    Status,
    WikiPage,
    Attachment,
    Category,
    Query,
}

impl ResourceKind {
    /// Every kind, in declaration order.
    pub const ALL: [ResourceKind; 8] = [
        Self::WorkPackage,
        Self::User,
        Self::Project,
        Self::Status,
        Self::WikiPage,
        Self::Attachment,
        Self::Category,
        Self::Query,
    ];

    /// Human-readable name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::WorkPackage => "work package",
            Self::User => "user",
            Self::Project => "project",
            Self::Status => "status",
            Self::WikiPage => "wiki page",
            Self::Attachment => "attachment",
            Self::Category => "category",
            Self::Query => "query",
        }
    }

    /// The `_type` OpenProject sends for resources of this kind.
    pub fn wire_type(self) -> &'static str {
        match self {
            Self::WorkPackage => "WorkPackage",
            Self::User => "User",
            Self::Project => "Project",
            Self::Status => "Status",
            Self::WikiPage => "WikiPage",
            Self::Attachment => "Attachment",
            Self::Category => "Category",
            Self::Query => "Query",
        }
    }

    /// Whether this kind has a paginated list envelope.
    ///
    /// OpenProject offers no collection endpoint for wiki pages, and
    /// attachments are only listed per container with no shared envelope.
    pub fn has_list(self) -> bool {
        match self {
            Self::WorkPackage
            | Self::User
            | Self::Project
            | Self::Status
            | Self::Category
            | Self::Query => true,
            Self::WikiPage | Self::Attachment => false,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Routes dispatch calls for one resource kind back to its client.
///
/// The back-reference is weak: a handle never keeps a client alive, and a
/// handle that outlived its client fails with [`OpenProjectError::Dispatch`].
#[derive(Clone)]
pub struct ServiceHandle {
    kind: ResourceKind,
    client: Weak<ClientInner>,
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("kind", &self.kind)
            .field("attached", &(self.client.strong_count() > 0))
            .finish()
    }
}

impl ServiceHandle {
    pub(crate) fn new(kind: ResourceKind, client: Weak<ClientInner>) -> Self {
        Self { kind, client }
    }

    /// The resource kind this handle targets.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The owning client, if it is still alive.
    pub fn client(&self) -> Result<OpenProjectClient> {
        self.client
            .upgrade()
            .map(OpenProjectClient::from_inner)
            .ok_or_else(|| {
                OpenProjectError::Dispatch(format!(
                    "client not identified for {} handle",
                    self.kind
                ))
            })
    }
}

/// A decoded single resource of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    WorkPackage(WorkPackage),
    User(User),
    Project(Project),
    Status(Status),
    WikiPage(WikiPage),
    Attachment(Attachment),
    Category(Category),
    Query(Query),
}

impl Resource {
    /// The zero-valued resource for `kind`.
    pub fn empty(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::WorkPackage => Self::WorkPackage(WorkPackage::default()),
            ResourceKind::User => Self::User(User::default()),
            ResourceKind::Project => Self::Project(Project::default()),
            ResourceKind::Status => Self::Status(Status::default()),
            ResourceKind::WikiPage => Self::WikiPage(WikiPage::default()),
            ResourceKind::Attachment => Self::Attachment(Attachment::default()),
            ResourceKind::Category => Self::Category(Category::default()),
            ResourceKind::Query => Self::Query(Query::default()),
        }
    }

    /// The kind of the contained resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::WorkPackage(_) => ResourceKind::WorkPackage,
            Self::User(_) => ResourceKind::User,
            Self::Project(_) => ResourceKind::Project,
            Self::Status(_) => ResourceKind::Status,
            Self::WikiPage(_) => ResourceKind::WikiPage,
            Self::Attachment(_) => ResourceKind::Attachment,
            Self::Category(_) => ResourceKind::Category,
            Self::Query(_) => ResourceKind::Query,
        }
    }

    /// Decode `body` into the result type registered for `kind`.
    ///
    /// A body whose `_type` names something else (a `Collection`, an
    /// `Error`, another kind) is rejected. A body without `_type` is accepted.
    pub fn decode(kind: ResourceKind, body: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        expect_type(&value, kind.wire_type())?;

        Ok(match kind {
            ResourceKind::WorkPackage => Self::WorkPackage(serde_json::from_value(value)?),
            ResourceKind::User => Self::User(serde_json::from_value(value)?),
            ResourceKind::Project => Self::Project(serde_json::from_value(value)?),
            ResourceKind::Status => Self::Status(serde_json::from_value(value)?),
            ResourceKind::WikiPage => Self::WikiPage(serde_json::from_value(value)?),
            ResourceKind::Attachment => Self::Attachment(serde_json::from_value(value)?),
            ResourceKind::Category => Self::Category(serde_json::from_value(value)?),
            ResourceKind::Query => Self::Query(serde_json::from_value(value)?),
        })
    }
}

/// A decoded paginated collection of any listable kind.
#[derive(Debug, Clone)]
pub enum ResourceList {
    WorkPackages(Collection<WorkPackage>),
    Users(Collection<User>),
    Projects(Collection<Project>),
    Statuses(Collection<Status>),
    Categories(Collection<Category>),
    Queries(Collection<Query>),
}

impl ResourceList {
    /// The kind of the contained elements.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::WorkPackages(_) => ResourceKind::WorkPackage,
            Self::Users(_) => ResourceKind::User,
            Self::Projects(_) => ResourceKind::Project,
            Self::Statuses(_) => ResourceKind::Status,
            Self::Categories(_) => ResourceKind::Category,
            Self::Queries(_) => ResourceKind::Query,
        }
    }

    /// The pagination metadata of the contained collection.
    pub fn pagination(&self) -> Pagination {
        match self {
            Self::WorkPackages(c) => c.pagination(),
            Self::Users(c) => c.pagination(),
            Self::Projects(c) => c.pagination(),
            Self::Statuses(c) => c.pagination(),
            Self::Categories(c) => c.pagination(),
            Self::Queries(c) => c.pagination(),
        }
    }

    /// Decode `body` into the envelope registered for `kind`.
    ///
    /// Returns `None` for kinds without a list envelope.
    pub fn decode(kind: ResourceKind, body: &[u8]) -> Option<serde_json::Result<Self>> {
        if !kind.has_list() {
            return None;
        }
        Some(Self::decode_envelope(kind, body))
    }

    fn decode_envelope(kind: ResourceKind, body: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        expect_type(&value, COLLECTION_TYPE)?;

        Ok(match kind {
            ResourceKind::WorkPackage => Self::WorkPackages(serde_json::from_value(value)?),
            ResourceKind::User => Self::Users(serde_json::from_value(value)?),
            ResourceKind::Project => Self::Projects(serde_json::from_value(value)?),
            ResourceKind::Status => Self::Statuses(serde_json::from_value(value)?),
            ResourceKind::Category => Self::Categories(serde_json::from_value(value)?),
            ResourceKind::Query => Self::Queries(serde_json::from_value(value)?),
            ResourceKind::WikiPage | ResourceKind::Attachment => {
                return Err(serde_json::Error::custom(format!("{kind} has no list envelope")))
            }
        })
    }
}

macro_rules! impl_resource_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Resource {
                fn from(value: $ty) -> Self {
                    Resource::$variant(value)
                }
            }

            impl TryFrom<Resource> for $ty {
                type Error = OpenProjectError;

                fn try_from(resource: Resource) -> Result<Self> {
                    match resource {
                        Resource::$variant(value) => Ok(value),
                        other => Err(OpenProjectError::Dispatch(format!(
                            "expected {} but decoded {}",
                            ResourceKind::$variant,
                            other.kind()
                        ))),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_list_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<Collection<$ty>> for ResourceList {
                fn from(value: Collection<$ty>) -> Self {
                    ResourceList::$variant(value)
                }
            }

            impl TryFrom<ResourceList> for Collection<$ty> {
                type Error = OpenProjectError;

                fn try_from(list: ResourceList) -> Result<Self> {
                    match list {
                        ResourceList::$variant(value) => Ok(value),
                        other => Err(OpenProjectError::Dispatch(format!(
                            "expected a {} list but decoded a {} list",
                            Resource::from(<$ty>::default()).kind(),
                            other.kind()
                        ))),
                    }
                }
            }
        )*
    };
}

impl_resource_conversions! {
    WorkPackage => WorkPackage,
    User => User,
    Project => Project,
    Status => Status,
    WikiPage => WikiPage,
    Attachment => Attachment,
    Category => Category,
    Query => Query,
}

impl_list_conversions! {
    WorkPackages => WorkPackage,
    Users => User,
    Projects => Project,
    Statuses => Status,
    Categories => Category,
    Queries => Query,
}

const COLLECTION_TYPE: &str = "Collection";

/// Fail if `value` carries a `_type` other than `expected`.
fn expect_type(value: &Value, expected: &str) -> serde_json::Result<()> {
    match value.get("_type").and_then(Value::as_str) {
        Some(found) if found != expected => Err(serde_json::Error::custom(format!(
            "expected _type {expected} but the body is a {found}"
        ))),
        _ => Ok(()),
    }
}

fn decode_failure(source: serde_json::Error, response: ApiResponse) -> OpenProjectError {
    OpenProjectError::Decode {
        source,
        response: Some(Box::new(response)),
    }
}

fn trim_endpoint(endpoint: &str) -> &str {
    endpoint.trim_end_matches('/')
}

/// GET a single resource.
///
/// # Errors
///
/// [`OpenProjectError::Dispatch`] if the handle's client is gone (no request
/// is sent), [`OpenProjectError::Status`] for non-2xx answers, and
/// [`OpenProjectError::Decode`] if the body does not match the kind.
#[tracing::instrument(skip(handle), fields(kind = %handle.kind()))]
pub async fn get(handle: &ServiceHandle, endpoint: &str) -> Result<(Resource, ApiResponse)> {
    let client = handle.client()?;
    let request = client.build_request(Method::GET, trim_endpoint(endpoint), None::<&()>)?;
    let response = client.execute(request).await?;

    match Resource::decode(handle.kind(), &response.body) {
        Ok(resource) => Ok((resource, response)),
        Err(source) => Err(decode_failure(source, response)),
    }
}

/// GET a paginated collection, optionally filtered.
///
/// Filters are appended to the endpoint's query string as the `filters`
/// parameter before credentials are attached.
///
/// # Errors
///
/// As [`get`], plus [`OpenProjectError::Dispatch`] for kinds without a list
/// envelope.
#[tracing::instrument(skip(handle, filters), fields(kind = %handle.kind()))]
pub async fn get_list(
    handle: &ServiceHandle,
    endpoint: &str,
    filters: Option<&Filters>,
) -> Result<(ResourceList, ApiResponse)> {
    let kind = handle.kind();
    if !kind.has_list() {
        return Err(OpenProjectError::Dispatch(format!(
            "{kind} has no list endpoint"
        )));
    }

    let client = handle.client()?;
    let mut request = client.build_request(Method::GET, trim_endpoint(endpoint), None::<&()>)?;
    if let Some(filters) = filters {
        filters.apply_to(&mut request.url)?;
    }
    let mut response = client.execute(request).await?;

    match ResourceList::decode(kind, &response.body) {
        Some(Ok(list)) => {
            response.populate_page_values(&list);
            Ok((list, response))
        }
        Some(Err(source)) => Err(decode_failure(source, response)),
        None => Err(OpenProjectError::Dispatch(format!(
            "{kind} has no list envelope"
        ))),
    }
}

/// POST a new resource.
///
/// `payload` is serialized as the request body and must be of the handle's
/// kind. The response body is decoded into the same kind.
///
/// # Errors
///
/// [`OpenProjectError::Dispatch`] on a kind mismatch or missing client (no
/// request is sent), [`OpenProjectError::Status`] for non-2xx answers, and
/// [`OpenProjectError::Decode`] with the response attached when the created
/// resource cannot be read back.
#[tracing::instrument(skip(handle, payload), fields(kind = %handle.kind()))]
pub async fn create(
    handle: &ServiceHandle,
    endpoint: &str,
    payload: &Resource,
) -> Result<(Resource, ApiResponse)> {
    let kind = handle.kind();
    if payload.kind() != kind {
        return Err(OpenProjectError::Dispatch(format!(
            "payload is a {} but the handle targets {kind}",
            payload.kind()
        )));
    }

    let client = handle.client()?;
    let request = client.build_request(Method::POST, trim_endpoint(endpoint), Some(payload))?;
    let response = client.execute(request).await?;

    match Resource::decode(kind, &response.body) {
        Ok(created) => Ok((created, response)),
        Err(source) => Err(decode_failure(source, response)),
    }
}

/// DELETE a resource. The response is returned without decoding.
///
/// # Errors
///
/// [`OpenProjectError::Dispatch`] if the handle's client is gone and
/// [`OpenProjectError::Status`] for non-2xx answers.
#[tracing::instrument(skip(handle), fields(kind = %handle.kind()))]
pub async fn delete(handle: &ServiceHandle, endpoint: &str) -> Result<ApiResponse> {
    let client = handle.client()?;
    let request = client.build_request(Method::DELETE, trim_endpoint(endpoint), None::<&()>)?;
    client.execute(request).await
}
