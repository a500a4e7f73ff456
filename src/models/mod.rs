//! OpenProject API model types.

mod attachment;
mod category;
mod common;
mod project;
mod query;
mod status;
mod user;
mod wiki_page;
mod work_package;

pub use attachment::*;
pub use category::*;
pub use common::*;
pub use project::*;
pub use query::*;
pub use status::*;
pub use user::*;
pub use wiki_page::*;
pub use work_package::*;

use crate::client::OpenProjectClient;
use crate::dispatch::{self, Resource, ResourceKind, ResourceList};
use crate::error::{OpenProjectError, Result};
use crate::filters::Filters;
use crate::pagination::{Collection, PageParams};

pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Percent-encode a caller-supplied ID for use as one path segment.
///
/// Blank keys are rejected, since `projects/` would resolve to the collection.
pub(crate) fn path_segment(what: &str, key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(OpenProjectError::Request(format!("{what} must not be empty")));
    }
    Ok(urlencoding::encode(key).into_owned())
}

/// GET one resource of `kind` and convert it to `T`.
pub(crate) async fn fetch_one<T>(
    client: &OpenProjectClient,
    kind: ResourceKind,
    endpoint: &str,
) -> Result<T>
where
    T: TryFrom<Resource, Error = OpenProjectError>,
{
    let (resource, _) = dispatch::get(&client.handle(kind), endpoint).await?;
    T::try_from(resource)
}

/// GET one page of a `kind` collection. Empty filters are not sent.
pub(crate) async fn fetch_page<T>(
    client: &OpenProjectClient,
    kind: ResourceKind,
    endpoint: &str,
    filters: &Filters,
    offset: u32,
    page_size: u32,
) -> Result<Collection<T>>
where
    Collection<T>: TryFrom<ResourceList, Error = OpenProjectError>,
{
    let endpoint = PageParams::for_page(offset, page_size).apply(endpoint);
    let filters = (!filters.is_empty()).then_some(filters);
    let (list, _) = dispatch::get_list(&client.handle(kind), &endpoint, filters).await?;
    Collection::<T>::try_from(list)
}

/// POST `payload` and convert the created resource back to `T`.
pub(crate) async fn post_new<T>(client: &OpenProjectClient, endpoint: &str, payload: T) -> Result<T>
where
    T: Into<Resource> + TryFrom<Resource, Error = OpenProjectError>,
{
    let payload: Resource = payload.into();
    let handle = client.handle(payload.kind());
    let (created, _) = dispatch::create(&handle, endpoint, &payload).await?;
    T::try_from(created)
}
