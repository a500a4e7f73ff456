//! OpenProject API client library.
//!
//! A Rust library for the OpenProject REST API v3 using a trait-based
//! architecture: each operation (Get, List, Create, Delete) is a trait that
//! resource types implement, and every implementation routes through one
//! generic dispatcher.
//!
//! # Quick Start
//!
//! ```no_run
//! use openproject_client::{FilterOperator, Filters, Get, List, OpenProjectClient, WorkPackage};
//!
//! #[tokio::main]
//! async fn main() -> openproject_client::Result<()> {
//!     // Create client from environment variables
//!     let client = OpenProjectClient::from_env()?;
//!
//!     // Get a work package by ID
//!     let wp = WorkPackage::get(&client, 42).await?;
//!     println!("#{}: {}", wp.id, wp.subject);
//!
//!     // List all open work packages
//!     let open = Filters::new().with("status", FilterOperator::Equal, "o");
//!     let all = WorkPackage::list_all(&client, &open).await?;
//!     println!("Found {} open work packages", all.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`auth`] - the three credential strategies behind [`Authenticator`]
//! - [`OpenProjectClient`] - base URL, transport and one active strategy
//! - [`dispatch`] - `get`/`get_list`/`create`/`delete` for any
//!   [`ResourceKind`], returning the decoded value plus the [`ApiResponse`]
//! - [`Get`], [`List`], [`Create`], [`Delete`] - typed entry points on
//!   models such as [`WorkPackage`] or [`Project`]
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `OPENPROJECT_URL` (required) - Base URL of the instance
//! - `OPENPROJECT_API_KEY` - API key, sent as basic auth for user `apikey`
//! - `OPENPROJECT_USERNAME` / `OPENPROJECT_PASSWORD` - basic auth, or a
//!   cookie session when `OPENPROJECT_AUTH_URL` is also set
//! - `OPENPROJECT_JWT_SECRET` / `OPENPROJECT_JWT_ISSUER` - signed tokens

pub mod auth;
pub mod cli;
mod client;
mod codec;
pub mod dispatch;
mod error;
mod filters;
mod models;
pub mod output;
mod pagination;
mod response;
mod traits;
mod transport;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::{Authenticator, BasicAuth, CookieSessionAuth, JwtAuth};
pub use client::{ClientBuilder, OpenProjectClient};
pub use codec::{Date, Timestamp};
pub use dispatch::{Resource, ResourceKind, ResourceList, ServiceHandle};
pub use error::{OpenProjectError, Result};
pub use filters::{FilterField, FilterOperator, Filters, FILTERS_PARAM};
pub use pagination::{Collection, PageParams, Pagination, DEFAULT_PAGE_SIZE};
pub use output::PrettyPrint;
pub use response::ApiResponse;
pub use transport::{ApiRequest, HttpSend};

// Re-export traits
pub use traits::{Create, Delete, Get, List, MAX_PAGES};

// Re-export models
pub use models::{
    link, Attachment, Category, CategoryListQuery, Digest, Formattable, Link, Links, Project,
    Query, Status, User, WikiPage, WorkPackage,
};
