//! Stateful in-memory OpenProject API v3 for end-to-end tests.
//!
//! wiremock stubs one exchange at a time. This server keeps work packages,
//! projects, users and statuses between requests and implements the login
//! endpoint, so whole create/list/delete flows and cookie sessions can run
//! against it.
//!
//! # Example
//!
//! ```ignore
//! use openproject_client::mock_server::MockServer;
//! use openproject_client::{BasicAuth, Get, OpenProjectClient, WorkPackage};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = OpenProjectClient::new(server.url(), BasicAuth::api_key("token")).unwrap();
//!
//!     // Server comes with default fixtures
//!     let wp = WorkPackage::get(&client, 4).await.unwrap();
//!     assert_eq!(wp.subject, "Develop API");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, SharedState, SESSION_COOKIE};
