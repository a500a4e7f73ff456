//! Mock OpenProject API server.
//!
//! Provides an axum-based HTTP server that simulates the OpenProject API v3.

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::{MockState, SharedState};

/// An in-process OpenProject instance bound to a loopback port.
pub struct MockServer {
    url: String,
    handle: JoinHandle<()>,
    state: SharedState,
}

impl MockServer {
    /// Serve [`Fixtures::default_scenario`] with authentication disabled.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Serve no data at all.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Serve `state`.
    ///
    /// # Panics
    ///
    /// Panics if no loopback port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Base URL to hand to `OpenProjectClient`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The login endpoint for cookie-session authentication.
    pub fn login_url(&self) -> String {
        format!("{}/login", self.url)
    }

    /// The live state, for seeding data or asserting on it mid-test.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Abort the server task and wait for it to finish.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// The state [`MockServer::start`] serves.
    pub fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let state = MockState::new();
        let state = scenario.projects.into_iter().fold(state, MockState::with_project);
        let state = scenario.work_packages.into_iter().fold(state, MockState::with_work_package);
        let state = scenario.users.into_iter().fold(state, MockState::with_user);
        scenario.statuses.into_iter().fold(state, MockState::with_status)
    }

    fn create_router(state: SharedState) -> Router {
        Router::new()
            .route("/login", post(handlers::login))
            // Work package routes
            .route(
                "/api/v3/work_packages",
                get(handlers::list_work_packages),
            )
            .route(
                "/api/v3/work_packages/:id",
                get(handlers::get_work_package).delete(handlers::delete_work_package),
            )
            .route(
                "/api/v3/projects/:id/work_packages",
                post(handlers::create_work_package),
            )
            // Project routes
            .route(
                "/api/v3/projects",
                get(handlers::list_projects).post(handlers::create_project),
            )
            .route(
                "/api/v3/projects/:id",
                get(handlers::get_project).delete(handlers::delete_project),
            )
            // User routes
            .route(
                "/api/v3/users",
                get(handlers::list_users).post(handlers::create_user),
            )
            .route(
                "/api/v3/users/:id",
                get(handlers::get_user).delete(handlers::delete_user),
            )
            // Status routes
            .route("/api/v3/statuses", get(handlers::list_statuses))
            .route("/api/v3/statuses/:id", get(handlers::get_status))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicAuth, Get, List, OpenProjectClient, Project, WorkPackage};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_work_package_with_client() {
        let server = MockServer::start().await;
        let client = OpenProjectClient::new(server.url(), BasicAuth::api_key("token")).unwrap();

        let wp = WorkPackage::get(&client, 4).await.expect("Failed to get work package");

        assert_eq!(wp.subject, "Develop API");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_projects_with_client() {
        let server = MockServer::start().await;
        let client = OpenProjectClient::new(server.url(), BasicAuth::api_key("token")).unwrap();

        let page = Project::list_page(&client, &Default::default(), 1, 20)
            .await
            .expect("Failed to list projects");

        assert_eq!(page.total, 2);
        assert_eq!(page.elements()[0].identifier, "demo-project");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = OpenProjectClient::new(server.url(), BasicAuth::api_key("token")).unwrap();

        let err = Project::get(&client, "nonexistent".to_string()).await.unwrap_err();

        assert!(err.is_not_found());

        server.shutdown().await;
    }
}
