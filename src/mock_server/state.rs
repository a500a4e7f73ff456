//! Mock server state management.
//!
//! Provides the in-memory data store for the mock OpenProject API server.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{Project, Status, User, WorkPackage};

/// State shared between handlers.
pub type SharedState = Arc<RwLock<MockState>>;

/// Name of the session cookie set by `POST /login`.
pub const SESSION_COOKIE: &str = "_open_project_session";

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Work packages indexed by ID.
    pub work_packages: BTreeMap<u64, WorkPackage>,

    /// Projects indexed by ID. Lookups also accept the identifier.
    pub projects: BTreeMap<u64, Project>,

    /// Users indexed by ID.
    pub users: BTreeMap<u64, User>,

    /// Statuses indexed by ID.
    pub statuses: BTreeMap<u64, Status>,

    /// If set, every API request must carry these credentials as basic auth
    /// or present a session cookie obtained from `POST /login`.
    pub credentials: Option<(String, String)>,

    /// Session tokens handed out by `POST /login`.
    pub sessions: HashSet<String>,

    /// Number of successful logins, for asserting single-flight behavior.
    pub login_count: usize,

    next_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            work_packages: BTreeMap::new(),
            projects: BTreeMap::new(),
            users: BTreeMap::new(),
            statuses: BTreeMap::new(),
            credentials: None,
            sessions: HashSet::new(),
            login_count: 0,
            next_id: 1000,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Add a work package to the state.
    pub fn with_work_package(mut self, work_package: WorkPackage) -> Self {
        self.work_packages.insert(work_package.id, work_package);
        self
    }

    /// Add a project to the state.
    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.id, project);
        self
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add a status to the state.
    pub fn with_status(mut self, status: Status) -> Self {
        self.statuses.insert(status.id, status);
        self
    }

    /// Require `username`/`password` on every request.
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Allocate an ID for a newly created resource.
    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Find a project by numeric ID or identifier.
    pub fn find_project(&self, key: &str) -> Option<&Project> {
        match key.parse::<u64>() {
            Ok(id) => self.projects.get(&id),
            Err(_) => self.projects.values().find(|p| p.identifier == key),
        }
    }

    /// Remove a project by numeric ID or identifier, with its work packages.
    pub fn remove_project(&mut self, key: &str) -> Option<Project> {
        let id = self.find_project(key)?.id;
        let project = self.projects.remove(&id)?;
        let href = format!("/api/v3/projects/{id}");
        self.work_packages
            .retain(|_, wp| wp.project().and_then(|l| l.href).as_deref() != Some(href.as_str()));
        Some(project)
    }

    /// Check a basic-auth pair against the configured credentials.
    pub fn accepts(&self, username: &str, password: &str) -> bool {
        match &self.credentials {
            Some((u, p)) => u == username && p == password,
            None => true,
        }
    }

    /// Record a login and return the new session token.
    pub fn open_session(&mut self) -> String {
        self.login_count += 1;
        let id = self.next_id();
        let token = format!("session-{}-{id}", self.login_count);
        self.sessions.insert(token.clone());
        token
    }
}
