//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{Project, Status, User, WorkPackage};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// A complete set of fixtures for the default scenario.
#[derive(Debug, Default)]
pub struct DefaultScenario {
    pub projects: Vec<Project>,
    pub work_packages: Vec<WorkPackage>,
    pub users: Vec<User>,
    pub statuses: Vec<Status>,
}

impl Fixtures {
    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a minimal active project.
    pub fn project(id: u64, identifier: &str, name: &str) -> Project {
        let mut project = Project {
            resource_type: "Project".to_string(),
            id,
            identifier: identifier.to_string(),
            name: name.to_string(),
            active: true,
            ..Default::default()
        };
        project.links.insert(
            "self".to_string(),
            serde_json::json!({ "href": format!("/api/v3/projects/{id}"), "title": name }),
        );
        project
    }

    // =========================================================================
    // Work Package Fixtures
    // =========================================================================

    /// Create a work package in `project` with the given status.
    pub fn work_package(id: u64, subject: &str, project: &Project, status: &Status) -> WorkPackage {
        let mut wp = WorkPackage {
            resource_type: "WorkPackage".to_string(),
            id,
            lock_version: 1,
            ..WorkPackage::draft(subject)
        };
        wp.links.insert(
            "self".to_string(),
            serde_json::json!({ "href": format!("/api/v3/work_packages/{id}"), "title": subject }),
        );
        wp.links.insert(
            "project".to_string(),
            serde_json::json!({
                "href": format!("/api/v3/projects/{}", project.id),
                "title": project.name,
            }),
        );
        wp.links.insert(
            "status".to_string(),
            serde_json::json!({
                "href": format!("/api/v3/statuses/{}", status.id),
                "title": status.name,
            }),
        );
        wp
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create an active user.
    pub fn user(id: u64, login: &str, first_name: &str, last_name: &str) -> User {
        User {
            resource_type: "User".to_string(),
            id,
            login: login.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            name: format!("{first_name} {last_name}"),
            email: format!("{login}@example.org"),
            status: "active".to_string(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Status Fixtures
    // =========================================================================

    pub fn status(id: u64, name: &str, is_closed: bool) -> Status {
        Status {
            resource_type: "Status".to_string(),
            id,
            name: name.to_string(),
            position: id,
            is_default: id == 1,
            is_closed,
            ..Default::default()
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Two projects, three statuses, two users and four work packages.
    pub fn default_scenario() -> DefaultScenario {
        let statuses = vec![
            Self::status(1, "New", false),
            Self::status(7, "In progress", false),
            Self::status(12, "Closed", true),
        ];
        let demo = Self::project(1, "demo-project", "Demo project");
        let scrum = Self::project(2, "your-scrum-project", "Scrum project");

        let work_packages = vec![
            Self::work_package(1, "Set date and location of conference", &demo, &statuses[0]),
            Self::work_package(2, "Send invitation to speakers", &demo, &statuses[1]),
            Self::work_package(3, "Create a new landing page", &demo, &statuses[2]),
            Self::work_package(4, "Develop API", &scrum, &statuses[0]),
        ];

        DefaultScenario {
            projects: vec![demo, scrum],
            work_packages,
            users: vec![
                Self::user(1, "admin", "OpenProject", "Admin"),
                Self::user(2, "j.sheppard", "John", "Sheppard"),
            ],
            statuses,
        }
    }
}
