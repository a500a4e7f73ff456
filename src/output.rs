//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output of single
//! resources and [`Tabled`] row types for collections, as an alternative to
//! JSON serialization.

use tabled::Tabled;

use crate::{Attachment, Category, Project, Query, Status, User, WikiPage, WorkPackage};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn block(header: String, fields: Vec<(&str, String)>) -> String {
    let divider = "─".repeat(header.chars().count().max(30));
    let mut lines = vec![header, divider];
    lines.extend(
        fields
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| format!("{:<15} {}", format!("{label}:"), value)),
    );
    lines.join("\n")
}

fn title_of(link: Option<crate::Link>) -> String {
    link.and_then(|l| l.title).unwrap_or_default()
}

impl PrettyPrint for WorkPackage {
    fn pretty_print(&self) -> String {
        block(
            format!("Work package #{}", self.id),
            vec![
                ("Subject", self.subject.clone()),
                ("Type", title_of(self.work_package_type())),
                ("Status", title_of(self.status())),
                ("Priority", title_of(self.priority())),
                ("Project", title_of(self.project())),
                ("Start", self.start_date.map(|d| d.to_string()).unwrap_or_default()),
                ("Due", self.due_date.map(|d| d.to_string()).unwrap_or_default()),
                ("Updated", self.updated_at.map(|t| t.to_string()).unwrap_or_default()),
            ],
        )
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        block(
            format!("User #{}", self.id),
            vec![
                ("Name", self.name.clone()),
                ("Login", self.login.clone()),
                ("Email", self.email.clone()),
                ("Status", self.status.clone()),
                ("Admin", if self.admin { "yes".to_string() } else { String::new() }),
            ],
        )
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        block(
            format!("Project: {}", self.path_key()),
            vec![
                ("Name", self.name.clone()),
                ("ID", self.id.to_string()),
                ("Active", if self.active { "yes" } else { "no" }.to_string()),
                ("Visibility", if self.public { "public" } else { "private" }.to_string()),
                ("Parent", title_of(self.parent())),
            ],
        )
    }
}

impl PrettyPrint for Status {
    fn pretty_print(&self) -> String {
        block(
            format!("Status #{}", self.id),
            vec![
                ("Name", self.name.clone()),
                ("Closed", if self.is_closed { "yes" } else { "no" }.to_string()),
                ("Default", if self.is_default { "yes" } else { "no" }.to_string()),
            ],
        )
    }
}

impl PrettyPrint for WikiPage {
    fn pretty_print(&self) -> String {
        block(
            format!("Wiki page #{}", self.id),
            vec![("Title", self.title.clone()), ("Project", title_of(self.project()))],
        )
    }
}

impl PrettyPrint for Attachment {
    fn pretty_print(&self) -> String {
        block(
            format!("Attachment #{}", self.id),
            vec![
                ("File", self.file_name.clone()),
                ("Type", self.content_type.clone()),
                ("Size", format!("{} bytes", self.file_size)),
                ("Container", title_of(self.container())),
            ],
        )
    }
}

impl PrettyPrint for Category {
    fn pretty_print(&self) -> String {
        block(
            format!("Category #{}", self.id),
            vec![
                ("Name", self.name.clone()),
                ("Project", title_of(self.project())),
                ("Assignee", title_of(self.default_assignee())),
            ],
        )
    }
}

impl PrettyPrint for Query {
    fn pretty_print(&self) -> String {
        block(
            format!("Query #{}", self.id),
            vec![
                ("Name", self.name.clone()),
                ("Owner", title_of(self.user())),
                ("Project", title_of(self.project())),
                ("Filters", self.filters.len().to_string()),
            ],
        )
    }
}

// Table row types for non-JSON list output

#[derive(Tabled)]
pub struct WorkPackageRow {
    pub id: u64,
    pub subject: String,
    pub status: String,
    pub due: String,
}

impl From<&WorkPackage> for WorkPackageRow {
    fn from(wp: &WorkPackage) -> Self {
        Self {
            id: wp.id,
            subject: wp.subject.clone(),
            status: title_of(wp.status()),
            due: wp.due_date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct UserRow {
    pub id: u64,
    pub login: String,
    pub name: String,
    pub status: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            login: u.login.clone(),
            name: u.name.clone(),
            status: u.status.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct ProjectRow {
    pub id: u64,
    pub identifier: String,
    pub name: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            identifier: p.identifier.clone(),
            name: p.name.clone(),
        }
    }
}

/// Row for resources that only carry an ID and a name.
#[derive(Tabled)]
pub struct NamedRow {
    pub id: u64,
    pub name: String,
}

impl From<&Status> for NamedRow {
    fn from(s: &Status) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
        }
    }
}

impl From<&Category> for NamedRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

impl From<&Query> for NamedRow {
    fn from(q: &Query) -> Self {
        Self {
            id: q.id,
            name: q.name.clone(),
        }
    }
}
