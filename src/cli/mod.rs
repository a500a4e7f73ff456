//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! `openproject` binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::dispatch::ResourceKind;
use crate::filters::FilterField;

/// OpenProject API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "openproject", about = "OpenProject API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// Numeric ID (projects also accept their identifier).
        id: String,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Page number (1-indexed).
        #[arg(long)]
        offset: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        page_size: Option<u32>,

        /// Filter as field:operator:value, e.g. `status:=:1`. Repeatable.
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<FilterField>,

        /// Project ID or identifier (required for categories).
        #[arg(long)]
        project: Option<String>,
    },

    /// Delete an entity by ID.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// Numeric ID (projects also accept their identifier).
        id: String,
    },
}

fn parse_filter(s: &str) -> Result<FilterField, String> {
    s.parse().map_err(|e: crate::OpenProjectError| e.to_string())
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A work package (task, bug, ...).
    #[value(alias = "work-packages", alias = "wp")]
    WorkPackage,
    /// A user account.
    #[value(alias = "users")]
    User,
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A work package status.
    #[value(alias = "statuses")]
    Status,
    /// A wiki page.
    #[value(alias = "wiki-pages")]
    WikiPage,
    /// A file attachment.
    #[value(alias = "attachments")]
    Attachment,
    /// A project category.
    #[value(alias = "categories")]
    Category,
    /// A saved query.
    #[value(alias = "queries")]
    Query,
}

impl From<Entity> for ResourceKind {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::WorkPackage => ResourceKind::WorkPackage,
            Entity::User => ResourceKind::User,
            Entity::Project => ResourceKind::Project,
            Entity::Status => ResourceKind::Status,
            Entity::WikiPage => ResourceKind::WikiPage,
            Entity::Attachment => ResourceKind::Attachment,
            Entity::Category => ResourceKind::Category,
            Entity::Query => ResourceKind::Query,
        }
    }
}
