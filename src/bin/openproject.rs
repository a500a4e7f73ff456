//! OpenProject API CLI binary.
//!
//! A command-line interface for interacting with the OpenProject API.

use clap::Parser;
use openproject_client::cli::{Cli, Command, Entity};
use openproject_client::output::{NamedRow, PrettyPrint, ProjectRow, UserRow, WorkPackageRow};
use openproject_client::{
    Attachment, Category, CategoryListQuery, Collection, Delete, Filters, Get, List,
    OpenProjectClient, OpenProjectError, Project, Query, Status, User, WikiPage, WorkPackage,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const DEFAULT_CLI_PAGE_SIZE: u32 = 20;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match OpenProjectClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set OPENPROJECT_URL and OPENPROJECT_API_KEY environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &OpenProjectClient, cli: Cli) -> openproject_client::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, &id, cli.json).await,
        Command::List {
            entity,
            offset,
            page_size,
            filters,
            project,
        } => {
            let filters: Filters = filters.into_iter().collect();
            let offset = offset.unwrap_or(1);
            let page_size = page_size.unwrap_or(DEFAULT_CLI_PAGE_SIZE);
            handle_list(client, entity, filters, project, offset, page_size, cli.json).await
        }
        Command::Delete { entity, id } => handle_delete(client, entity, &id).await,
    }
}

fn numeric_id(id: &str) -> openproject_client::Result<u64> {
    id.parse()
        .map_err(|_| OpenProjectError::Request(format!("'{id}' is not a numeric ID")))
}

async fn handle_get(
    client: &OpenProjectClient,
    entity: Entity,
    id: &str,
    json: bool,
) -> openproject_client::Result<()> {
    match entity {
        Entity::WorkPackage => {
            output_single(&WorkPackage::get(client, numeric_id(id)?).await?, json)
        }
        Entity::User => output_single(&User::get(client, numeric_id(id)?).await?, json),
        Entity::Project => output_single(&Project::get(client, id.to_string()).await?, json),
        Entity::Status => output_single(&Status::get(client, numeric_id(id)?).await?, json),
        Entity::WikiPage => output_single(&WikiPage::get(client, numeric_id(id)?).await?, json),
        Entity::Attachment => {
            output_single(&Attachment::get(client, numeric_id(id)?).await?, json)
        }
        Entity::Category => output_single(&Category::get(client, numeric_id(id)?).await?, json),
        Entity::Query => output_single(&Query::get(client, numeric_id(id)?).await?, json),
    }
}

async fn handle_list(
    client: &OpenProjectClient,
    entity: Entity,
    filters: Filters,
    project: Option<String>,
    offset: u32,
    page_size: u32,
    json: bool,
) -> openproject_client::Result<()> {
    match entity {
        Entity::WorkPackage => {
            let page = WorkPackage::list_page(client, &filters, offset, page_size).await?;
            output_page(&page, json, |item| WorkPackageRow::from(item))
        }
        Entity::User => {
            let page = User::list_page(client, &filters, offset, page_size).await?;
            output_page(&page, json, |item| UserRow::from(item))
        }
        Entity::Project => {
            let page = Project::list_page(client, &filters, offset, page_size).await?;
            output_page(&page, json, |item| ProjectRow::from(item))
        }
        Entity::Status => {
            let page = Status::list_page(client, &filters, offset, page_size).await?;
            output_page(&page, json, |item| NamedRow::from(item))
        }
        Entity::Category => {
            let project = project.ok_or_else(|| {
                OpenProjectError::Request("--project required for listing categories".to_string())
            })?;
            let query = CategoryListQuery { project, filters };
            let page = Category::list_page(client, &query, offset, page_size).await?;
            output_page(&page, json, |item| NamedRow::from(item))
        }
        Entity::Query => {
            let page = Query::list_page(client, &filters, offset, page_size).await?;
            output_page(&page, json, |item| NamedRow::from(item))
        }
        Entity::WikiPage | Entity::Attachment => {
            eprintln!("Hint: Wiki pages and attachments can only be fetched by ID");
            Err(OpenProjectError::Request(format!(
                "{} cannot be listed",
                openproject_client::ResourceKind::from(entity)
            )))
        }
    }
}

async fn handle_delete(
    client: &OpenProjectClient,
    entity: Entity,
    id: &str,
) -> openproject_client::Result<()> {
    let response = match entity {
        Entity::WorkPackage => WorkPackage::delete(client, numeric_id(id)?).await?,
        Entity::User => User::delete(client, numeric_id(id)?).await?,
        Entity::Project => Project::delete(client, id.to_string()).await?,
        Entity::Attachment => Attachment::delete(client, numeric_id(id)?).await?,
        Entity::Query => Query::delete(client, numeric_id(id)?).await?,
        Entity::Status | Entity::WikiPage | Entity::Category => {
            return Err(OpenProjectError::Request(format!(
                "{} cannot be deleted",
                openproject_client::ResourceKind::from(entity)
            )));
        }
    };
    println!(
        "Deleted {} {id} ({})",
        openproject_client::ResourceKind::from(entity),
        response.status
    );
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(
    item: &T,
    json: bool,
) -> openproject_client::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(
    page: &Collection<T>,
    json: bool,
    to_row: F,
) -> openproject_client::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(page.elements())?);
    } else {
        let rows: Vec<R> = page.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        let page_size = page.page_size.max(1);
        let total_pages = page.total.div_ceil(page_size);
        println!(
            "\nPage {}/{} ({} total items)",
            page.offset.max(1),
            total_pages.max(1),
            page.total
        );
    }
    Ok(())
}
