//! Tests for CLI output formatting: JSON with `--json`, pretty-print otherwise.

use openproject_client::output::{NamedRow, WorkPackageRow};
use openproject_client::{PrettyPrint, Project, Status, User, WorkPackage};

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_output_keeps_wire_names() {
    let wp = make_test_work_package();
    let json_output = serde_json::to_string_pretty(&wp).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed["_type"], "WorkPackage");
    assert_eq!(parsed["lockVersion"], 3);
    assert_eq!(parsed["dueDate"], "2024-03-01");
    assert_eq!(parsed["_links"]["status"]["title"], "In progress");
    // unknown members survive the round trip
    assert_eq!(parsed["customField1"], "blue");
}

#[test]
fn test_json_output_for_list_is_array() {
    let users = vec![make_test_user(), make_test_user()];
    let json_output = serde_json::to_string_pretty(&users).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let pretty_output = make_test_work_package().pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(parse_result.is_err(), "Default output should NOT be valid JSON");
}

#[test]
fn test_work_package_pretty_print_shows_links() {
    let output = make_test_work_package().pretty_print();

    assert!(output.starts_with("Work package #17"));
    assert!(output.contains("Write release notes"));
    assert!(output.contains("In progress"));
    assert!(output.contains("2024-03-01"));
}

#[test]
fn test_user_pretty_print_hides_empty_admin() {
    let output = make_test_user().pretty_print();

    assert!(output.contains("j.sheppard"));
    assert!(output.contains("Email"));
    assert!(!output.contains("Admin"));
}

#[test]
fn test_project_pretty_print_prefers_identifier() {
    let project: Project = serde_json::from_value(serde_json::json!({
        "_type": "Project",
        "id": 3,
        "identifier": "launch",
        "name": "Launch",
        "public": true
    }))
    .unwrap();

    let output = project.pretty_print();
    assert!(output.starts_with("Project: launch"));
    assert!(output.contains("public"));
}

#[test]
fn test_rows_render_as_table() {
    let rows = vec![WorkPackageRow::from(&make_test_work_package())];
    let table = tabled::Table::new(rows).to_string();

    assert!(table.contains("subject"));
    assert!(table.contains("Write release notes"));

    let status: Status =
        serde_json::from_value(serde_json::json!({"id": 12, "name": "Closed"})).unwrap();
    let table = tabled::Table::new(vec![NamedRow::from(&status)]).to_string();
    assert!(table.contains("Closed"));
}

// ============================================================================
// Test Helpers
// ============================================================================

fn make_test_work_package() -> WorkPackage {
    serde_json::from_value(serde_json::json!({
        "_type": "WorkPackage",
        "id": 17,
        "subject": "Write release notes",
        "lockVersion": 3,
        "dueDate": "2024-03-01",
        "customField1": "blue",
        "_links": {
            "status": {"href": "/api/v3/statuses/7", "title": "In progress"},
            "project": {"href": "/api/v3/projects/1", "title": "Demo project"}
        }
    }))
    .unwrap()
}

fn make_test_user() -> User {
    serde_json::from_value(serde_json::json!({
        "_type": "User",
        "id": 2,
        "login": "j.sheppard",
        "name": "John Sheppard",
        "email": "j.sheppard@example.org",
        "status": "active"
    }))
    .unwrap()
}
