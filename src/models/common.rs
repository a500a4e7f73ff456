//! Value types shared between resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Formatted text as OpenProject returns it (descriptions, wiki bodies).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formattable {
    /// Markup format, usually `"markdown"`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// Source text.
    #[serde(default)]
    pub raw: String,
    /// Server-rendered HTML. Read-only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub html: String,
}

impl Formattable {
    /// Markdown text, ready to send.
    pub fn markdown(raw: &str) -> Self {
        Self {
            format: "markdown".to_string(),
            raw: raw.to_string(),
            html: String::new(),
        }
    }
}

/// A HAL link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn to(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            title: None,
        }
    }

    /// The trailing path segment of `href`, typically the linked resource's ID.
    pub fn id(&self) -> Option<&str> {
        self.href
            .as_deref()
            .and_then(|href| href.trim_end_matches('/').rsplit('/').next())
            .filter(|segment| !segment.is_empty())
    }
}

/// The `_links` object of a resource.
///
/// Values are kept as raw JSON because some relations are arrays of links.
pub type Links = BTreeMap<String, serde_json::Value>;

/// Read a single link named `name` out of `links`.
pub fn link(links: &Links, name: &str) -> Option<Link> {
    links
        .get(name)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}
