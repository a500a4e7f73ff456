//! Filter specifications for list endpoints.
//!
//! OpenProject takes filters as one `filters` query parameter holding a JSON
//! array: `[{"status":{"operator":"=","values":["open"]}}]`. Only AND
//! combinations are supported by the API.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{OpenProjectError, Result};

/// Name of the query parameter that carries filters.
pub const FILTERS_PARAM: &str = "filters";

/// Comparison operators understood by OpenProject filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `**`
    ContainsString,
    /// `~`
    Like,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
}

impl FilterOperator {
    /// The operator symbol sent on the wire.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::ContainsString => "**",
            Self::Like => "~",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for FilterOperator {
    type Err = OpenProjectError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "=" => Ok(Self::Equal),
            "<>" => Ok(Self::NotEqual),
            ">" => Ok(Self::GreaterThan),
            "<" => Ok(Self::LessThan),
            "**" => Ok(Self::ContainsString),
            "~" => Ok(Self::Like),
            ">=" => Ok(Self::GreaterOrEqual),
            "<=" => Ok(Self::LessOrEqual),
            other => Err(OpenProjectError::Request(format!(
                "unknown filter operator '{other}'"
            ))),
        }
    }
}

/// One `(field, operator, value)` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterField {
    pub fn new(field: &str, operator: FilterOperator, value: &str) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.to_string(),
        }
    }
}

impl FromStr for FilterField {
    type Err = OpenProjectError;

    /// Parse `field:operator:value`, e.g. `status:=:1` or `subject:~:login`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(field), Some(op), Some(value)) if !field.is_empty() => Ok(Self {
                field: field.to_string(),
                operator: op.parse()?,
                value: value.to_string(),
            }),
            _ => Err(OpenProjectError::Request(format!(
                "invalid filter '{s}': expected field:operator:value"
            ))),
        }
    }
}

#[derive(Serialize)]
struct Condition<'a> {
    operator: &'static str,
    values: [&'a str; 1],
}

/// An ordered set of filter conditions, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    fields: Vec<FilterField>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, builder style.
    #[must_use]
    pub fn with(mut self, field: &str, operator: FilterOperator, value: &str) -> Self {
        self.push(FilterField::new(field, operator, value));
        self
    }

    /// Add a condition.
    pub fn push(&mut self, field: FilterField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The JSON value of the `filters` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Request`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let entries: Vec<BTreeMap<&str, Condition<'_>>> = self
            .fields
            .iter()
            .map(|f| {
                BTreeMap::from([(
                    f.field.as_str(),
                    Condition {
                        operator: f.operator.symbol(),
                        values: [f.value.as_str()],
                    },
                )])
            })
            .collect();
        serde_json::to_string(&entries)
            .map_err(|e| OpenProjectError::Request(format!("failed to serialize filters: {e}")))
    }

    /// Append the `filters` parameter to `url`, keeping its existing query.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Request`] if serialization fails.
    pub fn apply_to(&self, url: &mut Url) -> Result<()> {
        let json = self.to_json()?;
        url.query_pairs_mut().append_pair(FILTERS_PARAM, &json);
        Ok(())
    }
}

impl FromIterator<FilterField> for Filters {
    fn from_iter<I: IntoIterator<Item = FilterField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
