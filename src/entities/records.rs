use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Identifier as delivered by the data source: the REST layer hands out both
/// numeric and string keys. Anything else (fractional or oversized numbers,
/// booleans, objects) is kept as `Other` so that one odd record does not
/// reject the whole document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
    Other(Value),
}

impl RecordId {
    /// Trimmed key, or `None` when the id is blank or not a usable key.
    pub fn key(&self) -> Option<String> {
        match self {
            Self::Number(value) => Some(value.to_string()),
            Self::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Self::Other(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.trim()),
            Self::Number(_) | Self::Other(_) => None,
        }
    }

    /// Empty string or `null`: the same as no reference at all.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Other(value) => value.is_null(),
            Self::Number(_) => false,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value.trim()),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "company", alias = "organization_id")]
    pub organization: Option<RecordId>,
    #[serde(alias = "linkedin_profile")]
    pub linkedin: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: Option<RecordId>,
    #[serde(alias = "company_name")]
    pub name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    #[serde(alias = "address")]
    pub physical_address: Option<String>,
    #[serde(alias = "linkedin")]
    pub linkedin_page: Option<String>,
    pub key_contacts: Vec<RecordId>,
    pub recent_events: Vec<RecordId>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Event {
    pub id: Option<RecordId>,
    #[serde(alias = "event_name")]
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub target_audience: Option<String>,
    #[serde(alias = "related_organizations")]
    pub organizations: Vec<RecordId>,
    pub attendees: Vec<RecordId>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityCollections {
    #[serde(alias = "contacts")]
    pub people: Vec<Person>,
    #[serde(alias = "companies")]
    pub organizations: Vec<Organization>,
    pub events: Vec<Event>,
}

impl EntityCollections {
    pub fn record_count(&self) -> usize {
        self.people.len() + self.organizations.len() + self.events.len()
    }
}
