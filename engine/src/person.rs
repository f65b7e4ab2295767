//! Person records and life events
//!
//! Plain data types matching the JSON person databases. The engine only
//! reads these; derived relationships live in a side table (`graph::FamilyLinks`).

use serde::{Deserialize, Serialize};

// ============================================================================
// Events
// ============================================================================

/// A dated, located life event (birth, death, baptism or marriage).
/// All fields are optional; older records often carry partial dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Event {
    /// Formats the event as `YYYY-MM-DD[ · location]`, with `____` / `__`
    /// placeholders for missing date parts.
    pub fn display_string(&self) -> String {
        let year = match self.year {
            Some(year) => year.to_string(),
            None => "____".to_string(),
        };
        let mut out = format!("{}-{}-{}", year, pad2(self.month), pad2(self.day));
        if let Some(location) = &self.location {
            out.push_str(" · ");
            out.push_str(location);
        }
        out
    }
}

fn pad2(part: Option<u32>) -> String {
    match part {
        Some(number) => format!("{:02}", number),
        None => "__".to_string(),
    }
}

// ============================================================================
// Person
// ============================================================================

/// One person record as stored in the databases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    /// Path-encoded identifier relative to ego; `""` is ego itself.
    pub id: String,
    /// Given names, space-separated.
    pub firstnames: String,
    /// Family name.
    pub name: String,
    /// Family name at birth, if different.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baptism: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marriage: Option<Event>,
}

impl Person {
    /// A person with a recorded death event is dead, everyone else counts
    /// as alive.
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Display form of the identifier; ego's empty identifier reads as `ego`.
    pub fn display_id(&self) -> &str {
        if self.id.is_empty() {
            "ego"
        } else {
            &self.id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}
