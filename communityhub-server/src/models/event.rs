//! Community events
//!
//! Request bodies arrive as [`EventInput`] and are validated into either a
//! [`NewEvent`] (create) or an [`EventPatch`] (update).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{check_len, non_blank, ValidationError};

/// Matches the VARCHAR(255) columns
const MAX_FIELD_LEN: usize = 255;

pub const DEFAULT_EVENT_TYPE: &str = "General";

/// Lifecycle of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Past,
    Draft,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Past => "past",
            Self::Draft => "draft",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "past" | "completed" => Ok(Self::Past),
            "draft" => Ok(Self::Draft),
            _ => Err(ValidationError::InvalidVariant {
                field: "status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Stored event, serialized the way the frontend expects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create/update body
#[derive(Debug, Default, Deserialize)]
pub struct EventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub status: Option<String>,
}

/// Validated event ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub event_type: String,
    pub status: EventStatus,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub status: Option<EventStatus>,
}

impl EventInput {
    /// Validate a create request. `title` and `date` are required.
    pub fn into_new_event(self) -> Result<NewEvent, ValidationError> {
        let patch = self.into_patch()?;

        let title = patch.title.ok_or(ValidationError::Empty { field: "title" })?;
        let date = patch.date.ok_or(ValidationError::Empty { field: "date" })?;

        Ok(NewEvent {
            title,
            description: patch.description,
            date,
            location: patch.location,
            event_type: patch
                .event_type
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            status: patch.status.unwrap_or_default(),
        })
    }

    /// Validate an update request. Blank fields count as absent.
    pub fn into_patch(self) -> Result<EventPatch, ValidationError> {
        let title = non_blank(self.title);
        let location = non_blank(self.location);
        let event_type = non_blank(self.event_type);

        if let Some(title) = &title {
            check_len("title", title, MAX_FIELD_LEN)?;
        }
        if let Some(location) = &location {
            check_len("location", location, MAX_FIELD_LEN)?;
        }
        if let Some(event_type) = &event_type {
            check_len("type", event_type, MAX_FIELD_LEN)?;
        }

        let date = non_blank(self.date)
            .map(|d| parse_event_date(&d))
            .transpose()?;
        let status = non_blank(self.status)
            .map(|s| s.parse::<EventStatus>())
            .transpose()?;

        Ok(EventPatch {
            title,
            description: non_blank(self.description),
            date,
            location,
            event_type,
            status,
        })
    }
}

impl EventPatch {
    /// Overwrite the fields present in this patch.
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = Some(location);
        }
        if let Some(event_type) = self.event_type {
            event.event_type = event_type;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
    }
}

/// Parse an ISO 8601 date or date-time. Naive values are taken as UTC;
/// a bare date means midnight.
pub fn parse_event_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or(ValidationError::InvalidFormat {
            field: "date",
            reason: "expected an ISO 8601 date or date-time",
        })
}
