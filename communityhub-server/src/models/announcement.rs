//! Announcements shown on the dashboard

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{check_len, ValidationError};

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError::InvalidVariant {
                field: "priority",
                value: s.to_owned(),
            }),
        }
    }
}

/// Validated announcement ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub priority: Priority,
}

impl NewAnnouncement {
    /// Title and content are both required.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_owned();
        let content = content.into().trim().to_owned();

        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if content.is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }
        check_len("title", &title, MAX_TITLE_LEN)?;

        Ok(Self {
            title,
            content,
            priority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(ValidationError::InvalidVariant { field: "priority", .. })
        ));
    }

    #[test]
    fn content_is_required() {
        let err = NewAnnouncement::new("Maintenance", "", Priority::Low).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "content" });
    }
}
