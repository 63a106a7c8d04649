//! Community polls

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{check_len, ValidationError};

const MAX_QUESTION_LEN: usize = 255;

/// Whether a poll still accepts votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PollStatus {
    #[default]
    Active,
    Closed,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Closed => "Closed",
        }
    }
}

impl FromStr for PollStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(ValidationError::InvalidVariant {
                field: "status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Validated poll ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoll {
    pub question: String,
    pub status: PollStatus,
    /// Open-ended when absent
    pub end_date: Option<DateTime<Utc>>,
}

impl NewPoll {
    pub fn new(
        question: impl Into<String>,
        status: PollStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let question = question.into().trim().to_owned();
        if question.is_empty() {
            return Err(ValidationError::Empty { field: "question" });
        }
        check_len("question", &question, MAX_QUESTION_LEN)?;

        Ok(Self {
            question,
            status,
            end_date,
        })
    }

    /// Active and not past its end date.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PollStatus::Active && self.end_date.map_or(true, |end| end >= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn status_parses_either_case() {
        assert_eq!("Active".parse::<PollStatus>().unwrap(), PollStatus::Active);
        assert_eq!("closed".parse::<PollStatus>().unwrap(), PollStatus::Closed);
        assert!("pending".parse::<PollStatus>().is_err());
    }

    #[test]
    fn question_is_required() {
        let err = NewPoll::new("  ", PollStatus::Active, None).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "question" });
    }

    #[test]
    fn open_polls_are_active_and_unexpired() {
        let now = Utc::now();
        let open = NewPoll::new("Theme?", PollStatus::Active, Some(now + Duration::days(1))).unwrap();
        let expired = NewPoll::new("Theme?", PollStatus::Active, Some(now - Duration::days(1))).unwrap();
        let closed = NewPoll::new("Theme?", PollStatus::Closed, None).unwrap();
        let open_ended = NewPoll::new("Theme?", PollStatus::Active, None).unwrap();

        assert!(open.is_open_at(now));
        assert!(!expired.is_open_at(now));
        assert!(!closed.is_open_at(now));
        assert!(open_ended.is_open_at(now));
    }
}
