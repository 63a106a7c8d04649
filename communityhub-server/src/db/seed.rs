//! Sample data for local development

use chrono::{Duration, Utc};
use sqlx::MySqlPool;

use super::repos::{AnnouncementRepo, DbError, EventRepo, PollRepo};
use crate::models::{
    EventStatus, NewAnnouncement, NewEvent, NewPoll, PollStatus, Priority, ValidationError,
};

/// Rows inserted by [`run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub events: usize,
    pub polls: usize,
    pub announcements: usize,
}

/// Sample events relative to `now`: two ahead, one in the past.
pub fn sample_events() -> Vec<NewEvent> {
    let now = Utc::now();

    vec![
        NewEvent {
            title: "Community Meetup".into(),
            description: Some(
                "Monthly gathering for all community members to network and share ideas.".into(),
            ),
            date: now + Duration::days(7),
            location: Some("Community Hall A".into()),
            event_type: "Social".into(),
            status: EventStatus::Upcoming,
        },
        NewEvent {
            title: "Tech Talk: Web Development".into(),
            description: Some("A deep dive into the latest web technologies.".into()),
            date: now + Duration::days(14),
            location: Some("Online (Zoom)".into()),
            event_type: "Workshop".into(),
            status: EventStatus::Upcoming,
        },
        NewEvent {
            title: "Annual Gala".into(),
            description: Some("Celebrating our achievements over the past year.".into()),
            date: now - Duration::days(30),
            location: Some("Grand Hotel Ballroom".into()),
            event_type: "Social".into(),
            status: EventStatus::Past,
        },
    ]
}

/// One open poll and one that closed two days ago.
pub fn sample_polls() -> Result<Vec<NewPoll>, ValidationError> {
    let now = Utc::now();

    Ok(vec![
        NewPoll::new(
            "What should be the theme for our next hackathon?",
            PollStatus::Active,
            Some(now + Duration::days(5)),
        )?,
        NewPoll::new(
            "Best time for weekly meetings?",
            PollStatus::Closed,
            Some(now - Duration::days(2)),
        )?,
    ])
}

pub fn sample_announcements() -> Result<Vec<NewAnnouncement>, ValidationError> {
    Ok(vec![
        NewAnnouncement::new(
            "Welcome to the New Dashboard!",
            "We are excited to launch our new community dashboard. \
             Explore the new features and let us know what you think.",
            Priority::High,
        )?,
        NewAnnouncement::new(
            "Maintenance Scheduled",
            "The platform will be undergoing scheduled maintenance on Sunday from 2 AM to 4 AM.",
            Priority::Medium,
        )?,
    ])
}

/// Insert the sample rows, optionally clearing existing ones first.
pub async fn run(pool: &MySqlPool, reset: bool) -> Result<SeedSummary, DbError> {
    let events = EventRepo::new(pool);
    let polls = PollRepo::new(pool);
    let announcements = AnnouncementRepo::new(pool);

    if reset {
        let removed = events.clear().await? + polls.clear().await? + announcements.clear().await?;
        tracing::info!(removed, "Cleared existing sample data");
    }

    let invalid = |e: ValidationError| DbError::InvalidRow {
        table: "seed",
        reason: e.to_string(),
    };
    let sample_polls = sample_polls().map_err(invalid)?;
    let sample_announcements = sample_announcements().map_err(invalid)?;

    let mut summary = SeedSummary::default();
    for event in sample_events() {
        events.create(event).await?;
        summary.events += 1;
    }
    for poll in &sample_polls {
        polls.create(poll).await?;
        summary.polls += 1;
    }
    for announcement in &sample_announcements {
        announcements.create(announcement).await?;
        summary.announcements += 1;
    }

    tracing::info!(
        events = summary.events,
        polls = summary.polls,
        announcements = summary.announcements,
        "Seeded sample data"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_cover_upcoming_and_past() {
        let events = sample_events();
        let now = Utc::now();
        assert!(events
            .iter()
            .filter(|e| e.status == EventStatus::Upcoming)
            .all(|e| e.date > now));
        assert!(events
            .iter()
            .any(|e| e.status == EventStatus::Past && e.date < now));
    }

    #[test]
    fn exactly_one_sample_poll_is_open() {
        let now = Utc::now();
        let polls = sample_polls().unwrap();
        assert_eq!(polls.iter().filter(|p| p.is_open_at(now)).count(), 1);
    }

    #[test]
    fn sample_announcements_are_valid() {
        let announcements = sample_announcements().unwrap();
        assert_eq!(announcements.len(), 2);
        assert_eq!(announcements[0].priority, Priority::High);
    }

    // Integration test - run with TIDB_HOST set
    #[tokio::test]
    #[ignore = "requires database"]
    async fn reset_seed_feeds_dashboard_counts() {
        use crate::config::{DatabaseConfig, Environment};
        use crate::db::{create_pool, migrations};
        use crate::models::dashboard::NEW_ANNOUNCEMENT_DAYS;

        let mut config = DatabaseConfig::new(Environment::Development);
        config.host = std::env::var("TIDB_HOST").ok();
        config.database = "communityhub_test".into();
        let pool = create_pool(&config);
        migrations::run(&pool).await.expect("migrations failed");

        let summary = run(&pool, true).await.expect("seed failed");
        assert_eq!(summary.polls, 2);

        // Event repo tests share the table
        assert!(EventRepo::new(&pool).count_upcoming().await.unwrap() >= 2);
        assert_eq!(PollRepo::new(&pool).count_active().await.unwrap(), 1);
        assert_eq!(
            AnnouncementRepo::new(&pool)
                .count_recent(NEW_ANNOUNCEMENT_DAYS)
                .await
                .unwrap(),
            2
        );
    }
}
