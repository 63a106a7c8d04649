//! Dashboard summary cards

use serde::Serialize;

/// Days an announcement still counts as new
pub const NEW_ANNOUNCEMENT_DAYS: u32 = 7;

/// Members have no table of their own; the figure is fixed.
const TOTAL_MEMBERS: &str = "1,245";

/// One summary card on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub icon: &'static str,
    pub color: &'static str,
}

impl StatCard {
    fn new(title: &'static str, value: impl Into<String>, icon: &'static str) -> Self {
        Self {
            title,
            value: value.into(),
            icon,
            color: "primary",
        }
    }
}

/// Live counts behind the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub upcoming_events: i64,
    pub active_polls: i64,
    pub new_announcements: i64,
}

/// Cards in display order.
pub fn dashboard_cards(counts: &DashboardCounts) -> Vec<StatCard> {
    vec![
        StatCard::new("Total Members", TOTAL_MEMBERS, "PeopleIcon"),
        StatCard::new(
            "Upcoming Events",
            counts.upcoming_events.to_string(),
            "EventIcon",
        ),
        StatCard::new("Active Polls", counts.active_polls.to_string(), "PollIcon"),
        StatCard::new(
            "New Announcements",
            counts.new_announcements.to_string(),
            "AnnouncementIcon",
        ),
    ]
}
