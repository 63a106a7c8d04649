//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod announcement;
pub mod dashboard;
pub mod event;
pub mod poll;
pub mod validation;

pub use announcement::{NewAnnouncement, Priority};
pub use dashboard::{DashboardCounts, StatCard};
pub use event::{Event, EventInput, EventPatch, EventStatus, NewEvent};
pub use poll::{NewPoll, PollStatus};
pub use validation::ValidationError;
