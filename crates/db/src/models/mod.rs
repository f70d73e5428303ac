mod meeting;
mod monitoring;
mod participant;
mod schedule;

pub use meeting::{Meeting, MeetingStatus, MeetingType};
pub use monitoring::MonitoringSession;
pub use participant::{MeetingParticipant, ParticipantRole};
pub use schedule::{CalendarMeeting, ScheduledMeeting};
