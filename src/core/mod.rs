// Core algorithm exports
pub mod constraints;
pub mod matcher;
pub mod report;

pub use constraints::{can_assign, first_violation, Violation};
pub use matcher::{Matcher, MatchRun, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use report::{export_records, ExportRecord, MatchReport, NotificationTemplate, UnmatchedParticipant};
