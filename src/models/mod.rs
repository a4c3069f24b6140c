// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{normalize_tags, AttemptOutcome, Pairing, Participant, Roster};
pub use requests::{CreateMatchingRequest, ParticipantRecord, TagList};
pub use responses::{ConfirmResponse, ErrorResponse, HealthResponse, MatchResponse, MatchingDetailsResponse};
