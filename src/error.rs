use thiserror::Error;

/// Contract violations detected before or while setting up a matching run.
///
/// An infeasible roster is not one of these: a run that leaves people
/// unpaired still completes and reports them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Roster is empty")]
    EmptyRoster,

    #[error("Duplicate participant e-mail: {0}")]
    DuplicateEmail(String),

    #[error("Duplicate participant handle: {0}")]
    DuplicateHandle(String),

    #[error("Retry budget must allow at least one attempt")]
    ZeroAttemptBudget,
}
