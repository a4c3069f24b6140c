use serde::{Deserialize, Serialize};

use crate::models::{AttemptOutcome, Pairing, Participant};

/// Identity of a participant who could not be placed.
///
/// Deliberately carries no wishlist or blacklist data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedParticipant {
    pub name: String,
    pub email: String,
    pub discord: String,
}

impl From<&Participant> for UnmatchedParticipant {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.clone(),
            email: participant.email.clone(),
            discord: participant.discord.clone(),
        }
    }
}

/// Summary of a matching run for callers that only need counts and failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub success: bool,
    pub matched_count: usize,
    pub total_count: usize,
    pub unmatched: Vec<UnmatchedParticipant>,
}

impl MatchReport {
    pub fn from_outcome(outcome: &AttemptOutcome, total_count: usize) -> Self {
        debug_assert_eq!(
            outcome.matched_count() + outcome.unpaired().len(),
            total_count,
            "every participant is either paired or unpaired"
        );

        Self {
            success: outcome.success(),
            matched_count: outcome.matched_count(),
            total_count,
            unmatched: outcome
                .unpaired()
                .iter()
                .map(|p| UnmatchedParticipant::from(p.as_ref()))
                .collect(),
        }
    }
}

/// Message sent to each artist with their assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplate {
    pub check_in_date: String,
    pub due_date: String,
}

impl Default for NotificationTemplate {
    fn default() -> Self {
        Self {
            check_in_date: "March 21st".to_string(),
            due_date: "Friday April 4th at Midnight".to_string(),
        }
    }
}

impl NotificationTemplate {
    pub fn new(check_in_date: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            check_in_date: check_in_date.into(),
            due_date: due_date.into(),
        }
    }

    pub fn render(&self, requester: &Participant, assignee: &Participant) -> String {
        format!(
            "Hello {assignee}! You've been assigned {requester}'s request. \
             Here is the prompt: {prompt}. \
             And here are the provided reference pics: {references}. \
             The first check-in will be on **{check_in}**. \
             Art will be due by **{due}**. \
             Let us know if you have any questions, good luck and have fun! \
             Please respond or react to this message so we know it's been received!",
            assignee = assignee.name,
            requester = requester.name,
            prompt = requester.wishlist,
            references = requester.references,
            check_in = self.check_in_date,
            due = self.due_date,
        )
    }
}

/// One row of the assignment export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "Requestor Name")]
    pub requester_name: String,
    #[serde(rename = "Requestor Discord")]
    pub requester_discord: String,
    #[serde(rename = "Assignee Name")]
    pub assignee_name: String,
    #[serde(rename = "Assignee Discord")]
    pub assignee_discord: String,
    #[serde(rename = "Prompt")]
    pub prompt: String,
    #[serde(rename = "References")]
    pub references: String,
    #[serde(rename = "Intro Message")]
    pub intro_message: String,
}

/// Build export rows for every pairing, in requester processing order.
pub fn export_records(
    pairings: &[Pairing],
    template: &NotificationTemplate,
) -> Vec<ExportRecord> {
    pairings
        .iter()
        .map(|pairing| {
            let requester = pairing.requester.as_ref();
            let assignee = pairing.recipient.as_ref();
            ExportRecord {
                requester_name: requester.name.clone(),
                requester_discord: requester.discord.clone(),
                assignee_name: assignee.name.clone(),
                assignee_discord: assignee.discord.clone(),
                prompt: requester.wishlist.clone(),
                references: requester.references.clone(),
                intro_message: template.render(requester, assignee),
            }
        })
        .collect()
}
