use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::error::MatchError;

/// One person's submission for an art exchange event.
///
/// Every participant plays both roles in a run: a requester whose wishlist
/// needs fulfilling, and a potential artist for somebody else's wishlist.
///
/// Tag and history fields are sets. Construct through [`Participant::new`] and
/// the `with_*` builders so values are normalized consistently: tags and
/// e-mail addresses are trimmed and lower-cased, empty entries are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub discord: String,
    pub email: String,
    pub wishlist: String,
    pub wishlist_tags: BTreeSet<String>,
    pub blacklist_tags: BTreeSet<String>,
    pub references: String,
    /// E-mails of the requesters this participant has already drawn for.
    pub previously_assigned: BTreeSet<String>,
}

impl Participant {
    pub fn new(
        name: impl Into<String>,
        discord: impl Into<String>,
        email: impl AsRef<str>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            discord: discord.into().trim().to_string(),
            email: normalize_email(email.as_ref()),
            wishlist: String::new(),
            wishlist_tags: BTreeSet::new(),
            blacklist_tags: BTreeSet::new(),
            references: String::new(),
            previously_assigned: BTreeSet::new(),
        }
    }

    pub fn with_wishlist(mut self, wishlist: impl Into<String>) -> Self {
        self.wishlist = wishlist.into().trim().to_string();
        self
    }

    pub fn with_wishlist_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.wishlist_tags = normalize_tags(tags);
        self
    }

    pub fn with_blacklist_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blacklist_tags = normalize_tags(tags);
        self
    }

    pub fn with_references(mut self, references: impl Into<String>) -> Self {
        self.references = references.into().trim().to_string();
        self
    }

    pub fn with_previously_assigned<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.previously_assigned = emails
            .into_iter()
            .map(|email| normalize_email(email.as_ref()))
            .filter(|email| !email.is_empty())
            .collect();
        self
    }

    /// Two records describe the same person when their handles match,
    /// regardless of what e-mail each was submitted with.
    #[inline]
    pub fn same_person(&self, other: &Participant) -> bool {
        self.discord.eq_ignore_ascii_case(&other.discord)
    }
}

/// Normalize free-form tags into a set: trimmed, lower-cased, no empties.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Split a comma-delimited cell ("fantasy, Sci-Fi,,horror") into its entries.
pub fn split_delimited(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A validated, read-only set of participants for one matching run.
///
/// Order is significant: requesters are processed in roster order.
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<Arc<Participant>>,
}

impl Roster {
    /// Validate and freeze a roster.
    ///
    /// Rejects an empty roster and any two participants sharing an e-mail
    /// or a handle.
    pub fn new(participants: Vec<Participant>) -> Result<Self, MatchError> {
        if participants.is_empty() {
            return Err(MatchError::EmptyRoster);
        }

        let mut emails = HashSet::with_capacity(participants.len());
        let mut handles = HashSet::with_capacity(participants.len());
        for participant in &participants {
            if !emails.insert(participant.email.as_str()) {
                return Err(MatchError::DuplicateEmail(participant.email.clone()));
            }
            if !handles.insert(participant.discord.to_ascii_lowercase()) {
                return Err(MatchError::DuplicateHandle(participant.discord.clone()));
            }
        }

        Ok(Self {
            participants: participants.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Participant>> {
        self.participants.iter()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Arc<Participant>;
    type IntoIter = std::slice::Iter<'a, Arc<Participant>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One committed assignment: `recipient` creates art for `requester`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub requester: Arc<Participant>,
    pub recipient: Arc<Participant>,
}

/// The result of one randomized pass over the roster.
///
/// Pairings and unpaired requesters are both in requester processing order.
/// Outcomes are never mutated after construction; every attempt builds a new one.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pairings: Vec<Pairing>,
    unpaired: Vec<Arc<Participant>>,
}

impl AttemptOutcome {
    pub(crate) fn new(pairings: Vec<Pairing>, unpaired: Vec<Arc<Participant>>) -> Self {
        Self { pairings, unpaired }
    }

    pub fn success(&self) -> bool {
        self.unpaired.is_empty()
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn unpaired(&self) -> &[Arc<Participant>] {
        &self.unpaired
    }

    pub fn matched_count(&self) -> usize {
        self.pairings.len()
    }

    pub fn into_pairings(self) -> Vec<Pairing> {
        self.pairings
    }
}
