use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use crate::models::domain::{split_delimited, Participant};

/// Tags as submitted: either a comma-delimited cell or a JSON list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    Delimited(String),
    List(Vec<String>),
}

impl Default for TagList {
    fn default() -> Self {
        TagList::List(Vec::new())
    }
}

impl TagList {
    pub fn entries(&self) -> Vec<&str> {
        match self {
            TagList::Delimited(raw) => split_delimited(raw).collect(),
            TagList::List(tags) => tags.iter().map(String::as_str).collect(),
        }
    }
}

/// One participant in the canonical input schema.
///
/// Source-specific column mapping happens before this point; history is
/// merged in afterwards from the history store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ParticipantRecord {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub discord: String,
    #[validate(email)]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wishlist: String,
    #[serde(
        alias = "wishlist_tags",
        rename = "wishlistTags",
        default,
        deserialize_with = "null_as_default"
    )]
    pub wishlist_tags: TagList,
    #[serde(
        alias = "blacklist_tags",
        rename = "blacklistTags",
        default,
        deserialize_with = "null_as_default"
    )]
    pub blacklist_tags: TagList,
    #[serde(default)]
    pub references: Option<String>,
}

/// Blank spreadsheet cells arrive as `null`; treat them like absent fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ParticipantRecord {
    /// Build the engine's participant, attaching its previously-assigned set.
    pub fn into_participant(self, previously_assigned: BTreeSet<String>) -> Participant {
        Participant::new(self.name, self.discord, &self.email)
            .with_wishlist(self.wishlist)
            .with_wishlist_tags(self.wishlist_tags.entries())
            .with_blacklist_tags(self.blacklist_tags.entries())
            .with_references(self.references.unwrap_or_default())
            .with_previously_assigned(previously_assigned)
    }
}

/// Request to create a new matching
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMatchingRequest {
    #[validate(length(min = 1), nested)]
    pub participants: Vec<ParticipantRecord>,
}
