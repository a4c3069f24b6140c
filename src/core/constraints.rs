use crate::models::Participant;

/// The rule a candidate pairing broke, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Requester and candidate are the same person.
    SamePerson,
    /// The requester wants a theme the candidate refuses to draw.
    BlacklistedTag,
    /// The candidate already drew for this requester in a past event.
    RepeatPairing,
}

/// Return the first rule a (requester, candidate) pairing breaks, if any.
#[inline]
pub fn first_violation(requester: &Participant, candidate: &Participant) -> Option<Violation> {
    if requester.same_person(candidate) {
        return Some(Violation::SamePerson);
    }

    if !requester.wishlist_tags.is_disjoint(&candidate.blacklist_tags) {
        return Some(Violation::BlacklistedTag);
    }

    if candidate.previously_assigned.contains(&requester.email) {
        return Some(Violation::RepeatPairing);
    }

    None
}

/// Check whether `candidate` may create art for `requester`.
#[inline]
pub fn can_assign(requester: &Participant, candidate: &Participant) -> bool {
    first_violation(requester, candidate).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_participant(handle: &str, wishlist: &[&str], blacklist: &[&str]) -> Participant {
        Participant::new(
            format!("User {}", handle),
            handle,
            format!("{}@example.com", handle),
        )
        .with_wishlist_tags(wishlist.iter().copied())
        .with_blacklist_tags(blacklist.iter().copied())
    }

    #[test]
    fn test_compatible_pair() {
        let requester = create_participant("alice", &["fantasy"], &[]);
        let candidate = create_participant("bob", &["scifi"], &["horror"]);

        assert!(can_assign(&requester, &candidate));
        assert_eq!(first_violation(&requester, &candidate), None);
    }

    #[test]
    fn test_self_assignment_rejected() {
        let alice = create_participant("alice", &[], &[]);
        assert_eq!(first_violation(&alice, &alice), Some(Violation::SamePerson));
    }

    #[test]
    fn test_same_handle_different_email_rejected() {
        let first = create_participant("alice", &[], &[]);
        let mut second = create_participant("ALICE", &[], &[]);
        second.email = "alice.alt@example.com".to_string();

        assert_eq!(first_violation(&first, &second), Some(Violation::SamePerson));
    }

    #[test]
    fn test_blacklisted_tag_rejected() {
        let requester = create_participant("alice", &["fantasy", "mecha"], &[]);
        let candidate = create_participant("bob", &[], &["Mecha"]);

        assert_eq!(
            first_violation(&requester, &candidate),
            Some(Violation::BlacklistedTag)
        );
    }

    #[test]
    fn test_blacklist_is_directional() {
        // Only the requester's wishlist against the candidate's blacklist matters
        let requester = create_participant("alice", &[], &["fantasy"]);
        let candidate = create_participant("bob", &["fantasy"], &[]);

        assert!(can_assign(&requester, &candidate));
    }

    #[test]
    fn test_repeat_pairing_rejected() {
        let requester = create_participant("alice", &[], &[]);
        let candidate =
            create_participant("bob", &[], &[]).with_previously_assigned(["Alice@Example.com"]);

        assert_eq!(
            first_violation(&requester, &candidate),
            Some(Violation::RepeatPairing)
        );
        // The reverse direction is still allowed
        assert!(can_assign(&candidate, &requester));
    }

    #[test]
    fn test_check_is_idempotent() {
        let requester = create_participant("alice", &["fantasy"], &[]);
        let candidate = create_participant("bob", &[], &["fantasy"]);
        let before = (requester.clone(), candidate.clone());

        let first = can_assign(&requester, &candidate);
        let second = can_assign(&requester, &candidate);

        assert_eq!(first, second);
        assert_eq!((requester, candidate), before);
    }
}
