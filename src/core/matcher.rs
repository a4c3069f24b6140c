use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::constraints::can_assign;
use crate::error::MatchError;
use crate::models::{AttemptOutcome, Pairing, Participant, Roster};

/// Attempt budget used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// How much effort a run may spend before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Optional wall-clock cap, checked between attempts.
    pub time_limit: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            time_limit: None,
        }
    }
}

/// Result of a full matching run
#[derive(Debug, Clone)]
pub struct MatchRun {
    /// The last attempt produced. Earlier attempts are discarded, even ones
    /// that placed more people.
    pub outcome: AttemptOutcome,
    pub attempts_used: u32,
    pub elapsed: Duration,
}

/// Randomized assignment engine.
///
/// # Algorithm
/// 1. Shuffle a copy of the roster into a pool of available artists
/// 2. Walk requesters in roster order, giving each the first legal artist in the pool
/// 3. Requesters with no legal artist left are recorded as unpaired
/// 4. Repeat with a fresh shuffle until everyone is paired or the budget runs out
///
/// There is no backtracking inside a pass; reshuffling is the only search.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    policy: RetryPolicy,
}

impl Matcher {
    pub fn new(policy: RetryPolicy) -> Result<Self, MatchError> {
        if policy.max_attempts == 0 {
            return Err(MatchError::ZeroAttemptBudget);
        }
        Ok(Self { policy })
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: RetryPolicy::default(),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// One greedy pass over the roster with a freshly shuffled artist pool.
    pub fn single_pass<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> AttemptOutcome {
        let mut available: Vec<Arc<Participant>> = roster.iter().cloned().collect();
        available.shuffle(rng);

        let mut pairings = Vec::with_capacity(roster.len());
        let mut unpaired = Vec::new();

        for requester in roster {
            match available
                .iter()
                .position(|candidate| can_assign(requester, candidate))
            {
                Some(idx) => {
                    // Vec::remove keeps the remaining pool in shuffled order
                    let recipient = available.remove(idx);
                    pairings.push(Pairing {
                        requester: Arc::clone(requester),
                        recipient,
                    });
                }
                None => unpaired.push(Arc::clone(requester)),
            }
        }

        AttemptOutcome::new(pairings, unpaired)
    }

    /// Run with the thread-local RNG.
    pub fn run(&self, roster: &Roster) -> MatchRun {
        self.run_with_rng(roster, &mut rand::thread_rng())
    }

    /// Repeat single passes until one pairs everybody or the budget is spent.
    ///
    /// Always returns the final attempt, successful or not.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, roster: &Roster, rng: &mut R) -> MatchRun {
        let started = Instant::now();
        let mut attempts_used = 0;

        loop {
            attempts_used += 1;
            let outcome = Self::single_pass(roster, rng);

            tracing::debug!(
                attempt = attempts_used,
                matched = outcome.matched_count(),
                unpaired = outcome.unpaired().len(),
                "Matching attempt finished"
            );

            let out_of_time = self
                .policy
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit);

            if outcome.success() || attempts_used >= self.policy.max_attempts || out_of_time {
                let elapsed = started.elapsed();

                if outcome.success() {
                    tracing::info!(
                        "Matched all {} participants after {} attempt(s) in {:?}",
                        roster.len(),
                        attempts_used,
                        elapsed
                    );
                } else {
                    tracing::warn!(
                        "Gave up after {} attempt(s): {} of {} participants unpaired",
                        attempts_used,
                        outcome.unpaired().len(),
                        roster.len()
                    );
                }

                return MatchRun {
                    outcome,
                    attempts_used,
                    elapsed,
                };
            }
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn create_participant(handle: &str, wishlist: &[&str], blacklist: &[&str]) -> Participant {
        Participant::new(
            format!("User {}", handle),
            handle,
            format!("{}@example.com", handle),
        )
        .with_wishlist_tags(wishlist.iter().copied())
        .with_blacklist_tags(blacklist.iter().copied())
    }

    fn open_roster(size: usize) -> Roster {
        Roster::new(
            (0..size)
                .map(|i| create_participant(&format!("p{}", i), &[], &[]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_pass_pairs_everyone_in_open_roster() {
        let roster = open_roster(6);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        // An open roster can still strand the last requester on themself,
        // so look for a successful pass among a few seeds.
        let outcome = (0..20)
            .map(|_| Matcher::single_pass(&roster, &mut rng))
            .find(|o| o.success())
            .expect("an open roster should pair within 20 passes");

        assert_eq!(outcome.matched_count(), 6);
        assert!(outcome.unpaired().is_empty());
    }

    #[test]
    fn test_pairings_follow_roster_order() {
        let roster = open_roster(8);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let outcome = Matcher::single_pass(&roster, &mut rng);

        let order: Vec<&str> = roster.iter().map(|p| p.discord.as_str()).collect();
        let mut expected = order.iter();
        for pairing in outcome.pairings() {
            // Each committed requester appears later in the roster than the previous one
            assert!(expected.any(|h| *h == pairing.requester.discord));
        }
    }

    #[test]
    fn test_recipients_consumed_once() {
        let roster = open_roster(10);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..50 {
            let outcome = Matcher::single_pass(&roster, &mut rng);
            let mut seen = HashSet::new();
            for pairing in outcome.pairings() {
                assert!(seen.insert(pairing.recipient.email.clone()));
                assert!(!pairing.requester.same_person(&pairing.recipient));
            }
            assert_eq!(outcome.matched_count() + outcome.unpaired().len(), 10);
        }
    }

    #[test]
    fn test_single_participant_is_unpaired() {
        let roster = Roster::new(vec![create_participant("solo", &[], &[])]).unwrap();
        let matcher = Matcher::new(RetryPolicy {
            max_attempts: 5,
            time_limit: None,
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let run = matcher.run_with_rng(&roster, &mut rng);

        assert!(!run.outcome.success());
        assert_eq!(run.attempts_used, 5);
        assert!(run.outcome.pairings().is_empty());
        assert_eq!(run.outcome.unpaired()[0].discord, "solo");
    }

    #[test]
    fn test_infeasible_pair_exhausts_budget() {
        let roster = Roster::new(vec![
            create_participant("a", &["fantasy"], &["scifi"]),
            create_participant("b", &["scifi"], &["fantasy"]),
        ])
        .unwrap();
        let matcher = Matcher::with_default_policy();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let run = matcher.run_with_rng(&roster, &mut rng);

        assert!(!run.outcome.success());
        assert_eq!(run.attempts_used, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(run.outcome.unpaired().len(), 2);
    }

    #[test]
    fn test_stops_at_first_success() {
        let roster = open_roster(4);
        let matcher = Matcher::new(RetryPolicy {
            max_attempts: 1_000,
            time_limit: None,
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let run = matcher.run_with_rng(&roster, &mut rng);

        assert!(run.outcome.success());
        assert!(run.attempts_used < 1_000);
    }

    #[test]
    fn test_time_limit_cuts_run_short() {
        let roster = Roster::new(vec![create_participant("solo", &[], &[])]).unwrap();
        let matcher = Matcher::new(RetryPolicy {
            max_attempts: u32::MAX,
            time_limit: Some(Duration::ZERO),
        })
        .unwrap();

        let run = matcher.run(&roster);

        assert_eq!(run.attempts_used, 1);
        assert!(!run.outcome.success());
    }

    #[test]
    fn test_zero_budget_rejected() {
        let result = Matcher::new(RetryPolicy {
            max_attempts: 0,
            time_limit: None,
        });
        assert_eq!(result.unwrap_err(), MatchError::ZeroAttemptBudget);
    }
}
