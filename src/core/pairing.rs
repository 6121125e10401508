use crate::core::rules::{is_valid_pair, validate_pairs};
use crate::domain::model::{Pair, Participant, Roster};
use crate::utils::error::{Result, SantaError};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_ATTEMPT_BUDGET: usize = 1_000;

/// Randomized greedy matcher with bounded restarts.
///
/// Each attempt shuffles a fresh copy of the roster into a pool of possible
/// giftees, then walks the gifters in roster order taking the first eligible
/// candidate from the pool. An attempt that leaves anyone unpaired is thrown
/// away. After `attempt_budget` failures the run is reported unsatisfiable;
/// a partial pairing is never returned.
pub struct PairingEngine<R: Rng = ChaCha8Rng> {
    rng: R,
    attempt_budget: usize,
}

impl PairingEngine<ChaCha8Rng> {
    /// Nondeterministic seed.
    pub fn new(attempt_budget: usize) -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy(), attempt_budget)
    }

    /// Same seed and roster give the same pairing.
    pub fn seeded(seed: u64, attempt_budget: usize) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), attempt_budget)
    }

    pub fn from_seed_option(seed: Option<u64>, attempt_budget: usize) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed, attempt_budget),
            None => Self::new(attempt_budget),
        }
    }
}

impl Default for PairingEngine<ChaCha8Rng> {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPT_BUDGET)
    }
}

impl<R: Rng> PairingEngine<R> {
    pub fn with_rng(rng: R, attempt_budget: usize) -> Self {
        Self {
            rng,
            attempt_budget,
        }
    }

    pub fn attempt_budget(&self) -> usize {
        self.attempt_budget
    }

    /// One pair per participant, gifters in roster order.
    pub fn create_pairs(&mut self, roster: &Roster) -> Result<Vec<Pair>> {
        for attempt in 1..=self.attempt_budget {
            let pairs = self.attempt(roster);

            if pairs.len() == roster.len() && validate_pairs(&pairs) {
                tracing::debug!("Found a valid pairing on attempt {}", attempt);
                return Ok(pairs);
            }

            tracing::trace!(
                "Attempt {} paired {}/{} participants, retrying",
                attempt,
                pairs.len(),
                roster.len()
            );
        }

        Err(SantaError::UnsatisfiableConstraints {
            attempts: self.attempt_budget,
            participants: roster.len(),
        })
    }

    fn attempt(&mut self, roster: &Roster) -> Vec<Pair> {
        let mut possible_giftees: Vec<&Participant> = roster.iter().collect();
        possible_giftees.shuffle(&mut self.rng);

        let mut pairs = Vec::with_capacity(roster.len());
        for gifter in roster {
            if let Some(giftee) = take_first_valid(gifter, &mut possible_giftees) {
                pairs.push(Pair::new(gifter.clone(), giftee.clone()));
            }
        }
        pairs
    }
}

/// Removes and returns the first pool entry `gifter` may give to.
fn take_first_valid<'a>(
    gifter: &Participant,
    possible_giftees: &mut Vec<&'a Participant>,
) -> Option<&'a Participant> {
    let index = possible_giftees
        .iter()
        .position(|candidate| is_valid_pair(gifter, candidate))?;
    Some(possible_giftees.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn four_person_roster() -> Roster {
        Roster::new(vec![
            Participant::new("John", "Doe")
                .with_email("fake1@gmail.com")
                .with_previous_recipient("Linda German"),
            Participant::new("Brenda", "Doe")
                .with_email("fake2@gmail.com")
                .with_previous_recipient("Bill German"),
            Participant::new("Linda", "German")
                .with_email("fake3@gmail.com")
                .with_previous_recipient("Brenda Doe"),
            Participant::new("Bill", "German")
                .with_email("fake4@gmail.com")
                .with_previous_recipient("John Doe"),
        ])
    }

    fn random_families(count: usize) -> Roster {
        let entries = (0..count)
            .map(|i| {
                Participant::new(format!("First{}", i), format!("Family{}", i % (count / 2 + 1)))
                    .with_email(format!("p{}@example.com", i))
            })
            .collect();
        Roster::new(entries)
    }

    fn assert_bijection(roster: &Roster, pairs: &[Pair]) {
        assert_eq!(pairs.len(), roster.len());
        let gifters: Vec<&Participant> = pairs.iter().map(|p| &p.gifter).collect();
        let expected: Vec<&Participant> = roster.iter().collect();
        assert_eq!(gifters, expected, "gifters should follow roster order");

        let giftees: HashSet<String> = pairs.iter().map(|p| p.giftee.full_name()).collect();
        let everyone: HashSet<String> = roster.iter().map(|p| p.full_name()).collect();
        assert_eq!(giftees, everyone);
    }

    #[test]
    fn test_four_person_roster_pairs_across_families() {
        let roster = four_person_roster();
        for seed in 0..50 {
            let mut engine = PairingEngine::seeded(seed, DEFAULT_ATTEMPT_BUDGET);
            let pairs = engine.create_pairs(&roster).unwrap();

            assert_bijection(&roster, &pairs);
            for pair in &pairs {
                assert_ne!(pair.gifter.last_name, pair.giftee.last_name);
                assert_ne!(pair.gifter, pair.giftee);
                assert_ne!(
                    pair.gifter.previous_recipient(),
                    Some(pair.giftee.full_name().as_str())
                );
                if pair.gifter.full_name() == "John Doe" {
                    assert_eq!(pair.giftee.full_name(), "Bill German");
                }
            }
        }
    }

    #[test]
    fn test_pairs_satisfy_every_rule() {
        let roster = random_families(12);
        let mut engine = PairingEngine::seeded(7, DEFAULT_ATTEMPT_BUDGET);
        let pairs = engine.create_pairs(&roster).unwrap();

        assert_bijection(&roster, &pairs);
        assert!(pairs.iter().all(|p| is_valid_pair(&p.gifter, &p.giftee)));
    }

    #[test]
    fn test_same_seed_same_pairing() {
        let roster = random_families(10);
        let first = PairingEngine::seeded(2024, DEFAULT_ATTEMPT_BUDGET)
            .create_pairs(&roster)
            .unwrap();
        let second = PairingEngine::seeded(2024, DEFAULT_ATTEMPT_BUDGET)
            .create_pairs(&roster)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_family_is_unsatisfiable() {
        let roster = Roster::new(vec![
            Participant::new("John", "Doe"),
            Participant::new("Jane", "Doe"),
        ]);
        let mut engine = PairingEngine::seeded(1, 25);

        match engine.create_pairs(&roster) {
            Err(SantaError::UnsatisfiableConstraints {
                attempts,
                participants,
            }) => {
                assert_eq!(attempts, 25);
                assert_eq!(participants, 2);
            }
            other => panic!("expected UnsatisfiableConstraints, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_budget_fails_without_attempting() {
        let mut engine = PairingEngine::seeded(1, 0);
        assert!(engine.create_pairs(&four_person_roster()).is_err());
    }

    #[test]
    fn test_empty_roster_yields_empty_pairing() {
        let mut engine = PairingEngine::seeded(1, 1);
        let pairs = engine.create_pairs(&Roster::default()).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_take_first_valid_removes_candidate() {
        let roster = four_person_roster();
        let john = &roster.participants()[0];
        let mut pool: Vec<&Participant> = roster.iter().collect();

        let giftee = take_first_valid(john, &mut pool).unwrap();
        assert_eq!(giftee.full_name(), "Bill German");
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|p| p.full_name() != "Bill German"));
    }

    #[test]
    fn test_take_first_valid_leaves_pool_when_nothing_fits() {
        let roster = four_person_roster();
        let john = &roster.participants()[0];
        let mut pool: Vec<&Participant> = roster.iter().take(3).collect();

        // only Does and Linda (last year's recipient) left
        assert!(take_first_valid(john, &mut pool).is_none());
        assert_eq!(pool.len(), 3);
    }
}
