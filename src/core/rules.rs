//! Pairing constraints shared by the matcher and the roster checks.

use crate::domain::model::{Pair, Participant, Roster};
use crate::utils::error::{Result, SantaError};
use std::collections::HashSet;
use std::fmt;

/// Whether `gifter` may give to `giftee`.
///
/// Directional: the previous-recipient rule only looks at the gifter.
pub fn is_valid_pair(gifter: &Participant, giftee: &Participant) -> bool {
    // same family
    if gifter.last_name == giftee.last_name {
        return false;
    }
    // last year's recipient
    if gifter.previous_recipient() == Some(giftee.full_name().as_str()) {
        return false;
    }
    // same person
    if gifter == giftee {
        return false;
    }
    true
}

/// Checks every declared previous recipient against the other participants.
pub fn validate_roster(roster: &Roster) -> Result<()> {
    let participants = roster.participants();

    for (index, participant) in participants.iter().enumerate() {
        let Some(previous) = participant.previous_recipient() else {
            continue;
        };
        let found = participants
            .iter()
            .enumerate()
            .any(|(other, candidate)| other != index && candidate.full_name() == previous);
        if !found {
            return Err(SantaError::UnknownPreviousRecipient {
                participant: participant.full_name(),
                previous_recipient: previous.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for participant in participants {
        if !seen.insert(participant) {
            tracing::warn!(
                "⚠️ {} appears more than once in the roster",
                participant.full_name()
            );
        }
    }

    Ok(())
}

/// All pairs valid and no giftee assigned twice.
///
/// Completeness (one pair per participant) is the caller's check.
pub fn validate_pairs(pairs: &[Pair]) -> bool {
    let mut giftees = HashSet::with_capacity(pairs.len());
    for pair in pairs {
        if !is_valid_pair(&pair.gifter, &pair.giftee) {
            return false;
        }
        if !giftees.insert(pair.giftee.full_name()) {
            return false;
        }
    }
    true
}

/// Upper bound on the number of pairings, for operator visibility.
///
/// Product over every giftee of the number of eligible gifters. It ignores
/// that a gifter can only be used once, so it overcounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermutationCount {
    value: u128,
    saturated: bool,
}

impl PermutationCount {
    pub fn value(&self) -> u128 {
        self.value
    }

    /// The true product exceeded `u128::MAX`.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl fmt::Display for PermutationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.saturated {
            write!(f, "more than {}", group_thousands(self.value))
        } else {
            f.write_str(&group_thousands(self.value))
        }
    }
}

pub fn count_valid_permutations(roster: &Roster) -> PermutationCount {
    let mut value: u128 = 1;
    let mut saturated = false;

    for giftee in roster {
        let eligible = roster
            .iter()
            .filter(|gifter| is_valid_pair(gifter, giftee))
            .count() as u128;

        match value.checked_mul(eligible) {
            Some(next) => value = next,
            None => {
                value = u128::MAX;
                saturated = true;
            }
        }
    }

    // a zero factor wins over an earlier overflow
    if value == 0 {
        saturated = false;
    }

    PermutationCount { value, saturated }
}

/// `1296000` -> `1,296,000`
pub fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
