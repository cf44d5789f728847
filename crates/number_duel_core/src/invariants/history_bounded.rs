//! History bound invariant: no player exceeds the guess budget.

use super::Invariant;
use crate::round::Round;
use crate::types::{MAX_GUESSES, PlayerId};

/// Invariant: each player's history holds at most [`MAX_GUESSES`] entries.
pub struct HistoryBoundedInvariant;

impl Invariant<Round> for HistoryBoundedInvariant {
    fn holds(round: &Round) -> bool {
        PlayerId::ALL
            .iter()
            .all(|p| round.record(*p).len() <= MAX_GUESSES)
    }

    fn description() -> &'static str {
        "Player history never exceeds the guess budget"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::GuessRecord;
    use crate::types::{Feedback, Mark};

    #[test]
    fn test_full_budget_holds() {
        let mut round = Round::new("0000".parse().unwrap());
        for _ in 0..MAX_GUESSES {
            round.submit_guess(2, "1111").unwrap();
        }
        assert!(HistoryBoundedInvariant::holds(&round));
    }

    #[test]
    fn test_overflow_detected() {
        let mut round = Round::new("0000".parse().unwrap());
        let record = GuessRecord::new("1111".parse().unwrap(), Feedback::new([Mark::Absent; 4]));
        for _ in 0..=MAX_GUESSES {
            round.push_unchecked(PlayerId::One, record);
        }
        assert!(!HistoryBoundedInvariant::holds(&round));
    }
}
