//! Outcome consistency invariant: the status matches the histories.

use super::Invariant;
use crate::round::{Outcome, Round, RoundStatus};
use crate::types::PlayerId;

/// Invariant: the round status is the one the histories imply.
///
/// - A winner's final guess is the secret, and no other guess is.
/// - A draw means both budgets are spent and nobody found the secret.
/// - A live round has no solved guess and at least one budget left.
pub struct OutcomeConsistentInvariant;

impl Invariant<Round> for OutcomeConsistentInvariant {
    fn holds(round: &Round) -> bool {
        let solved = |p: PlayerId| {
            round
                .record(p)
                .guesses()
                .iter()
                .filter(|g| g.value() == round.secret())
                .count()
        };
        let total_solved: usize = PlayerId::ALL.iter().map(|p| solved(*p)).sum();
        let both_exhausted = PlayerId::ALL
            .iter()
            .all(|p| round.record(*p).is_exhausted());

        match round.status() {
            RoundStatus::Live => total_solved == 0 && !both_exhausted,
            RoundStatus::Finished(Outcome::Draw) => total_solved == 0 && both_exhausted,
            RoundStatus::Finished(Outcome::Winner(winner)) => {
                let last_is_secret = round
                    .record(winner)
                    .guesses()
                    .last()
                    .is_some_and(|g| g.value() == round.secret());
                last_is_secret && total_solved == 1
            }
        }
    }

    fn description() -> &'static str {
        "Round status agrees with the recorded guesses"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_GUESSES;

    #[test]
    fn test_win_holds() {
        let mut round = Round::new("9876".parse().unwrap());
        round.submit_guess(2, "1111").unwrap();
        round.submit_guess(2, "9876").unwrap();
        assert!(OutcomeConsistentInvariant::holds(&round));
    }

    #[test]
    fn test_draw_holds() {
        let mut round = Round::new("9876".parse().unwrap());
        for _ in 0..MAX_GUESSES {
            round.submit_guess(1, "1111").unwrap();
            round.submit_guess(2, "2222").unwrap();
        }
        assert_eq!(round.status(), RoundStatus::Finished(Outcome::Draw));
        assert!(OutcomeConsistentInvariant::holds(&round));
    }

    #[test]
    fn test_premature_draw_detected() {
        let mut round = Round::new("9876".parse().unwrap());
        round.set_status_unchecked(RoundStatus::Finished(Outcome::Draw));
        assert!(!OutcomeConsistentInvariant::holds(&round));
    }
}
