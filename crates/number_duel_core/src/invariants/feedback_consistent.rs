//! Feedback consistency invariant: marks respect the secret's digit counts.

use super::Invariant;
use crate::round::{GuessRecord, Round};
use crate::types::{Code, Mark, PlayerId};

/// Invariant: recorded feedback never over-credits a digit.
///
/// For every digit value, the `correct` plus `present` marks on guess
/// positions holding that digit never exceed the secret's copies of it, and
/// `correct` only appears where guess and secret agree.
pub struct FeedbackConsistentInvariant;

fn record_consistent(record: &GuessRecord, secret: &Code) -> bool {
    let guess = record.value().digits();
    let marks = record.feedback().marks();

    let exact_ok = guess
        .iter()
        .zip(secret.digits())
        .zip(marks)
        .all(|((g, s), m)| *m != Mark::Correct || g == s);

    let counts_ok = (0..=9u8).all(|digit| {
        let credited = guess
            .iter()
            .zip(marks)
            .filter(|(g, m)| **g == digit && **m != Mark::Absent)
            .count();
        credited <= secret.count_of(digit)
    });

    exact_ok && counts_ok
}

impl Invariant<Round> for FeedbackConsistentInvariant {
    fn holds(round: &Round) -> bool {
        PlayerId::ALL.iter().all(|p| {
            round
                .record(*p)
                .guesses()
                .iter()
                .all(|record| record_consistent(record, round.secret()))
        })
    }

    fn description() -> &'static str {
        "Feedback never credits a digit more often than the secret holds it"
    }
}
