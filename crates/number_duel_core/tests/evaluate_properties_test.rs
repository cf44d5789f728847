//! Property tests for guess evaluation.

use number_duel_core::{Code, DIGITS, Mark, evaluate, score};
use proptest::prelude::*;

fn code() -> impl Strategy<Value = Code> {
    proptest::array::uniform4(0u8..10).prop_map(|d| Code::from_digits(d).unwrap())
}

fn distinct_code() -> impl Strategy<Value = Code> {
    Just((0u8..10).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|d| Code::from_digits([d[0], d[1], d[2], d[3]]).unwrap())
}

proptest! {
    #[test]
    fn correct_count_equals_exact_agreements(guess in code(), secret in code()) {
        let feedback = score(&guess, &secret);
        let exact = guess
            .digits()
            .iter()
            .zip(secret.digits())
            .filter(|(g, s)| g == s)
            .count();
        prop_assert_eq!(feedback.count(Mark::Correct), exact);
    }

    #[test]
    fn distinct_digits_reduce_to_membership(guess in distinct_code(), secret in distinct_code()) {
        let feedback = score(&guess, &secret);
        for i in 0..DIGITS {
            let g = guess.digits()[i];
            let expected = if g == secret.digits()[i] {
                Mark::Correct
            } else if secret.digits().contains(&g) {
                Mark::Present
            } else {
                Mark::Absent
            };
            prop_assert_eq!(feedback.marks()[i], expected);
        }
    }

    #[test]
    fn credited_marks_never_exceed_secret_copies(guess in code(), secret in code()) {
        let feedback = score(&guess, &secret);
        for digit in 0..10u8 {
            let credited = guess
                .digits()
                .iter()
                .zip(feedback.marks())
                .filter(|(g, m)| **g == digit && **m != Mark::Absent)
                .count();
            prop_assert!(credited <= secret.count_of(digit));
        }
    }

    #[test]
    fn credited_total_is_multiset_overlap(guess in code(), secret in code()) {
        let feedback = score(&guess, &secret);
        let overlap: usize = (0..10u8)
            .map(|d| guess.count_of(d).min(secret.count_of(d)))
            .sum();
        prop_assert_eq!(DIGITS - feedback.count(Mark::Absent), overlap);
    }

    #[test]
    fn string_and_typed_forms_agree(guess in code(), secret in code()) {
        let from_strings = evaluate(&guess.to_string(), &secret.to_string()).unwrap();
        prop_assert_eq!(from_strings, score(&guess, &secret));
    }

    #[test]
    fn evaluation_is_deterministic(guess in code(), secret in code()) {
        prop_assert_eq!(score(&guess, &secret), score(&guess, &secret));
    }
}
