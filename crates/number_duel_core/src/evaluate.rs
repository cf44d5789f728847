//! Guess evaluation.
//!
//! Exact matches are scored first, then each remaining guess digit claims
//! the leftmost unclaimed matching secret digit. A repeated guess digit can
//! therefore never earn more marks than the secret has copies of it.

use crate::error::RulesError;
use crate::types::{Code, DIGITS, Feedback, Mark};
use tracing::{instrument, trace};

/// Scores a guess against the secret.
pub fn score(guess: &Code, secret: &Code) -> Feedback {
    let guess = guess.digits();
    let secret = secret.digits();
    let mut marks = [Mark::Absent; DIGITS];
    let mut consumed = [false; DIGITS];

    for i in 0..DIGITS {
        if guess[i] == secret[i] {
            marks[i] = Mark::Correct;
            consumed[i] = true;
        }
    }

    for i in 0..DIGITS {
        if marks[i] == Mark::Correct {
            continue;
        }
        let found = (0..DIGITS).find(|&j| !consumed[j] && secret[j] == guess[i]);
        if let Some(j) = found {
            marks[i] = Mark::Present;
            consumed[j] = true;
        }
    }

    let feedback = Feedback::new(marks);
    trace!(%feedback, "Scored guess");
    feedback
}

/// Evaluates raw guess and secret strings.
///
/// # Errors
///
/// Returns [`RulesError::InvalidInput`] if either string is not exactly
/// four ASCII decimal digits.
#[instrument(skip(secret))]
pub fn evaluate(guess: &str, secret: &str) -> Result<Feedback, RulesError> {
    let guess: Code = guess
        .parse()
        .map_err(|_| RulesError::InvalidInput(guess.to_string()))?;
    let secret: Code = secret
        .parse()
        .map_err(|_| RulesError::InvalidInput(secret.to_string()))?;
    Ok(score(&guess, &secret))
}
