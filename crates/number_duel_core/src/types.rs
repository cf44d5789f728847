//! Core domain types for the number duel.

use crate::error::{MalformedCode, RulesError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of digits in a code.
pub const DIGITS: usize = 4;

/// Guesses each player may submit per round.
pub const MAX_GUESSES: usize = 6;

/// One of the two duelling players.
///
/// Serialized as the integer `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerId {
    /// Player 1.
    One,
    /// Player 2.
    Two,
}

impl PlayerId {
    /// Both players, in id order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Returns the numeric id (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }
}

impl TryFrom<i64> for PlayerId {
    type Error = RulesError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(RulesError::InvalidPlayer(other.to_string())),
        }
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = RulesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PlayerId::try_from(i64::from(value))
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> Self {
        player.number()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// An ordered sequence of exactly [`DIGITS`] decimal digits.
///
/// Used both for the secret and for guesses. Serialized as a string
/// such as `"0427"` so leading zeros survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code([u8; DIGITS]);

impl Code {
    /// Creates a code from raw digit values.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCode`] if any value is above 9.
    pub fn from_digits(digits: [u8; DIGITS]) -> Result<Self, MalformedCode> {
        if digits.iter().all(|d| *d <= 9) {
            Ok(Self(digits))
        } else {
            Err(MalformedCode::new(format!("{:?}", digits)))
        }
    }

    /// Draws a code with each digit independently uniform in 0-9.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits = [0u8; DIGITS];
        for digit in &mut digits {
            *digit = rng.gen_range(0..10);
        }
        Self(digits)
    }

    /// Returns the digit values.
    pub fn digits(&self) -> &[u8; DIGITS] {
        &self.0
    }

    /// Number of occurrences of `digit` in this code.
    pub fn count_of(&self, digit: u8) -> usize {
        self.0.iter().filter(|d| **d == digit).count()
    }
}

impl FromStr for Code {
    type Err = MalformedCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != DIGITS || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(MalformedCode::new(s));
        }
        let mut digits = [0u8; DIGITS];
        for (slot, byte) in digits.iter_mut().zip(bytes) {
            *slot = byte - b'0';
        }
        Ok(Self(digits))
    }
}

impl TryFrom<String> for Code {
    type Error = MalformedCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for digit in &self.0 {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

/// Feedback for one guess position.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mark {
    /// Right digit in the right position.
    Correct,
    /// Digit occurs elsewhere in the secret.
    Present,
    /// Digit not available in the secret.
    Absent,
}

/// Per-position feedback for a whole guess.
///
/// Serialized as a plain array, e.g. `["correct","absent","present","present"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feedback([Mark; DIGITS]);

impl Feedback {
    /// Wraps evaluated marks.
    pub fn new(marks: [Mark; DIGITS]) -> Self {
        Self(marks)
    }

    /// Returns the marks in guess-position order.
    pub fn marks(&self) -> &[Mark; DIGITS] {
        &self.0
    }

    /// Number of positions carrying `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.0.iter().filter(|m| **m == mark).count()
    }

    /// True when every position is [`Mark::Correct`].
    pub fn is_solved(&self) -> bool {
        self.count(Mark::Correct) == DIGITS
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbols: String = self
            .0
            .iter()
            .map(|m| match m {
                Mark::Correct => 'C',
                Mark::Present => 'P',
                Mark::Absent => '-',
            })
            .collect();
        write!(f, "{}", symbols)
    }
}
