use crate::data::{Alphabet, Board, Code, Color};
use std::io;
use std::result::Result;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Indicates that an error occurred while setting up, scoring, or reasoning about a game.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MastermindError {
    /// A guess has the wrong number of pegs or uses a color outside the alphabet.
    #[error("guess is not a valid code for this board")]
    InvalidGuess,
    /// Indicates that a code must have the given number of pegs.
    #[error("codes must have exactly {0} pegs")]
    CodeLength(usize),
    #[error("a board must have at least one peg")]
    EmptyBoard,
    #[error("'{0}' is not a color in the alphabet")]
    UnknownColor(char),
    #[error("'{0}' appears more than once in the alphabet")]
    DuplicateColor(char),
    /// Indicates that an alphabet cannot have the given number of colors.
    #[error("unsupported alphabet size: {0}")]
    AlphabetSize(usize),
    /// Indicates that a code selection policy needs more colors than the alphabet has.
    #[error("{policy} needs at least {needed} colors, but the alphabet only has {available}")]
    AlphabetTooSmall {
        policy: &'static str,
        needed: usize,
        available: usize,
    },
    /// Indicates that a code selection policy needs more pegs than the board has.
    #[error("{policy} needs at least {needed} pegs, but the board only has {available}")]
    TooFewPegs {
        policy: &'static str,
        needed: usize,
        available: usize,
    },
    /// Indicates that there are too many codes to enumerate for this board.
    #[error("the code space for this board is too large to enumerate")]
    CodeSpaceTooLarge,
    /// Indicates that the given feedback cannot be explained by what is already known.
    #[error("feedback is inconsistent with earlier feedback")]
    InconsistentFeedback,
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<io::Error> for MastermindError {
    fn from(error: io::Error) -> Self {
        MastermindError::Io(error.to_string())
    }
}

/// The response to a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feedback {
    /// Pegs that match the secret in both color and position ("bulls").
    pub exact: usize,
    /// Further pegs whose color is in the secret, but elsewhere ("cows").
    pub partial: usize,
    /// How many guesses have been scored so far in this round. Zero means no guess has been made
    /// yet.
    pub guess_index: u32,
}

impl Feedback {
    /// The feedback given before the first guess of a round.
    pub fn start() -> Feedback {
        Feedback::default()
    }

    /// Returns `true` iff this marks the start of a new round.
    pub fn is_start(&self) -> bool {
        self.guess_index == 0
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundOutcome {
    /// The guesser found the secret code.
    Win,
    /// The guesser ran out of guesses or time.
    Loss,
    /// The guesser produced an invalid guess.
    Failure,
}

/// The result of playing a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub outcome: RoundOutcome,
    /// Every guess the guesser made, in order, including the final one.
    pub guesses: Vec<Code>,
    /// Time spent inside the guesser while choosing guesses.
    pub time_used: Duration,
}

impl RoundResult {
    pub fn num_guesses(&self) -> usize {
        self.guesses.len()
    }
}

/// Computes the `(exact, partial)` match counts for the guess against the secret.
///
/// Each secret peg contributes to at most one of the counts, so a color that appears `k` times in
/// the guess and `m` times in the secret contributes at most `min(k, m)` matches in total.
///
/// ```
/// use rs_mastermind::{score, Alphabet};
///
/// let alphabet = Alphabet::letters(2).unwrap();
/// let secret = alphabet.parse_code("AABB").unwrap();
/// let guess = alphabet.parse_code("ABAB").unwrap();
///
/// assert_eq!(score(&guess, &secret, &alphabet), Ok((2, 2)));
/// ```
pub fn score(
    guess: &[Color],
    secret: &[Color],
    alphabet: &Alphabet,
) -> Result<(usize, usize), MastermindError> {
    if guess.len() != secret.len() || !guess.iter().all(|color| alphabet.contains(*color)) {
        return Err(MastermindError::InvalidGuess);
    }
    let mut guess_counts = count_colors(guess, alphabet)?;
    let mut secret_counts = count_colors(secret, alphabet)?;

    let mut exact = 0;
    for (guess_color, secret_color) in guess.iter().zip(secret.iter()) {
        if guess_color == secret_color {
            exact += 1;
            guess_counts[guess_color.index()] -= 1;
            secret_counts[secret_color.index()] -= 1;
        }
    }
    let partial = guess_counts
        .iter()
        .zip(secret_counts.iter())
        .map(|(in_guess, in_secret)| *in_guess.min(in_secret))
        .sum();
    Ok((exact, partial))
}

/// Returns `true` iff the guess is a well-formed code for the board.
pub fn is_valid_guess(guess: &[Color], board: &Board) -> bool {
    board.is_valid_code(guess)
}

/// Validates the guess and scores it against the secret, recording it as the `guess_index`th
/// guess of the round.
pub fn get_feedback_for_guess(
    board: &Board,
    secret: &[Color],
    guess: &[Color],
    guess_index: u32,
) -> Result<Feedback, MastermindError> {
    if !is_valid_guess(guess, board) {
        return Err(MastermindError::InvalidGuess);
    }
    let (exact, partial) = score(guess, secret, board.alphabet())?;
    Ok(Feedback {
        exact,
        partial,
        guess_index,
    })
}

fn count_colors(code: &[Color], alphabet: &Alphabet) -> Result<Vec<usize>, MastermindError> {
    let mut counts = vec![0; alphabet.len()];
    for color in code {
        *counts
            .get_mut(color.index())
            .ok_or(MastermindError::InvalidGuess)? += 1;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_colors_counts_repeats() -> Result<(), MastermindError> {
        let alphabet = Alphabet::letters(3)?;

        assert_eq!(
            count_colors(&alphabet.parse_code("CACA")?, &alphabet)?,
            vec![2, 0, 2]
        );
        Ok(())
    }

    #[test]
    fn count_colors_rejects_unknown_colors() -> Result<(), MastermindError> {
        let alphabet = Alphabet::letters(3)?;

        assert_eq!(
            count_colors(&[Color(0), Color(3)], &alphabet),
            Err(MastermindError::InvalidGuess)
        );
        Ok(())
    }
}
