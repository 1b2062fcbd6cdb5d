use crate::data::*;
use crate::results::*;
use crate::selectors::{CodeSelector, InsertColors};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::result::Result;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Guesses secret codes, one guess at a time.
pub trait Guesser {
    /// Chooses the next guess.
    ///
    /// `last_feedback` is the response to this guesser's previous guess, or [`Feedback::start()`]
    /// if a new round is starting. Guessers must forget everything from earlier rounds when a
    /// round starts.
    fn make_guess(
        &mut self,
        board: &Board,
        selector: &dyn CodeSelector,
        last_feedback: &Feedback,
    ) -> Code;
}

/// Limits that end a round in a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundConfig {
    /// The maximum number of guesses.
    pub guess_cutoff: u32,
    /// The total time the guesser may spend choosing guesses.
    pub time_cutoff: Duration,
    /// Extra time allowed beyond `time_cutoff`, to absorb timer noise.
    pub time_tolerance: Duration,
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig {
            guess_cutoff: 100,
            time_cutoff: Duration::from_secs(5),
            time_tolerance: Duration::from_millis(100),
        }
    }
}

/// A single game against one secret code.
///
/// The round ends as soon as the guesser finds the secret ([`RoundOutcome::Win`]), makes an
/// invalid guess ([`RoundOutcome::Failure`]), or runs out of guesses or time
/// ([`RoundOutcome::Loss`]). Time is only checked after each guess, so a slow guess always
/// completes.
pub struct Round<'a> {
    board: &'a Board,
    secret: &'a Code,
    config: RoundConfig,
}

impl<'a> Round<'a> {
    pub fn new(board: &'a Board, secret: &'a Code, config: RoundConfig) -> Round<'a> {
        Round {
            board,
            secret,
            config,
        }
    }

    /// Plays the round to completion.
    pub fn play<G: Guesser + ?Sized>(
        &self,
        guesser: &mut G,
        selector: &dyn CodeSelector,
    ) -> RoundResult {
        let alphabet = self.board.alphabet();
        let time_limit = self
            .config
            .time_cutoff
            .saturating_add(self.config.time_tolerance);
        let mut feedback = Feedback::start();
        let mut guesses: Vec<Code> = Vec::new();
        let mut time_used = Duration::ZERO;

        while guesses.len() < self.config.guess_cutoff as usize {
            let start_time = Instant::now();
            let guess = guesser.make_guess(self.board, selector, &feedback);
            time_used += start_time.elapsed();
            let guess_index = guesses.len() as u32 + 1;

            let outcome = if time_used > time_limit {
                Some(RoundOutcome::Loss)
            } else if guess == *self.secret {
                Some(RoundOutcome::Win)
            } else {
                match get_feedback_for_guess(self.board, self.secret, &guess, guess_index) {
                    Ok(next_feedback) => {
                        debug!(
                            guess = %alphabet.format_code(&guess),
                            exact = next_feedback.exact,
                            partial = next_feedback.partial,
                            guess_index,
                            "scored guess"
                        );
                        feedback = next_feedback;
                        None
                    }
                    Err(error) => {
                        debug!(guess = %alphabet.format_code(&guess), %error, "rejected guess");
                        Some(RoundOutcome::Failure)
                    }
                }
            };
            guesses.push(guess);
            if let Some(outcome) = outcome {
                return self.finish(outcome, guesses, time_used);
            }
        }
        self.finish(RoundOutcome::Loss, guesses, time_used)
    }

    fn finish(
        &self,
        outcome: RoundOutcome,
        guesses: Vec<Code>,
        time_used: Duration,
    ) -> RoundResult {
        info!(
            secret = %self.board.alphabet().format_code(self.secret),
            ?outcome,
            num_guesses = guesses.len(),
            time_used_ms = time_used.as_millis() as u64,
            "round finished"
        );
        RoundResult {
            outcome,
            guesses,
            time_used,
        }
    }
}

/// Plays a single round against the given secret.
pub fn play_round<G: Guesser + ?Sized>(
    board: &Board,
    secret: &Code,
    config: RoundConfig,
    guesser: &mut G,
    selector: &dyn CodeSelector,
) -> RoundResult {
    Round::new(board, secret, config).play(guesser, selector)
}

/// Plays one round against every possible secret code for the board, in parallel.
///
/// Every round gets its own guesser from `make_guesser`. Results are returned in the same order
/// as [`Board::code_at`].
///
/// ```
/// use rs_mastermind::{play_every_code, Board, InferenceGuesser, RoundConfig, RoundOutcome};
///
/// let board = Board::with_letters(3, 3).unwrap();
/// let results = play_every_code(&board, RoundConfig::default(), InferenceGuesser::new).unwrap();
///
/// assert_eq!(results.len(), 27);
/// assert!(results.iter().all(|(_, result)| result.outcome == RoundOutcome::Win));
/// ```
pub fn play_every_code<G, F>(
    board: &Board,
    config: RoundConfig,
    make_guesser: F,
) -> Result<Vec<(Code, RoundResult)>, MastermindError>
where
    G: Guesser,
    F: Fn() -> G + Sync,
{
    let num_codes = board
        .num_codes()
        .ok_or(MastermindError::CodeSpaceTooLarge)?;
    Ok((0..num_codes)
        .into_par_iter()
        .map(|index| {
            let secret = board.code_at(index);
            let mut guesser = make_guesser();
            // Every code is played, so the selector is never consulted for secrets.
            let result = play_round(board, &secret, config, &mut guesser, &InsertColors);
            (secret, result)
        })
        .collect())
}

/// Guesses a uniformly random code every turn.
#[derive(Debug, Clone)]
pub struct RandomGuesser {
    rng: StdRng,
}

impl RandomGuesser {
    pub fn new() -> RandomGuesser {
        RandomGuesser {
            rng: StdRng::from_entropy(),
        }
    }

    /// Constructs a guesser whose guesses are reproducible.
    pub fn from_seed(seed: u64) -> RandomGuesser {
        RandomGuesser {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomGuesser {
    fn default() -> Self {
        RandomGuesser::new()
    }
}

impl Guesser for RandomGuesser {
    fn make_guess(&mut self, board: &Board, _: &dyn CodeSelector, _: &Feedback) -> Code {
        let num_colors = board.alphabet().len();
        (0..board.peg_count())
            .map(|_| Color(self.rng.gen_range(0..num_colors) as u8))
            .collect()
    }
}

/// Guesses a single random color across the whole board every turn.
#[derive(Debug, Clone)]
pub struct MonochromeGuesser {
    rng: StdRng,
}

impl MonochromeGuesser {
    pub fn new() -> MonochromeGuesser {
        MonochromeGuesser {
            rng: StdRng::from_entropy(),
        }
    }

    /// Constructs a guesser whose guesses are reproducible.
    pub fn from_seed(seed: u64) -> MonochromeGuesser {
        MonochromeGuesser {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for MonochromeGuesser {
    fn default() -> Self {
        MonochromeGuesser::new()
    }
}

impl Guesser for MonochromeGuesser {
    fn make_guess(&mut self, board: &Board, _: &dyn CodeSelector, _: &Feedback) -> Code {
        let color = Color(self.rng.gen_range(0..board.alphabet().len()) as u8);
        Code::monochrome(color, board.peg_count())
    }
}
