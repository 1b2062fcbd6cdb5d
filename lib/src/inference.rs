use crate::data::{Board, Code, Color};
use crate::engine::Guesser;
use crate::knowledge::KnowledgeBase;
use crate::results::{Feedback, MastermindError};
use crate::selectors::CodeSelector;
use std::result::Result;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A peg placed in the last guess to test where a known color sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Trial {
    /// Index of the knowledge entry being localized.
    entry: usize,
    position: usize,
}

/// Deduces the secret code by constraint propagation over per-color candidate positions.
///
/// Every guess does two jobs at once. Pegs that are not yet resolved are filled with the color
/// being *considered*, which reveals how many more times that color occurs (discovery). One of
/// those pegs is instead replaced by an already discovered color at its next candidate position
/// (localization). The partial count of the response then tells whether that trial placement
/// was right (`0`), wrong (`1`), or whether the considered color sits there instead (`2`).
///
/// Once every occurrence has been discovered, the considered color is swapped for another
/// unresolved color from the secret, so no guess is spent probing colors that are known to be
/// absent.
///
/// With consistent feedback, boards of up to five pegs are always solved within
/// `colors + pegs` guesses. Larger boards are not: on six pegs and four colors, 10 of the 4096
/// secrets need one guess more, and on six pegs and six colors the worst case is 13 guesses.
/// Localization only moves one peg per guess, so long codes over large alphabets (e.g. 26 pegs
/// and 26 colors) can run past the default cutoff of 100 guesses.
///
/// ```
/// use rs_mastermind::selectors::InsertColors;
/// use rs_mastermind::{play_round, Board, InferenceGuesser, RoundConfig, RoundOutcome};
///
/// let board = Board::with_letters(4, 3).unwrap();
/// let secret = board.parse_code("ABCA").unwrap();
/// let mut guesser = InferenceGuesser::new();
///
/// let result = play_round(&board, &secret, RoundConfig::default(), &mut guesser, &InsertColors);
///
/// assert_eq!(result.outcome, RoundOutcome::Win);
/// assert_eq!(result.num_guesses(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InferenceGuesser {
    knowledge: KnowledgeBase,
    /// The color whose membership is being probed.
    considering: Color,
    /// Index of the knowledge entry being localized. Every entry before it is fixed.
    cursor: usize,
    first_match_seen: bool,
    trial: Option<Trial>,
}

impl InferenceGuesser {
    pub fn new() -> Self {
        InferenceGuesser::default()
    }

    /// Everything deduced so far in the current round.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// The color currently being probed for membership.
    pub fn considering(&self) -> Color {
        self.considering
    }

    fn reset(&mut self, board: &Board) {
        self.knowledge.reset(board.peg_count());
        self.considering = Color(0);
        self.cursor = 0;
        self.first_match_seen = false;
        self.trial = None;
    }

    /// Folds the response to the previous guess into the knowledge base.
    fn update(&mut self, board: &Board, feedback: &Feedback) {
        let trial = self.trial.take();

        // Fixed pegs always score, as does the trial peg: it either sits at its position, or
        // the color it tests is somewhere else on the board.
        let explained = self.knowledge.num_fixed() + usize::from(trial.is_some());
        let gain = match (feedback.exact + feedback.partial).checked_sub(explained) {
            Some(gain) => gain,
            None => {
                warn!(
                    exact = feedback.exact,
                    partial = feedback.partial,
                    explained,
                    "feedback scores fewer pegs than are already known"
                );
                0
            }
        };
        if gain > 0 && !self.knowledge.is_full() {
            self.discover(board, gain);
        }

        if let Some(trial) = trial.filter(|_| self.first_match_seen) {
            if let Err(error) = self.localize(trial, feedback.partial) {
                warn!(%error, partial = feedback.partial, ?trial, "skipping localization");
            }
        }
        if let Err(error) = self.knowledge.prune() {
            warn!(%error, "knowledge base lost an entry while pruning");
        }
        self.advance_cursor();

        if feedback.exact > 0 {
            self.first_match_seen = true;
        }
        self.considering = self.considering.next();
    }

    /// Records `gain` new occurrences of the considered color.
    fn discover(&mut self, board: &Board, gain: usize) {
        if !board.alphabet().contains(self.considering) {
            warn!(
                gain,
                "feedback reports new pegs, but every color has been considered"
            );
            return;
        }
        let added = self.knowledge.add_entries(self.considering, gain);
        if added < gain {
            warn!(gain, added, "feedback reports more pegs than the board has");
        }
        debug!(color = self.considering.index(), added, "discovered color");
    }

    /// Interprets the partial count of the response to a guess that contained a trial peg.
    fn localize(&mut self, trial: Trial, partial: usize) -> Result<(), MastermindError> {
        match partial {
            0 => self.knowledge.fix(trial.entry, trial.position),
            1 => {
                let color = self
                    .knowledge
                    .entry(trial.entry)
                    .map(|entry| entry.color)
                    .ok_or(MastermindError::InconsistentFeedback)?;
                self.knowledge.discard(color, trial.position);
                self.knowledge.discard(self.considering, trial.position);
                Ok(())
            }
            2 => {
                let index = self
                    .knowledge
                    .first_unfixed_of(self.considering)
                    .ok_or(MastermindError::InconsistentFeedback)?;
                self.knowledge.fix(index, trial.position)
            }
            _ => Err(MastermindError::InconsistentFeedback),
        }
    }

    fn advance_cursor(&mut self) {
        while self
            .knowledge
            .entry(self.cursor)
            .map_or(false, |entry| entry.is_fixed())
        {
            self.cursor += 1;
        }
    }

    /// Once every occurrence is known, probes with the next unresolved color after the one
    /// being localized, in alphabet order.
    fn next_unresolved_color(&self, localizing: Color) -> Option<Color> {
        let unresolved =
            |color: &Color| *color != localizing && !self.knowledge.is_color_fixed(*color);
        let mut colors: Vec<Color> = self
            .knowledge
            .entries()
            .iter()
            .map(|entry| entry.color)
            .filter(unresolved)
            .collect();
        colors.sort_unstable();
        colors.dedup();
        colors
            .iter()
            .find(|color| **color > localizing)
            .or_else(|| colors.first())
            .copied()
    }

    fn next_guess(&mut self, board: &Board) -> Code {
        let localizing = self
            .knowledge
            .entry(self.cursor)
            .filter(|entry| !entry.is_fixed())
            .map(|entry| (entry.color, entry.next_candidate()));

        if self.knowledge.is_full() {
            if let Some((color, _)) = localizing {
                self.considering = self.next_unresolved_color(color).unwrap_or(color);
            }
        }
        let filler = if board.alphabet().contains(self.considering) {
            self.considering
        } else {
            localizing.map_or(Color(0), |(color, _)| color)
        };

        self.trial = localizing.and_then(|(_, candidate)| {
            candidate.map(|position| Trial {
                entry: self.cursor,
                position,
            })
        });

        (0..board.peg_count())
            .map(|position| {
                if let Some(color) = self.knowledge.fixed_color_at(position) {
                    return color;
                }
                match (self.trial, localizing) {
                    (Some(trial), Some((color, _))) if trial.position == position => color,
                    _ => filler,
                }
            })
            .collect()
    }
}

impl Guesser for InferenceGuesser {
    fn make_guess(
        &mut self,
        board: &Board,
        _selector: &dyn CodeSelector,
        last_feedback: &Feedback,
    ) -> Code {
        if last_feedback.is_start() {
            self.reset(board);
        } else {
            self.update(board, last_feedback);
        }
        self.next_guess(board)
    }
}
