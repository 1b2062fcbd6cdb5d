//! Policies for choosing secret codes.

use crate::data::{Board, Code, Color};
use crate::results::MastermindError;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::RngCore;
use std::result::Result;

/// Chooses secret codes for a board.
///
/// Guessers receive the selector that chose the secret, but are free to ignore it.
pub trait CodeSelector {
    /// The name used to select this policy from the command line, and to name code-list files.
    fn name(&self) -> &'static str;

    /// Generates a single secret code for the board.
    fn generate_code(&self, board: &Board, rng: &mut dyn RngCore)
        -> Result<Code, MastermindError>;

    /// Generates `count` independent secret codes for the board.
    fn generate_codes(
        &self,
        board: &Board,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Code>, MastermindError> {
        (0..count)
            .map(|_| self.generate_code(board, rng))
            .collect()
    }
}

/// Every selector, in the order they are listed on the command line.
pub const SELECTOR_NAMES: [&str; 8] = [
    "InsertColors",
    "TwoColor",
    "ABColor",
    "TwoColorAlternating",
    "OnlyOnce",
    "FirstLast",
    "UsuallyFewer",
    "PreferFewer",
];

/// Looks up a selector by its [`CodeSelector::name`].
///
/// ```
/// use rs_mastermind::selectors::selector_by_name;
///
/// assert_eq!(selector_by_name("OnlyOnce").map(|selector| selector.name()), Some("OnlyOnce"));
/// assert!(selector_by_name("Nope").is_none());
/// ```
pub fn selector_by_name(name: &str) -> Option<Box<dyn CodeSelector + Send + Sync>> {
    let selector: Box<dyn CodeSelector + Send + Sync> = match name {
        "InsertColors" => Box::new(InsertColors),
        "TwoColor" => Box::new(TwoColor),
        "ABColor" => Box::new(ABColor),
        "TwoColorAlternating" => Box::new(TwoColorAlternating),
        "OnlyOnce" => Box::new(OnlyOnce),
        "FirstLast" => Box::new(FirstLast),
        "UsuallyFewer" => Box::new(UsuallyFewer),
        "PreferFewer" => Box::new(PreferFewer),
        _ => return None,
    };
    Some(selector)
}

/// Chooses every peg uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertColors;

impl CodeSelector for InsertColors {
    fn name(&self) -> &'static str {
        "InsertColors"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        let colors: Vec<Color> = board.alphabet().colors().collect();
        Ok(fill_randomly(&colors, board.peg_count(), rng))
    }
}

/// Uses exactly two randomly chosen colors, each at least once.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoColor;

impl CodeSelector for TwoColor {
    fn name(&self) -> &'static str {
        "TwoColor"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        require_colors(self, board, 2)?;
        require_pegs(self, board, 2)?;
        let colors = pick_colors(board, 2, rng);
        Ok(fill_using_each(&colors, board.peg_count(), rng))
    }
}

/// Like [`TwoColor`], but always uses the first two colors of the alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ABColor;

impl CodeSelector for ABColor {
    fn name(&self) -> &'static str {
        "ABColor"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        require_colors(self, board, 2)?;
        require_pegs(self, board, 2)?;
        Ok(fill_using_each(&[Color(0), Color(1)], board.peg_count(), rng))
    }
}

/// Alternates two randomly chosen colors, e.g. `CACA`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoColorAlternating;

impl CodeSelector for TwoColorAlternating {
    fn name(&self) -> &'static str {
        "TwoColorAlternating"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        require_colors(self, board, 2)?;
        let colors = pick_colors(board, 2, rng);
        Ok((0..board.peg_count())
            .map(|position| colors[position % 2])
            .collect())
    }
}

/// Never repeats a color.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlyOnce;

impl CodeSelector for OnlyOnce {
    fn name(&self) -> &'static str {
        "OnlyOnce"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        require_colors(self, board, board.peg_count())?;
        Ok(Code::new(pick_colors(board, board.peg_count(), rng)))
    }
}

/// Uses the same color for the first and last pegs, and random colors in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLast;

impl CodeSelector for FirstLast {
    fn name(&self) -> &'static str {
        "FirstLast"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        let colors: Vec<Color> = board.alphabet().colors().collect();
        let mut pegs = fill_randomly(&colors, board.peg_count(), rng).pegs().to_vec();
        if let Some(first) = pegs.first().copied() {
            if let Some(last) = pegs.last_mut() {
                *last = first;
            }
        }
        Ok(Code::new(pegs))
    }
}

/// Usually draws pegs from just two or three colors.
///
/// 90% of codes use two or three random colors; the rest may use the whole alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsuallyFewer;

impl CodeSelector for UsuallyFewer {
    fn name(&self) -> &'static str {
        "UsuallyFewer"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        require_colors(self, board, 3)?;
        let num_colors = if rng.gen_range(0..100) < 90 {
            rng.gen_range(2..=3)
        } else {
            board.alphabet().len()
        };
        let colors = pick_colors(board, num_colors, rng);
        Ok(fill_randomly(&colors, board.peg_count(), rng))
    }
}

/// Strongly favours codes with few distinct colors.
///
/// | Colors | Share |
/// |--------|-------|
/// | 1 | 50% |
/// | 2 | 25% |
/// | 3 | 13% |
/// | 4 | 8% |
/// | 5 | 3% |
/// | any | 1% |
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferFewer;

impl CodeSelector for PreferFewer {
    fn name(&self) -> &'static str {
        "PreferFewer"
    }

    fn generate_code(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Code, MastermindError> {
        require_colors(self, board, 2)?;
        let num_colors = match rng.gen_range(0..100) {
            0..=49 => 1,
            50..=74 => 2,
            75..=87 => 3,
            88..=95 => 4,
            96..=98 => 5,
            _ => board.alphabet().len(),
        };
        let colors = pick_colors(board, num_colors, rng);
        Ok(fill_randomly(&colors, board.peg_count(), rng))
    }
}

fn require_colors(
    selector: &dyn CodeSelector,
    board: &Board,
    needed: usize,
) -> Result<(), MastermindError> {
    let available = board.alphabet().len();
    if available < needed {
        return Err(MastermindError::AlphabetTooSmall {
            policy: selector.name(),
            needed,
            available,
        });
    }
    Ok(())
}

fn require_pegs(
    selector: &dyn CodeSelector,
    board: &Board,
    needed: usize,
) -> Result<(), MastermindError> {
    let available = board.peg_count();
    if available < needed {
        return Err(MastermindError::TooFewPegs {
            policy: selector.name(),
            needed,
            available,
        });
    }
    Ok(())
}

/// Picks up to `count` distinct colors, in random order.
fn pick_colors(board: &Board, count: usize, rng: &mut dyn RngCore) -> Vec<Color> {
    let mut colors: Vec<Color> = board.alphabet().colors().collect();
    colors.shuffle(rng);
    colors.truncate(count.max(1));
    colors
}

/// Draws each peg from the non-empty set of colors.
fn fill_randomly(colors: &[Color], peg_count: usize, rng: &mut dyn RngCore) -> Code {
    (0..peg_count)
        .map(|_| colors[rng.gen_range(0..colors.len())])
        .collect()
}

/// Like [`fill_randomly`], but every color appears at least once. There must be at least as many
/// pegs as colors.
fn fill_using_each(colors: &[Color], peg_count: usize, rng: &mut dyn RngCore) -> Code {
    let mut pegs = fill_randomly(colors, peg_count, rng).pegs().to_vec();
    let mut positions: Vec<usize> = (0..peg_count).collect();
    positions.shuffle(rng);
    for (color, position) in colors.iter().zip(positions) {
        pegs[position] = *color;
    }
    Code::new(pegs)
}
