use crate::results::MastermindError;
use std::collections::HashSet;
use std::io::BufRead;
use std::io::Write;
use std::ops::Deref;
use std::result::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The largest alphabet that [`Alphabet::letters`] can build.
pub const MAX_LETTER_COLORS: usize = 26;

/// A single peg color, identified by its position in an [`Alphabet`].
///
/// Colors carry no meaning beyond their alphabet position, which is only used as the order in
/// which guessers try new colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub u8);

impl Color {
    /// The zero-based position of this color in its alphabet.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The color that follows this one in alphabet order. This may be outside the alphabet.
    pub fn next(self) -> Color {
        Color(self.0.saturating_add(1))
    }
}

/// The ordered set of colors that codes for a game may use, along with the symbol used to
/// display each color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alphabet {
    symbols: Box<[char]>,
}

impl Alphabet {
    /// Constructs an alphabet of `count` colors, displayed as `A`, `B`, `C`, and so on.
    ///
    /// ```
    /// use rs_mastermind::Alphabet;
    ///
    /// let alphabet = Alphabet::letters(3).unwrap();
    /// assert_eq!(alphabet.len(), 3);
    /// assert!(Alphabet::letters(27).is_err());
    /// ```
    pub fn letters(count: usize) -> Result<Self, MastermindError> {
        if count == 0 || count > MAX_LETTER_COLORS {
            return Err(MastermindError::AlphabetSize(count));
        }
        Alphabet::from_symbols((b'A'..).take(count).map(char::from))
    }

    /// Constructs an alphabet from the given display symbols, in order.
    ///
    /// Symbols must be unique, and there must be between 1 and 256 of them.
    pub fn from_symbols<I>(symbols: I) -> Result<Self, MastermindError>
    where
        I: IntoIterator<Item = char>,
    {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.is_empty() || symbols.len() > u8::MAX as usize + 1 {
            return Err(MastermindError::AlphabetSize(symbols.len()));
        }
        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(*symbol) {
                return Err(MastermindError::DuplicateColor(*symbol));
            }
        }
        Ok(Alphabet {
            symbols: symbols.into_boxed_slice(),
        })
    }

    /// Returns the number of colors in this alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: an alphabet has at least one color.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over every color, in alphabet order.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        (0..self.symbols.len()).map(|index| Color(index as u8))
    }

    /// Returns `true` iff the color belongs to this alphabet.
    pub fn contains(&self, color: Color) -> bool {
        color.index() < self.symbols.len()
    }

    /// Returns the display symbol for the given color.
    pub fn symbol(&self, color: Color) -> Option<char> {
        self.symbols.get(color.index()).copied()
    }

    /// Returns the color displayed with the given symbol.
    pub fn color_of(&self, symbol: char) -> Option<Color> {
        self.symbols
            .iter()
            .position(|other| *other == symbol)
            .map(|index| Color(index as u8))
    }

    /// Parses a code of any length, such as `"ABCA"`, using this alphabet's symbols.
    pub fn parse_code(&self, text: &str) -> Result<Code, MastermindError> {
        text.chars()
            .map(|symbol| {
                self.color_of(symbol)
                    .ok_or(MastermindError::UnknownColor(symbol))
            })
            .collect()
    }

    /// Formats the code with this alphabet's symbols. Colors outside the alphabet are shown as
    /// `?`.
    pub fn format_code(&self, code: &[Color]) -> String {
        code.iter()
            .map(|color| self.symbol(*color).unwrap_or('?'))
            .collect()
    }
}

/// An ordered sequence of colored pegs. Both secret codes and guesses are codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Code {
    pegs: Box<[Color]>,
}

impl Code {
    pub fn new(pegs: Vec<Color>) -> Self {
        Code {
            pegs: pegs.into_boxed_slice(),
        }
    }

    /// A code that uses the given color for every peg.
    pub fn monochrome(color: Color, peg_count: usize) -> Self {
        Code::new(vec![color; peg_count])
    }

    pub fn pegs(&self) -> &[Color] {
        &self.pegs
    }
}

impl Deref for Code {
    type Target = [Color];

    fn deref(&self) -> &Self::Target {
        &self.pegs
    }
}

impl FromIterator<Color> for Code {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Code::new(iter.into_iter().collect())
    }
}

/// The fixed configuration of a game: how many pegs each code has, and which colors they may
/// use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    peg_count: usize,
    alphabet: Alphabet,
}

impl Board {
    /// Constructs a board with the given number of pegs per code.
    pub fn new(peg_count: usize, alphabet: Alphabet) -> Result<Self, MastermindError> {
        if peg_count == 0 {
            return Err(MastermindError::EmptyBoard);
        }
        Ok(Board {
            peg_count,
            alphabet,
        })
    }

    /// Constructs a board whose colors are the first `color_count` capital letters.
    ///
    /// ```
    /// use rs_mastermind::Board;
    ///
    /// let board = Board::with_letters(4, 6).unwrap();
    /// assert_eq!(board.peg_count(), 4);
    /// assert_eq!(board.alphabet().len(), 6);
    /// ```
    pub fn with_letters(peg_count: usize, color_count: usize) -> Result<Self, MastermindError> {
        Board::new(peg_count, Alphabet::letters(color_count)?)
    }

    pub fn peg_count(&self) -> usize {
        self.peg_count
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Parses a code for this board, which must have exactly [`Board::peg_count`] pegs.
    pub fn parse_code(&self, text: &str) -> Result<Code, MastermindError> {
        let code = self.alphabet.parse_code(text)?;
        if code.len() != self.peg_count {
            return Err(MastermindError::CodeLength(self.peg_count));
        }
        Ok(code)
    }

    /// Returns `true` iff the code has the right number of pegs and only uses colors from the
    /// alphabet.
    pub fn is_valid_code(&self, code: &[Color]) -> bool {
        code.len() == self.peg_count && code.iter().all(|color| self.alphabet.contains(*color))
    }

    /// The number of distinct codes for this board, if it fits in a `usize`.
    pub fn num_codes(&self) -> Option<usize> {
        self.alphabet.len().checked_pow(self.peg_count as u32)
    }

    /// Returns the code at the given index in lexicographic order, e.g. `AAAA`, `AAAB`, ...
    ///
    /// The index must be less than [`Board::num_codes`].
    pub fn code_at(&self, index: usize) -> Code {
        let base = self.alphabet.len();
        let mut remainder = index;
        let mut pegs = vec![Color(0); self.peg_count];
        for peg in pegs.iter_mut().rev() {
            *peg = Color((remainder % base) as u8);
            remainder /= base;
        }
        Code::new(pegs)
    }
}

/// Reads a list of codes for the given board, with one code on each line.
///
/// Blank lines and surrounding whitespace are ignored.
pub fn read_codes<R: BufRead>(reader: R, board: &Board) -> Result<Vec<Code>, MastermindError> {
    let mut codes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        codes.push(board.parse_code(text)?);
    }
    Ok(codes)
}

/// Writes the codes with one code on each line, so they can be replayed with [`read_codes`].
pub fn write_codes<W: Write>(
    writer: &mut W,
    codes: &[Code],
    alphabet: &Alphabet,
) -> Result<(), MastermindError> {
    for code in codes {
        writeln!(writer, "{}", alphabet.format_code(code))?;
    }
    writer.flush()?;
    Ok(())
}

/// The conventional file name for a list of codes generated by the named selector.
pub fn code_list_file_name(selector_name: &str, board: &Board) -> String {
    format!(
        "{}_{}_{}.txt",
        selector_name,
        board.peg_count(),
        board.alphabet().len()
    )
}
