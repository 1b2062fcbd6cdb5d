use crate::data::Color;
use crate::results::MastermindError;
use std::collections::BTreeSet;
use std::result::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One known occurrence of a color in the secret code, along with the positions it may still
/// occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnowledgeEntry {
    pub color: Color,
    /// Positions consistent with all feedback so far, in the order they will be tried.
    candidates: Vec<usize>,
}

impl KnowledgeEntry {
    pub fn new(color: Color, candidates: Vec<usize>) -> Self {
        KnowledgeEntry { color, candidates }
    }

    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    /// An entry is fixed once a single candidate position remains.
    pub fn is_fixed(&self) -> bool {
        self.candidates.len() == 1
    }

    /// Returns the position of this occurrence, if it is fixed.
    pub fn fixed_position(&self) -> Option<usize> {
        match self.candidates.as_slice() {
            [position] => Some(*position),
            _ => None,
        }
    }

    /// The next position to try for this occurrence.
    pub fn next_candidate(&self) -> Option<usize> {
        self.candidates.first().copied()
    }
}

/// Tracks every color occurrence discovered so far in a round, and where each may be.
///
/// No two entries are ever fixed to the same position, and there are never more entries than
/// positions on the board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnowledgeBase {
    peg_count: usize,
    entries: Vec<KnowledgeEntry>,
    fixed_positions: BTreeSet<usize>,
}

impl KnowledgeBase {
    /// Constructs an empty knowledge base for codes with the given number of pegs.
    pub fn new(peg_count: usize) -> Self {
        KnowledgeBase {
            peg_count,
            entries: Vec::new(),
            fixed_positions: BTreeSet::new(),
        }
    }

    pub fn peg_count(&self) -> usize {
        self.peg_count
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&KnowledgeEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` once every peg of the secret has a matching entry.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.peg_count
    }

    /// Returns `true` once every position has been fixed.
    pub fn is_solved(&self) -> bool {
        self.fixed_positions.len() == self.peg_count
    }

    pub fn num_fixed(&self) -> usize {
        self.fixed_positions.len()
    }

    pub fn fixed_positions(&self) -> &BTreeSet<usize> {
        &self.fixed_positions
    }

    /// Positions that no entry has been fixed to yet, in board order.
    pub fn unfixed_positions(&self) -> Vec<usize> {
        (0..self.peg_count)
            .filter(|position| !self.fixed_positions.contains(position))
            .collect()
    }

    /// The color fixed at the given position, if any.
    pub fn fixed_color_at(&self, position: usize) -> Option<Color> {
        self.entries
            .iter()
            .find(|entry| entry.fixed_position() == Some(position))
            .map(|entry| entry.color)
    }

    /// Returns `true` iff every entry for this color is fixed.
    pub fn is_color_fixed(&self, color: Color) -> bool {
        self.entries
            .iter()
            .filter(|entry| entry.color == color)
            .all(KnowledgeEntry::is_fixed)
    }

    /// Index of the first entry for this color that is not yet fixed.
    pub fn first_unfixed_of(&self, color: Color) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.color == color && !entry.is_fixed())
    }

    /// The number of distinct positions still claimed by some unfixed entry.
    pub fn ambiguity(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.is_fixed())
            .flat_map(|entry| entry.candidates.iter())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Adds up to `count` entries for the color, each able to occupy any unfixed position.
    ///
    /// Returns the number of entries actually added, which is less than `count` if the knowledge
    /// base would otherwise hold more entries than there are pegs.
    pub fn add_entries(&mut self, color: Color, count: usize) -> usize {
        let room = self.peg_count.saturating_sub(self.entries.len());
        let added = count.min(room);
        let unfixed = self.unfixed_positions();
        self.entries.extend(
            std::iter::repeat_with(|| KnowledgeEntry::new(color, unfixed.clone())).take(added),
        );
        added
    }

    /// Fixes the entry at `index` to the given position.
    pub fn fix(&mut self, index: usize, position: usize) -> Result<(), MastermindError> {
        if position >= self.peg_count {
            return Err(MastermindError::InconsistentFeedback);
        }
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(MastermindError::InconsistentFeedback)?;
        if entry.fixed_position() == Some(position) {
            return Ok(());
        }
        if entry.is_fixed() || !self.fixed_positions.insert(position) {
            return Err(MastermindError::InconsistentFeedback);
        }
        entry.candidates = vec![position];
        Ok(())
    }

    /// Removes the position from every unfixed entry of the given color.
    ///
    /// This never empties an entry: an entry that is left with one candidate becomes fixed at
    /// the next [`KnowledgeBase::prune`].
    pub fn discard(&mut self, color: Color, position: usize) {
        for entry in self
            .entries
            .iter_mut()
            .filter(|entry| entry.color == color && entry.candidates.len() > 1)
        {
            entry.candidates.retain(|candidate| *candidate != position);
        }
    }

    /// Removes fixed positions from every unfixed entry, fixing any entry that is left with a
    /// single candidate, until nothing changes.
    ///
    /// Fails if some entry has no candidates left, or if two entries end up claiming the same
    /// position. The offending entry is emptied and the remaining entries are still pruned.
    pub fn prune(&mut self) -> Result<(), MastermindError> {
        let mut outcome = Ok(());
        loop {
            let mut changed = false;
            let mut owned = BTreeSet::new();
            for entry in self.entries.iter_mut() {
                if entry.candidates.len() > 1 {
                    entry
                        .candidates
                        .retain(|candidate| !self.fixed_positions.contains(candidate));
                }
                if entry.candidates.is_empty() {
                    outcome = Err(MastermindError::InconsistentFeedback);
                    continue;
                }
                if let Some(position) = entry.fixed_position() {
                    if owned.insert(position) {
                        changed |= self.fixed_positions.insert(position);
                    } else {
                        entry.candidates.clear();
                        outcome = Err(MastermindError::InconsistentFeedback);
                    }
                }
            }
            if !changed {
                return outcome;
            }
        }
    }

    /// Forgets everything, ready for a new round with the given number of pegs.
    pub fn reset(&mut self, peg_count: usize) {
        self.peg_count = peg_count;
        self.entries.clear();
        self.fixed_positions.clear();
    }
}
