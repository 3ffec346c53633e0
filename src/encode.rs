//! Word to bitmask encoding.

use std::fmt;

use thiserror::Error;

use crate::letters::LetterModel;

/// One bit per letter, positioned by the [`LetterModel`].
pub type Mask = u32;

/// Why a word did not become an [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
    #[error("expected {expected} letters, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("{0:?} is not a letter")]
    NotALetter(char),
    #[error("letter {0:?} repeats")]
    RepeatedLetter(char),
}

/// A validated word: `mask` has exactly one bit per (distinct) letter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    text: Box<str>,
    mask: Mask,
    rarity_score: u32,
}

impl Entry {
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Rarity rank of the word's rarest letter. Sort key only.
    #[inline]
    pub fn rarity_score(&self) -> u32 {
        self.rarity_score
    }

    #[inline]
    pub fn letter_count(&self) -> u32 {
        self.mask.count_ones()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#028b} {} ({})", self.mask, self.text, self.rarity_score)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Encode `word` if it has exactly `word_length` distinct ASCII letters.
///
/// Case is ignored; the stored text is lowercased.
pub fn encode(word: &str, word_length: usize, model: &LetterModel) -> Result<Entry, Rejection> {
    let found = word.chars().count();
    if found != word_length {
        return Err(Rejection::WrongLength {
            expected: word_length,
            found,
        });
    }

    let mut mask: Mask = 0;
    let mut rarity_score = u32::MAX;
    for c in word.chars() {
        let letter = c.to_ascii_lowercase();
        let bit = u8::try_from(letter)
            .ok()
            .and_then(|b| model.bit_position_of(b))
            .ok_or(Rejection::NotALetter(c))?;
        if mask & (1 << bit) != 0 {
            return Err(Rejection::RepeatedLetter(letter));
        }
        mask |= 1 << bit;
        rarity_score = rarity_score.min(model.rarity_of(bit));
    }

    Ok(Entry {
        text: word.to_ascii_lowercase().into_boxed_str(),
        mask,
        rarity_score,
    })
}
