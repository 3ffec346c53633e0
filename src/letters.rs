//! Letter to bit position mapping and letter rarity ranks.

use itertools::Itertools;

use crate::error::{Error, Result};

pub const ALPHABET_LEN: usize = 26;

/// Bit position per letter `a..=z`, rarest letter at bit 0.
pub const FREQUENCY_RANKED_BITS: [u8; ALPHABET_LEN] = [
    16, 9, 23, 25, 22, 10, 21, 5, 24, 1, 7, 12, 15, 6, 20, 3, 2, 11, 14, 19, 13, 17, 0, 8, 18, 4,
];

const BIT_ORDER: [u8; ALPHABET_LEN] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
];

/// Immutable mapping used by the encoder.
///
/// `bit_position_of[letter]` assigns each letter its bit in a word mask and
/// `rarity_of[bit]` ranks that bit, lower meaning rarer. Both are
/// permutations of `0..26`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterModel {
    bit_position_of: [u8; ALPHABET_LEN],
    rarity_of: [u8; ALPHABET_LEN],
    letter_at: [u8; ALPHABET_LEN],
}

impl LetterModel {
    pub fn new(bit_position_of: [u8; ALPHABET_LEN], rarity_of: [u8; ALPHABET_LEN]) -> Result<Self> {
        check_permutation("bit_position_of", &bit_position_of)?;
        check_permutation("rarity_of", &rarity_of)?;
        Ok(Self::build(bit_position_of, rarity_of))
    }

    /// The precomputed frequency remap. Rarity follows bit order.
    pub fn frequency_ranked() -> Self {
        Self::build(FREQUENCY_RANKED_BITS, BIT_ORDER)
    }

    /// `a` at bit 0 through `z` at bit 25.
    pub fn identity() -> Self {
        Self::build(BIT_ORDER, BIT_ORDER)
    }

    /// Remap derived from letter counts over `words`: the least used letter
    /// gets bit 0, ties broken alphabetically. Non-letters are ignored.
    pub fn from_word_frequencies<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut freqs = [0usize; ALPHABET_LEN];
        for word in words {
            for b in word.bytes().filter(u8::is_ascii_alphabetic) {
                freqs[(b.to_ascii_lowercase() - b'a') as usize] += 1;
            }
        }

        let mut bits = [0u8; ALPHABET_LEN];
        freqs
            .iter()
            .enumerate()
            .sorted_by_key(|&(letter, freq)| (*freq, letter))
            .enumerate()
            .for_each(|(bit, (letter, _))| bits[letter] = bit as u8);
        Self::build(bits, BIT_ORDER)
    }

    fn build(bit_position_of: [u8; ALPHABET_LEN], rarity_of: [u8; ALPHABET_LEN]) -> Self {
        let mut letter_at = [0u8; ALPHABET_LEN];
        for (letter, &bit) in bit_position_of.iter().enumerate() {
            letter_at[bit as usize] = letter as u8;
        }
        Self {
            bit_position_of,
            rarity_of,
            letter_at,
        }
    }

    /// Bit for a lowercase ASCII letter, `None` for anything else.
    #[inline]
    pub fn bit_position_of(&self, letter: u8) -> Option<u32> {
        letter
            .is_ascii_lowercase()
            .then(|| self.bit_position_of[(letter - b'a') as usize] as u32)
    }

    #[inline]
    pub fn rarity_of(&self, bit: u32) -> u32 {
        self.rarity_of[bit as usize] as u32
    }

    /// Inverse of [`bit_position_of`](Self::bit_position_of).
    pub fn letter_at(&self, bit: u32) -> char {
        (b'a' + self.letter_at[bit as usize]) as char
    }
}

impl Default for LetterModel {
    fn default() -> Self {
        Self::frequency_ranked()
    }
}

fn check_permutation(name: &str, table: &[u8; ALPHABET_LEN]) -> Result<()> {
    let mut seen = 0u32;
    for &v in table {
        if v as usize >= ALPHABET_LEN {
            return Err(Error::InvalidLetterModel(format!(
                "{name} contains out of range position {v}"
            )));
        }
        if seen & (1 << v) != 0 {
            return Err(Error::InvalidLetterModel(format!(
                "{name} assigns position {v} twice"
            )));
        }
        seen |= 1 << v;
    }
    Ok(())
}
