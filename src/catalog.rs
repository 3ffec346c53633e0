//! Deduplicated, pruning-ordered word catalog.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::encode::{encode, Entry, Mask, Rejection};
use crate::error::{Error, Result};
use crate::letters::LetterModel;

/// Which anagram survives deduplication. Both orders keep the same masks
/// and yield the same final catalog order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupOrder {
    /// Sort by mask, keep the first per mask, then re-sort by rarity.
    #[default]
    MaskFirst,
    /// Sort by rarity, keep the first per mask.
    RarityFirst,
}

/// Number of entries of `word_length` letters that fit in `budget_bytes`,
/// counting each entry's inline fields and its heap-allocated text.
pub fn capacity_for_budget(budget_bytes: usize, word_length: usize) -> usize {
    budget_bytes / (std::mem::size_of::<Entry>() + word_length)
}

/// Tallies gathered while loading a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub words_read: usize,
    pub wrong_length: usize,
    pub not_a_letter: usize,
    pub repeated_letter: usize,
    pub over_capacity: usize,
    pub anagrams_removed: usize,
}

impl LoadStats {
    pub fn rejected(&self) -> usize {
        self.wrong_length + self.not_a_letter + self.repeated_letter
    }

    pub fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::WrongLength { .. } => self.wrong_length += 1,
            Rejection::NotALetter(_) => self.not_a_letter += 1,
            Rejection::RepeatedLetter(_) => self.repeated_letter += 1,
        }
    }
}

/// Entries with pairwise distinct masks, ordered so that words holding rare
/// letters come first. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    /// Dedup by mask and order by `(rarity_score, mask)`.
    pub fn build(entries: Vec<Entry>, order: DedupOrder) -> Self {
        let before = entries.len();
        let entries = match order {
            DedupOrder::MaskFirst => {
                let uniq = entries
                    .into_iter()
                    .sorted_by(|a, b| mask_key(a).cmp(&mask_key(b)))
                    .dedup_by(|a, b| a.mask() == b.mask())
                    .collect_vec();
                sort_for_pruning(uniq)
            }
            DedupOrder::RarityFirst => entries
                .into_iter()
                .sorted_by(|a, b| rarity_key(a).cmp(&rarity_key(b)))
                .dedup_by(|a, b| a.mask() == b.mask())
                .collect_vec(),
        };
        debug!(before, after = entries.len(), ?order, "deduplicated catalog by mask");
        Self { entries }
    }

    /// Encode `words`, tallying rejections, and build the catalog.
    ///
    /// At most `max_words` words are encoded; the rest only count towards
    /// [`LoadStats::over_capacity`].
    pub fn from_words<I, S>(
        words: I,
        word_length: usize,
        model: &LetterModel,
        order: DedupOrder,
        max_words: Option<usize>,
    ) -> (Self, LoadStats)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let limit = max_words.unwrap_or(usize::MAX);
        let mut stats = LoadStats::default();
        let mut entries = Vec::new();
        for word in words {
            stats.words_read += 1;
            if entries.len() >= limit {
                stats.over_capacity += 1;
                continue;
            }
            match encode(word.as_ref(), word_length, model) {
                Ok(entry) => entries.push(entry),
                Err(rejection) => stats.record(rejection),
            }
        }

        let valid = entries.len();
        let catalog = Self::build(entries, order);
        stats.anagrams_removed = valid - catalog.len();
        debug!(?stats, "loaded catalog");
        (catalog, stats)
    }

    /// Keep the caller's order. Fails on a repeated mask.
    pub fn from_ordered(entries: Vec<Entry>) -> Result<Self> {
        let mut seen: HashMap<Mask, usize> = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if seen.insert(entry.mask(), index).is_some() {
                return Err(Error::DuplicateMask {
                    mask: entry.mask(),
                    index,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Words for a tuple of catalog indices.
    pub fn words_of(&self, tuple: &[usize]) -> Vec<&str> {
        tuple.iter().map(|&i| self.entries[i].text()).collect()
    }

    /// Index ranges of runs sharing a rarity score, rarest first.
    pub fn rarity_buckets(&self) -> Vec<(u32, std::ops::Range<usize>)> {
        let mut buckets = Vec::new();
        let mut start = 0;
        for (score, group) in &self.entries.iter().group_by(|e| e.rarity_score()) {
            let end = start + group.count();
            buckets.push((score, start..end));
            start = end;
        }
        buckets
    }
}

fn mask_key(entry: &Entry) -> (Mask, u32, &str) {
    (entry.mask(), entry.rarity_score(), entry.text())
}

fn rarity_key(entry: &Entry) -> (u32, Mask, &str) {
    (entry.rarity_score(), entry.mask(), entry.text())
}

/// Stable sort by `(rarity_score, mask)`. Idempotent.
pub fn sort_for_pruning(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by_key(|e| (e.rarity_score(), e.mask()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(words: &[&str], len: usize) -> Vec<Entry> {
        let model = LetterModel::identity();
        words
            .iter()
            .map(|w| encode(w, len, &model).unwrap())
            .collect()
    }

    #[test]
    fn removes_anagrams() {
        let catalog = Catalog::build(
            entries(&["stop", "pots", "tops", "cart", "spot"], 4),
            DedupOrder::MaskFirst,
        );
        assert_eq!(catalog.len(), 2);
        let masks = catalog.entries().iter().map(Entry::mask).collect_vec();
        assert!(masks.iter().all_unique());
    }

    #[test]
    fn mask_first_keeps_alphabetically_first_anagram() {
        for order in [DedupOrder::MaskFirst, DedupOrder::RarityFirst] {
            let catalog = Catalog::build(entries(&["tops", "stop", "pots"], 4), order);
            assert_eq!(catalog.words_of(&[0]), ["pots"]);
        }
    }

    #[test]
    fn dedup_orders_agree_on_masks_and_order() {
        let words = ["bdf", "ace", "fdb", "xyz", "cea", "bad", "ghi", "dab"];
        let a = Catalog::build(entries(&words, 3), DedupOrder::MaskFirst);
        let b = Catalog::build(entries(&words, 3), DedupOrder::RarityFirst);
        assert_eq!(
            a.entries().iter().map(Entry::mask).collect_vec(),
            b.entries().iter().map(Entry::mask).collect_vec()
        );
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let words = ["bdf", "ace", "fdb", "xyz", "cea", "bad", "ghi", "dab"];
        let once = Catalog::build(entries(&words, 3), DedupOrder::MaskFirst);
        let twice = Catalog::build(once.entries().to_vec(), DedupOrder::MaskFirst);
        assert_eq!(once, twice);
        assert_eq!(sort_for_pruning(once.entries().to_vec()), once.entries());
    }

    #[test]
    fn ordered_rarest_first() {
        let words = entries(&["xyz", "ghi", "bcd", "abe"], 3);
        let catalog = Catalog::build(words, DedupOrder::MaskFirst);
        assert_eq!(catalog.words_of(&[0, 1, 2, 3]), ["abe", "bcd", "ghi", "xyz"]);
        let scores = catalog
            .entries()
            .iter()
            .map(Entry::rarity_score)
            .collect_vec();
        assert_eq!(scores, [0, 1, 6, 23]);
    }

    #[test]
    fn from_ordered_rejects_duplicate_masks() {
        assert!(Catalog::from_ordered(entries(&["ab", "cd"], 2)).is_ok());
        assert!(matches!(
            Catalog::from_ordered(entries(&["ab", "cd", "ba"], 2)),
            Err(Error::DuplicateMask { index: 2, .. })
        ));
    }

    #[test]
    fn from_words_tallies_rejections() {
        let model = LetterModel::identity();
        let words = ["ab", "ba", "cd", "aa", "a1", "abc", "ef"];
        let (catalog, stats) = Catalog::from_words(words, 2, &model, DedupOrder::MaskFirst, None);
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            stats,
            LoadStats {
                words_read: 7,
                wrong_length: 1,
                not_a_letter: 1,
                repeated_letter: 1,
                over_capacity: 0,
                anagrams_removed: 1,
            }
        );
    }

    #[test]
    fn from_words_respects_capacity() {
        let model = LetterModel::identity();
        let words = ["ab", "cd", "ef", "gh"];
        let (catalog, stats) =
            Catalog::from_words(words, 2, &model, DedupOrder::MaskFirst, Some(2));
        assert_eq!(catalog.len(), 2);
        assert_eq!(stats.over_capacity, 2);
    }

    #[test]
    fn capacity_counts_word_text() {
        let per_entry = std::mem::size_of::<Entry>() + 5;
        assert_eq!(capacity_for_budget(0, 5), 0);
        assert_eq!(capacity_for_budget(per_entry - 1, 5), 0);
        assert_eq!(capacity_for_budget(per_entry * 100, 5), 100);
        assert!(capacity_for_budget(per_entry * 100, 12) < 100);
    }

    #[test]
    fn buckets_cover_catalog() {
        let catalog = Catalog::build(
            entries(&["abc", "ade", "bcd", "bef", "cgh", "xyz"], 3),
            DedupOrder::MaskFirst,
        );
        let buckets = catalog.rarity_buckets();
        assert_eq!(buckets, [(0, 0..2), (1, 2..4), (2, 4..5), (23, 5..6)]);
    }
}
