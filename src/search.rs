//! Depth-first enumeration of disjoint word combinations.
//!
//! A combination is a strictly increasing tuple of catalog indices whose
//! masks are pairwise disjoint and whose union has exactly
//! [`SearchParams::total_bits`] bits set. Requiring increasing indices means
//! every set of words is visited once, whatever order it could be picked in.

use std::ops::Range;

use crate::catalog::Catalog;
use crate::encode::Mask;

/// Shape of the combinations being searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub combo_size: usize,
    pub total_bits: u32,
}

impl SearchParams {
    pub fn new(combo_size: usize, total_bits: u32) -> Self {
        Self {
            combo_size,
            total_bits,
        }
    }

    /// `combo_size` words of `word_length` letters, no letter shared.
    pub fn exact_cover(word_length: usize, combo_size: usize) -> Self {
        Self::new(combo_size, cover_bits(word_length, combo_size))
    }
}

/// Letters covered by `combo_size` disjoint words of `word_length` letters.
/// Saturates at `u32::MAX` rather than wrapping.
pub fn cover_bits(word_length: usize, combo_size: usize) -> u32 {
    word_length
        .checked_mul(combo_size)
        .and_then(|bits| u32::try_from(bits).ok())
        .unwrap_or(u32::MAX)
}

/// Receives each accepted tuple of catalog indices.
pub trait Sink {
    fn accept(&mut self, tuple: &[usize]);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub count: u64,
}

impl Sink for Counter {
    #[inline]
    fn accept(&mut self, _tuple: &[usize]) {
        self.count += 1;
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Collector {
    pub tuples: Vec<Vec<usize>>,
}

impl Sink for Collector {
    fn accept(&mut self, tuple: &[usize]) {
        self.tuples.push(tuple.to_vec());
    }
}

/// Read-only search state, shared by reference between workers.
#[derive(Debug, Clone)]
pub struct Searcher {
    masks: Vec<Mask>,
    params: SearchParams,
}

impl Searcher {
    pub fn new(catalog: &Catalog, params: SearchParams) -> Self {
        Self {
            masks: catalog.entries().iter().map(|e| e.mask()).collect(),
            params,
        }
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn params(&self) -> SearchParams {
        self.params
    }

    /// Fewer entries than words per combination means nothing to search.
    pub fn is_searchable(&self) -> bool {
        self.params.combo_size > 0 && self.masks.len() >= self.params.combo_size
    }

    /// Visit every combination whose first index lies in `outer`. Deeper
    /// levels range over the rest of the catalog.
    pub fn visit_range<S: Sink>(&self, outer: Range<usize>, sink: &mut S) {
        for first in outer {
            self.visit_root(first, sink);
        }
    }

    /// Visit every combination whose first index is `first`.
    pub fn visit_root<S: Sink>(&self, first: usize, sink: &mut S) {
        if !self.is_searchable() || first >= self.masks.len() {
            return;
        }

        let mut walk = Walk {
            masks: &self.masks,
            params: self.params,
            tuple: Vec::with_capacity(self.params.combo_size),
            sink,
        };
        walk.descend(first..first + 1, 0, 0);
    }
}

struct Walk<'a, S> {
    masks: &'a [Mask],
    params: SearchParams,
    tuple: Vec<usize>,
    sink: &'a mut S,
}

impl<S: Sink> Walk<'_, S> {
    /// Pick the next index from `candidates`, given the letters already used
    /// and their count.
    fn descend(&mut self, candidates: Range<usize>, used: Mask, bits: u32) {
        let left = self.params.combo_size - self.tuple.len();
        // Leave room for the levels below this one.
        let end = candidates.end.min(self.masks.len() + 1 - left);

        if left == 1 {
            let deficit = self.params.total_bits - bits;
            for i in candidates.start..end {
                let mask = self.masks[i];
                if mask & used == 0 && mask.count_ones() == deficit {
                    self.tuple.push(i);
                    self.sink.accept(&self.tuple);
                    self.tuple.pop();
                }
            }
            return;
        }

        for i in candidates.start..end {
            let mask = self.masks[i];
            if mask & used != 0 {
                continue;
            }
            let bits = bits + mask.count_ones();
            if bits > self.params.total_bits {
                continue;
            }
            self.tuple.push(i);
            self.descend(i + 1..self.masks.len(), used | mask, bits);
            self.tuple.pop();
        }
    }
}

/// Count every combination in `catalog`, single threaded.
pub fn count(catalog: &Catalog, params: SearchParams) -> u64 {
    count_range(catalog, params, 0..catalog.len())
}

/// Count combinations whose first index lies in `outer`.
pub fn count_range(catalog: &Catalog, params: SearchParams, outer: Range<usize>) -> u64 {
    let mut counter = Counter::default();
    Searcher::new(catalog, params).visit_range(outer, &mut counter);
    counter.count
}

/// Every combination in `catalog` as index tuples, single threaded.
pub fn collect(catalog: &Catalog, params: SearchParams) -> Vec<Vec<usize>> {
    collect_range(catalog, params, 0..catalog.len())
}

pub fn collect_range(
    catalog: &Catalog,
    params: SearchParams,
    outer: Range<usize>,
) -> Vec<Vec<usize>> {
    let mut collector = Collector::default();
    Searcher::new(catalog, params).visit_range(outer, &mut collector);
    collector.tuples
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::encode::{encode, Entry};
    use crate::letters::LetterModel;

    fn catalog(words: &[&str], len: usize) -> Catalog {
        let model = LetterModel::identity();
        let entries: Vec<Entry> = words
            .iter()
            .map(|w| encode(w, len, &model).unwrap())
            .collect();
        Catalog::from_ordered(entries).unwrap()
    }

    fn brute_force(catalog: &Catalog, params: SearchParams) -> Vec<Vec<usize>> {
        (0..catalog.len())
            .combinations(params.combo_size)
            .filter(|tuple| {
                let masks = tuple
                    .iter()
                    .map(|&i| catalog.entries()[i].mask())
                    .collect_vec();
                masks.iter().tuple_combinations().all(|(a, b)| a & b == 0)
                    && masks.iter().fold(0, |acc, m| acc | m).count_ones() == params.total_bits
            })
            .collect()
    }

    #[test]
    fn two_letter_pairs() {
        let catalog = catalog(&["ab", "cd", "ac", "bd", "ae"], 2);
        let params = SearchParams::new(2, 4);
        assert_eq!(
            collect(&catalog, params),
            vec![vec![0, 1], vec![1, 4], vec![2, 3], vec![3, 4]]
        );
        assert_eq!(count(&catalog, params), 4);
    }

    #[test]
    fn too_few_entries_is_zero() {
        let catalog = catalog(&["ab", "cd"], 2);
        assert_eq!(count(&catalog, SearchParams::new(3, 6)), 0);
        assert_eq!(count(&Catalog::default(), SearchParams::new(2, 4)), 0);
    }

    #[test]
    fn total_bits_below_full_cover_needs_shorter_words() {
        // All words have 2 letters, so no pair covers exactly 3 bits.
        let catalog = catalog(&["ab", "cd", "ef"], 2);
        assert_eq!(count(&catalog, SearchParams::new(2, 3)), 0);
        assert_eq!(count(&catalog, SearchParams::new(3, 6)), 1);
        assert_eq!(count(&catalog, SearchParams::new(2, 5)), 0);
    }

    #[test]
    fn mixed_lengths_hit_the_deficit() {
        let model = LetterModel::identity();
        let entries = vec![
            encode("ab", 2, &model).unwrap(),
            encode("cde", 3, &model).unwrap(),
            encode("fg", 2, &model).unwrap(),
            encode("hij", 3, &model).unwrap(),
        ];
        let catalog = Catalog::from_ordered(entries).unwrap();
        let params = SearchParams::new(2, 5);
        assert_eq!(
            collect(&catalog, params),
            vec![vec![0, 1], vec![0, 3], vec![1, 2], vec![2, 3]]
        );
        assert_eq!(collect(&catalog, params), brute_force(&catalog, params));
    }

    #[test]
    fn matches_brute_force() {
        let words = [
            "abc", "def", "ghi", "jkl", "mno", "adg", "beh", "cfi", "xyz", "pqr", "stu", "vwa",
            "bdx", "ekq", "lmz", "cgu", "hnr",
        ];
        let catalog = catalog(&words, 3);
        for combo_size in 2..=5 {
            let params = SearchParams::exact_cover(3, combo_size);
            let expected = brute_force(&catalog, params);
            assert_eq!(collect(&catalog, params), expected, "combo_size {combo_size}");
            assert_eq!(count(&catalog, params), expected.len() as u64);
        }
    }

    #[test]
    fn ranges_split_the_count() {
        let words = ["abc", "def", "ghi", "jkl", "mno", "adg", "beh", "cfi", "xyz", "pqr"];
        let catalog = catalog(&words, 3);
        let params = SearchParams::exact_cover(3, 3);
        let whole = count(&catalog, params);
        let split: u64 = [0..3, 3..4, 4..10]
            .into_iter()
            .map(|r| count_range(&catalog, params, r))
            .sum();
        assert_eq!(whole, split);
        assert!(whole > 0);
    }

    #[test]
    fn exact_cover_takes_word_length_first() {
        assert_eq!(SearchParams::exact_cover(2, 3), SearchParams::new(3, 6));
        assert_eq!(SearchParams::exact_cover(6, 4), SearchParams::new(4, 24));
    }

    #[test]
    fn cover_bits_saturates() {
        assert_eq!(cover_bits(5, 5), 25);
        assert_eq!(cover_bits(5, 858_993_460), u32::MAX);
        assert_eq!(cover_bits(usize::MAX, 2), u32::MAX);
    }

    #[test]
    fn tuples_are_strictly_increasing_and_disjoint() {
        let words = ["abc", "def", "ghi", "jkl", "mno", "adg", "beh", "cfi", "xyz", "pqr"];
        let catalog = catalog(&words, 3);
        let tuples = collect(&catalog, SearchParams::exact_cover(3, 3));
        assert!(tuples.iter().all_unique());
        for tuple in &tuples {
            assert!(tuple.windows(2).all(|w| w[0] < w[1]));
            let words = catalog.words_of(tuple);
            assert_eq!(words.concat().chars().unique().count(), 9);
        }
    }
}
