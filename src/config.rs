use crate::catalog::DedupOrder;
use crate::error::{Error, Result};
use crate::letters::ALPHABET_LEN;
use crate::partition::Strategy;
use crate::search::{cover_bits, SearchParams};

/// Options accepted by [`crate::pipeline::solve`].
///
/// The defaults describe the classic puzzle: five five-letter words covering
/// twenty-five distinct letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub word_length: usize,
    pub combo_size: usize,
    pub total_bits: u32,
    /// `None` uses rayon's default thread count.
    pub workers: Option<usize>,
    pub strategy: Strategy,
    pub dedup_order: DedupOrder,
    /// Cap on words encoded, usually from [`crate::catalog::capacity_for_budget`].
    pub max_words: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            word_length: 5,
            combo_size: 5,
            total_bits: 25,
            workers: None,
            strategy: Strategy::default(),
            dedup_order: DedupOrder::default(),
            max_words: None,
        }
    }
}

impl SearchConfig {
    /// `combo_size` words of `word_length` letters, no letter shared.
    ///
    /// Out of range products saturate and are refused by [`validate`](Self::validate).
    pub fn exact_cover(word_length: usize, combo_size: usize) -> Self {
        Self {
            word_length,
            combo_size,
            total_bits: cover_bits(word_length, combo_size),
            ..Self::default()
        }
    }

    pub fn with_total_bits(mut self, total_bits: u32) -> Self {
        self.total_bits = total_bits;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_dedup_order(mut self, dedup_order: DedupOrder) -> Self {
        self.dedup_order = dedup_order;
        self
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = Some(max_words);
        self
    }

    pub fn params(&self) -> SearchParams {
        SearchParams::new(self.combo_size, self.total_bits)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=ALPHABET_LEN).contains(&self.word_length) {
            return Err(Error::InvalidConfig(format!(
                "word length must be between 1 and {ALPHABET_LEN}, got {}",
                self.word_length
            )));
        }
        if !(2..=ALPHABET_LEN).contains(&self.combo_size) {
            return Err(Error::InvalidConfig(format!(
                "combination size must be between 2 and {ALPHABET_LEN}, got {}",
                self.combo_size
            )));
        }
        if !(1..=ALPHABET_LEN as u32).contains(&self.total_bits) {
            return Err(Error::InvalidConfig(format!(
                "total letters must be between 1 and {ALPHABET_LEN}, got {}",
                self.total_bits
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::InvalidConfig("worker count must be positive".into()));
        }
        Ok(())
    }
}
