//! Raw words in, combination count out.

use tracing::info;

use crate::catalog::{Catalog, LoadStats};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::letters::LetterModel;
use crate::partition::{Partitioner, Progress};

/// Validated configuration bound to a letter model.
#[derive(Debug, Clone)]
pub struct Solver {
    config: SearchConfig,
    model: LetterModel,
}

/// Everything a caller needs to report on a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub catalog: Catalog,
    pub stats: LoadStats,
    pub count: u64,
    /// Present when combinations were materialized.
    pub tuples: Option<Vec<Vec<usize>>>,
}

impl Outcome {
    /// Accepted combinations as words, in catalog index order.
    pub fn combinations(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.tuples
            .iter()
            .flatten()
            .map(|tuple| self.catalog.words_of(tuple))
    }
}

impl Solver {
    pub fn new(config: SearchConfig, model: LetterModel) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn model(&self) -> &LetterModel {
        &self.model
    }

    /// Requested worker count, before clamping to the catalog size.
    pub fn workers(&self) -> usize {
        self.config.workers.unwrap_or_else(rayon::current_num_threads)
    }

    pub fn load<I, S>(&self, words: I) -> (Catalog, LoadStats)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (catalog, stats) = Catalog::from_words(
            words,
            self.config.word_length,
            &self.model,
            self.config.dedup_order,
            self.config.max_words,
        );
        info!(
            read = stats.words_read,
            rejected = stats.rejected(),
            anagrams = stats.anagrams_removed,
            unique = catalog.len(),
            "catalog ready"
        );
        (catalog, stats)
    }

    fn partitioner(&self) -> Partitioner {
        Partitioner::new(self.workers(), self.config.strategy)
    }

    pub fn count(&self, catalog: &Catalog, progress: Option<&Progress>) -> Result<u64> {
        self.partitioner().count(catalog, self.config.params(), progress)
    }

    pub fn collect(
        &self,
        catalog: &Catalog,
        progress: Option<&Progress>,
    ) -> Result<Vec<Vec<usize>>> {
        self.partitioner().collect(catalog, self.config.params(), progress)
    }

    /// Load `words` and search them. With `materialize` the accepted tuples
    /// are kept as well as counted.
    pub fn solve<I, S>(&self, words: I, materialize: bool) -> Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (catalog, stats) = self.load(words);
        let (count, tuples) = if materialize {
            let tuples = self.collect(&catalog, None)?;
            (tuples.len() as u64, Some(tuples))
        } else {
            (self.count(&catalog, None)?, None)
        };
        Ok(Outcome {
            catalog,
            stats,
            count,
            tuples,
        })
    }
}

/// Count combinations over `words` with the default letter model.
pub fn solve<I, S>(words: I, config: SearchConfig) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let solver = Solver::new(config, LetterModel::default())?;
    Ok(solver.solve(words, false)?.count)
}
