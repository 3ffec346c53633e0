//! Find sets of words that share no letters.
//!
//! Words are encoded as letter bitmasks ([`encode`]), anagrams are folded
//! together and the rest ordered rarest-letter-first ([`Catalog`]), and the
//! combinations are enumerated depth first ([`search`]), split over a worker
//! pool by first index ([`Partitioner`]).
//!
//! ```
//! use disjoint_words::{solve, SearchConfig};
//!
//! let words = ["fjord", "gucks", "nymph", "vibex", "waltz", "zebra"];
//! assert_eq!(solve(words, SearchConfig::default())?, 1);
//! # Ok::<(), disjoint_words::Error>(())
//! ```

pub mod catalog;
pub mod config;
pub mod encode;
pub mod error;
pub mod letters;
pub mod partition;
pub mod pipeline;
pub mod search;

pub use catalog::{capacity_for_budget, Catalog, DedupOrder, LoadStats};
pub use config::SearchConfig;
pub use encode::{encode, Entry, Mask, Rejection};
pub use error::{Error, Result};
pub use letters::LetterModel;
pub use partition::{Partitioner, Progress, Strategy};
pub use pipeline::{solve, Outcome, Solver};
pub use search::{SearchParams, Searcher};
