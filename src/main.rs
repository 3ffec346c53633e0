use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use disjoint_words::{
    capacity_for_budget, encode, Catalog, DedupOrder, LetterModel, Mask, Progress, SearchConfig,
    Solver, Strategy,
};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use tracing::{info, warn};

/// Find combinations of words that share no letters.
#[derive(Parser, Debug)]
#[command(name = "disjoint-words")]
struct Args {
    /// Dictionary, whitespace separated words.
    #[arg(default_value = "words_alpha.txt")]
    words: PathBuf,

    /// Worker threads (defaults to one per logical CPU).
    #[arg(short = 't', long, env = "DISJOINT_WORDS_THREADS")]
    threads: Option<usize>,

    /// Letters per word.
    #[arg(long, default_value_t = 5)]
    word_length: usize,

    /// Words per combination.
    #[arg(long, default_value_t = 5)]
    combo_size: usize,

    /// Distinct letters a combination must cover (defaults to word length * combo size).
    #[arg(long)]
    total_bits: Option<u32>,

    #[arg(long, value_enum, default_value_t = StrategyArg::Chunked)]
    strategy: StrategyArg,

    #[arg(long, value_enum, default_value_t = DedupArg::MaskFirst)]
    dedup_order: DedupArg,

    /// Which letter to bit remap to use.
    #[arg(long, value_enum, default_value_t = LetterOrder::Fixed)]
    letter_order: LetterOrder,

    /// Memory available for the catalog; caps the number of words loaded.
    #[arg(long, env = "DISJOINT_WORDS_MEMORY_MB")]
    memory_budget_mb: Option<usize>,

    /// Print every combination found.
    #[arg(long)]
    list: bool,

    /// With --list, print every anagram variant of each combination.
    #[arg(long, requires = "list")]
    expand_anagrams: bool,

    /// Hide the progress bar.
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Chunked,
    RarityBuckets,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DedupArg {
    MaskFirst,
    RarityFirst,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LetterOrder {
    /// Precomputed frequency ranking.
    Fixed,
    /// Ranked by letter counts in the loaded dictionary.
    Dictionary,
}

impl Args {
    fn config(&self) -> SearchConfig {
        let mut config = SearchConfig::exact_cover(self.word_length, self.combo_size)
            .with_strategy(match self.strategy {
                StrategyArg::Chunked => Strategy::Chunked,
                StrategyArg::RarityBuckets => Strategy::RarityBuckets,
            })
            .with_dedup_order(match self.dedup_order {
                DedupArg::MaskFirst => DedupOrder::MaskFirst,
                DedupArg::RarityFirst => DedupOrder::RarityFirst,
            });
        if let Some(total_bits) = self.total_bits {
            config = config.with_total_bits(total_bits);
        }
        if let Some(threads) = self.threads {
            config = config.with_workers(threads);
        }
        if let Some(mb) = self.memory_budget_mb {
            let budget = mb.saturating_mul(1024 * 1024);
            config = config.with_max_words(capacity_for_budget(budget, self.word_length));
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("disjoint_words=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let text = fs::read_to_string(&args.words)
        .with_context(|| format!("failed to read {}", args.words.display()))?;
    let all_words = text.split_whitespace().collect_vec();

    let model = match args.letter_order {
        LetterOrder::Fixed => LetterModel::frequency_ranked(),
        LetterOrder::Dictionary => LetterModel::from_word_frequencies(
            all_words
                .iter()
                .copied()
                .filter(|w| w.chars().count() == args.word_length),
        ),
    };
    let solver = Solver::new(args.config(), model)?;
    let config = solver.config();

    let (catalog, stats) = solver.load(&all_words);
    println!("Read {} total words from {}", stats.words_read, args.words.display());
    println!(
        "Found {} valid {}-letter words with unique letters",
        stats.words_read - stats.rejected() - stats.over_capacity,
        config.word_length
    );
    println!("Kept {} after removing anagrams", catalog.len());
    if stats.over_capacity > 0 {
        warn!(
            skipped = stats.over_capacity,
            "memory budget reached, remaining words not loaded"
        );
    }

    if catalog.len() < config.combo_size {
        println!(
            "Need at least {} words to find {}-word combinations",
            config.combo_size, config.combo_size
        );
        println!("Total valid {}-word combinations: 0", config.combo_size);
        return Ok(());
    }

    let workers = solver.workers().clamp(1, catalog.len());
    println!("\nUsing {workers} threads");
    println!(
        "Starting search for {}-word combinations using {} letters...",
        config.combo_size, config.total_bits
    );

    let start = Instant::now();
    let progress = Progress::new();
    let (count, tuples) = with_progress_bar(&progress, catalog.len(), args.quiet, || {
        if args.list {
            let tuples = solver.collect(&catalog, Some(&progress))?;
            Ok((tuples.len() as u64, Some(tuples)))
        } else {
            Ok((solver.count(&catalog, Some(&progress))?, None))
        }
    })?;
    println!("\nExecution time: {:.3} seconds", start.elapsed().as_secs_f64());

    if let Some(tuples) = tuples {
        let lines = if args.expand_anagrams {
            expand_anagrams(&all_words, &solver, &catalog, &tuples)
        } else {
            tuples
                .iter()
                .map(|tuple| catalog.words_of(tuple).into_iter().sorted().join(" "))
                .sorted()
                .collect_vec()
        };
        for line in &lines {
            println!("{line}");
        }
        info!(lines = lines.len(), "listed combinations");
    }

    println!("Total valid {}-word combinations: {count}", config.combo_size);
    Ok(())
}

/// Run `search` while a scoped thread redraws a bar from `progress`.
fn with_progress_bar<T>(
    progress: &Progress,
    total: usize,
    hidden: bool,
    search: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let bar = if hidden {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} ({percent}%)")?
            .progress_chars("=>-"),
    );

    let done = AtomicBool::new(false);
    let result = thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                bar.set_position(progress.processed() as u64);
                thread::sleep(Duration::from_millis(100));
            }
        });
        let result = search();
        done.store(true, Ordering::Relaxed);
        result
    });
    bar.set_position(progress.processed() as u64);
    bar.finish();
    result
}

/// Every spelling of each combination: one line per choice of anagram.
fn expand_anagrams(
    all_words: &[&str],
    solver: &Solver,
    catalog: &Catalog,
    tuples: &[Vec<usize>],
) -> Vec<String> {
    let config = solver.config();
    let anagrams: HashMap<Mask, Vec<String>> = all_words
        .iter()
        .filter_map(|w| encode(w, config.word_length, solver.model()).ok())
        .map(|entry| (entry.mask(), entry.text().to_string()))
        .unique()
        .into_group_map();

    tuples
        .iter()
        .flat_map(|tuple| {
            tuple
                .iter()
                .map(|&i| anagrams[&catalog.entries()[i].mask()].iter())
                .multi_cartesian_product()
                .map(|sol| sol.into_iter().sorted().join(" "))
        })
        .sorted()
        .collect()
}
