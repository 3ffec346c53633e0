use thiserror::Error;

use crate::encode::Mask;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the core. Malformed words are not errors, see
/// [`crate::encode::Rejection`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid letter model: {0}")]
    InvalidLetterModel(String),

    #[error("duplicate mask {mask:#b} at catalog index {index}")]
    DuplicateMask { mask: Mask, index: usize },

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("a search worker terminated abnormally: {0}")]
    WorkerPanicked(String),
}
