use thiserror::Error;

/// Everything that can go wrong when binning, interpolating or rate limiting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A size parameter was out of range, like a zero bin count.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The accessor produced NaN or an infinity for the sample at `index`.
    #[error("sample {index} has a non-finite key")]
    NonFiniteSample {
        /// Position of the offending sample in the input
        index: usize,
    },
    /// Rate limiters schedule onto tokio and must be built inside a runtime.
    #[error("no tokio runtime is available to schedule timers on")]
    NoRuntime,
}

/// Result alias used throughout chartkit.
pub type Result<T> = std::result::Result<T, Error>;
