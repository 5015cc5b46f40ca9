//! Partitioning samples into contiguous numeric bins

mod binning;

use std::fmt::Display;

use crate::{Error, Extent, Result};

/// How bin boundaries are chosen from the data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BinningMode {
    /// Exactly `bin_count` equal-width bins spanning `[min, max]`
    #[default]
    Uniform,
    /// Keys are discrete values. When there are no more distinct values than
    /// `bin_count`, each value gets its own bin; otherwise this is `Uniform`.
    Quantized,
}

impl Display for BinningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinningMode::Uniform => write!(f, "uniform"),
            BinningMode::Quantized => write!(f, "quantized"),
        }
    }
}

/// A numeric interval `[x0, x1)` and the samples whose keys fall in it.
/// The last bin of a histogram is closed: `[x0, x1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin<T> {
    /// Inclusive lower bound
    pub x0: f64,
    /// Upper bound; exclusive except on the last bin
    pub x1: f64,
    /// Samples in input order
    pub items: Vec<T>,
}

impl<T> Bin<T> {
    pub(crate) fn new(x0: f64, x1: f64) -> Self {
        Self {
            x0,
            x1,
            items: Vec::new(),
        }
    }

    /// Number of samples in this bin
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// No samples landed here
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `x1 - x0`
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Ordered, contiguous bins. `bins[i].x1 == bins[i + 1].x0`, and every input
/// sample is in exactly one bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram<T> {
    bins: Vec<Bin<T>>,
}

impl<T> Default for Histogram<T> {
    fn default() -> Self {
        Self { bins: Vec::new() }
    }
}

impl<T> Histogram<T> {
    /// Bins in ascending order
    pub fn bins(&self) -> &[Bin<T>] {
        &self.bins
    }

    /// Consume this histogram into its bins
    pub fn into_bins(self) -> Vec<Bin<T>> {
        self.bins
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether there are no bins at all. Only true for empty input.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total samples across all bins
    pub fn total(&self) -> usize {
        self.bins.iter().map(Bin::len).sum()
    }

    /// Sample count of each bin, in bin order
    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(Bin::len).collect()
    }

    /// Iterate the bins in ascending order
    pub fn iter(&self) -> std::slice::Iter<'_, Bin<T>> {
        self.bins.iter()
    }
}

impl<T> IntoIterator for Histogram<T> {
    type Item = Bin<T>;
    type IntoIter = std::vec::IntoIter<Bin<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Histogram<T> {
    type Item = &'a Bin<T>;
    type IntoIter = std::slice::Iter<'a, Bin<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}

impl<T> Display for Histogram<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, bin) in self.bins.iter().enumerate() {
            if 0 < i {
                write!(f, ", ")?;
            }
            let close = if i + 1 == self.bins.len() { ']' } else { ')' };
            write!(f, "[{}, {}{}: {}", bin.x0, bin.x1, close, bin.len())?;
        }
        write!(f, "]")
    }
}

/// Bin numeric samples into `bin_count` equal-width bins.
///
/// ```
/// let binned = chartkit::histogram([0_u8, 1, 2, 3, 4], 2).expect("bin count is positive");
/// assert_eq!(vec![2, 3], binned.counts());
/// ```
pub fn histogram<T>(data: impl IntoIterator<Item = T>, bin_count: usize) -> Result<Histogram<T>>
where
    T: Copy + Into<f64>,
{
    histogram_by(data, bin_count, BinningMode::Uniform, |sample: &T| {
        (*sample).into()
    })
}

/// Bin arbitrary samples by the key `accessor` extracts from each of them.
///
/// Empty input produces a histogram with no bins. When every key is the same
/// value, one zero-width bin holds all samples regardless of `bin_count`.
///
/// ```
/// use chartkit::BinningMode;
///
/// let ages = [("a", 3), ("b", 5), ("c", 3)];
/// let binned = chartkit::histogram_by(ages, 10, BinningMode::Quantized, |(_, age)| *age as f64)
///     .expect("bin count is positive");
/// assert_eq!(vec![2, 1], binned.counts());
/// ```
pub fn histogram_by<T>(
    data: impl IntoIterator<Item = T>,
    bin_count: usize,
    mode: BinningMode,
    accessor: impl Fn(&T) -> f64,
) -> Result<Histogram<T>> {
    if bin_count == 0 {
        return Err(Error::InvalidArgument("bin count must be positive"));
    }

    let keyed = data
        .into_iter()
        .enumerate()
        .map(|(index, sample)| {
            let key = accessor(&sample);
            if key.is_finite() {
                Ok((key, sample))
            } else {
                Err(Error::NonFiniteSample { index })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if keyed.is_empty() {
        log::trace!("no samples, no bins");
        return Ok(Histogram::default());
    }

    let extent: Extent = keyed.iter().map(|(key, _)| *key).collect();
    if extent.is_degenerate() {
        log::debug!("degenerate extent {extent}: using a single zero-width bin");
        let mut bin = Bin::new(extent.min, extent.max);
        bin.items = keyed.into_iter().map(|(_, sample)| sample).collect();
        return Ok(Histogram { bins: vec![bin] });
    }

    let bins = match mode {
        BinningMode::Uniform => binning::uniform(keyed, extent, bin_count),
        BinningMode::Quantized => binning::quantized(keyed, extent, bin_count),
    };
    Ok(Histogram { bins })
}
