//! Linear densification of a series

use crate::{Error, Result};

/// Insert `multiple - 1` evenly spaced values between each pair of neighbours.
///
/// ```
/// let series = chartkit::interpolate(&[0_u8, 12, 24], 2).expect("multiple is positive");
/// assert_eq!(vec![0.0, 6.0, 12.0, 18.0, 24.0], series);
/// ```
pub fn interpolate<T>(data: &[T], multiple: usize) -> Result<Vec<f64>>
where
    T: Copy + Into<f64>,
{
    interpolate_by(data, multiple, |point: &T| (*point).into())
}

/// Like [`interpolate`], reading each point through `accessor`.
///
/// For `n` points the result has `(n - 1) * multiple + 1` values. A pair
/// `(a, b)` contributes `a + (b - a) * k / multiple` for `k` in `0..multiple`,
/// and the last point is emitted as-is. Empty input gives an empty series.
pub fn interpolate_by<T>(
    data: &[T],
    multiple: usize,
    accessor: impl Fn(&T) -> f64,
) -> Result<Vec<f64>> {
    if multiple == 0 {
        return Err(Error::InvalidArgument("multiple must be positive"));
    }
    let Some(last) = data.last() else {
        return Ok(Vec::new());
    };

    let mut series = Vec::with_capacity((data.len() - 1) * multiple + 1);
    let steps = multiple as f64;
    for pair in data.windows(2) {
        let from = accessor(&pair[0]);
        let to = accessor(&pair[1]);
        let delta = to - from;
        series.extend((0..multiple).map(|k| from + delta * k as f64 / steps));
    }
    series.push(accessor(last));
    Ok(series)
}
