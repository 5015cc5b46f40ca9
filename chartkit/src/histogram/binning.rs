use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use super::Bin;
use crate::Extent;

/// `bin_count` equal-width bins over a non-degenerate extent.
pub(super) fn uniform<T>(keyed: Vec<(f64, T)>, extent: Extent, bin_count: usize) -> Vec<Bin<T>> {
    let edges = uniform_edges(extent, bin_count);
    let mut bins: Vec<Bin<T>> = edges.windows(2).map(|w| Bin::new(w[0], w[1])).collect();
    // Inner edges only, so the maximum lands in the last bin.
    let inner = &edges[1..edges.len() - 1];
    for (key, sample) in keyed {
        let index = inner.partition_point(|edge| *edge <= key);
        bins[index].items.push(sample);
    }
    bins
}

/// One bin per distinct key, or uniform bins when there are too many keys.
pub(super) fn quantized<T>(keyed: Vec<(f64, T)>, extent: Extent, bin_count: usize) -> Vec<Bin<T>> {
    let distinct: BTreeSet<OrderedFloat<f64>> =
        keyed.iter().map(|(key, _)| OrderedFloat(*key)).collect();
    if bin_count < distinct.len() {
        log::debug!(
            "{} distinct values exceed {bin_count} bins: binning uniformly",
            distinct.len()
        );
        return uniform(keyed, extent, bin_count);
    }

    let values: Vec<f64> = distinct.into_iter().map(OrderedFloat::into_inner).collect();
    let mut bins: Vec<Bin<T>> = values
        .iter()
        .zip(values.iter().skip(1).chain(values.last()))
        .map(|(x0, x1)| Bin::new(*x0, *x1))
        .collect();
    for (key, sample) in keyed {
        let index = values.partition_point(|value| *value < key);
        bins[index].items.push(sample);
    }
    bins
}

/// `bin_count + 1` ascending edges. The first is `min` and the last is exactly `max`.
///
/// Edges are blended from the endpoints rather than stepped by `max - min`,
/// which overflows for keys near `f64::MAX` apart.
fn uniform_edges(extent: Extent, bin_count: usize) -> Vec<f64> {
    let mut edges: Vec<f64> = (0..bin_count)
        .map(|i| {
            let t = i as f64 / bin_count as f64;
            extent.min * (1.0 - t) + extent.max * t
        })
        .collect();
    edges.push(extent.max);
    edges
}
