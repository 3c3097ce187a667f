//! Iteration-order planning for the n-dimensional engine.
//!
//! When a blocked traversal is selected, axes are permuted so that the axis
//! with the smallest weighted byte-stride magnitude is iterated innermost.
//! The output array's strides are weighted double: writes benefit more from
//! locality than reads.

/// Compute an axis permutation, innermost axis first.
///
/// `byte_strides` holds one stride array per argument; `dest_index`
/// identifies the output argument for double weighting. Ties preserve the
/// original axis order.
pub(crate) fn compute_order(byte_strides: &[&[isize]], dest_index: Option<usize>) -> Vec<usize> {
    let rank = byte_strides.first().map_or(0, |s| s.len());
    let mut order: Vec<usize> = (0..rank).collect();
    order.sort_by_key(|&axis| axis_score(axis, byte_strides, dest_index));
    order
}

fn axis_score(axis: usize, byte_strides: &[&[isize]], dest_index: Option<usize>) -> usize {
    let mut score = 0usize;
    for (i, strides) in byte_strides.iter().enumerate() {
        let weight = if dest_index == Some(i) { 2 } else { 1 };
        score = score.saturating_add(weight * strides[axis].unsigned_abs());
    }
    score
}
