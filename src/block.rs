//! Cache tile-size computation for blocked n-dimensional iteration.
//!
//! Tile sizes bound the working set of the innermost loops to the L1 target
//! ([`BLOCK_MEMORY_SIZE`]). They are a performance tunable, not a
//! correctness contract: blocked and unblocked traversals produce identical
//! output for identical input.

use crate::{BLOCK_MEMORY_SIZE, CACHE_LINE_SIZE};

/// Compute per-axis tile sizes, dims and strides given innermost-first.
///
/// If the full iteration space already fits the cache target, the dims are
/// returned unchanged (one tile). Otherwise tile extents are reduced by
/// cost-weighted halving, then decremented, until the estimated memory
/// region fits.
pub(crate) fn compute_block_sizes(dims: &[usize], byte_strides: &[&[isize]]) -> Vec<usize> {
    let rank = dims.len();
    if rank == 0 {
        return Vec::new();
    }
    if total_memory_region(dims, byte_strides) <= BLOCK_MEMORY_SIZE {
        return dims.to_vec();
    }

    // Every element lands on its own cache line; tiling cannot help.
    let min_stride = byte_strides
        .iter()
        .filter_map(|s| s.iter().map(|x| x.unsigned_abs()).min())
        .min()
        .unwrap_or(0);
    if min_stride > BLOCK_MEMORY_SIZE {
        return vec![1; rank];
    }

    let costs = axis_costs(rank, byte_strides);
    let mut blocks = dims.to_vec();

    // Halve the most expensive axis until within 2x of the target, then
    // walk down by single decrements.
    while total_memory_region(&blocks, byte_strides) >= 2 * BLOCK_MEMORY_SIZE {
        match most_expensive_axis(&blocks, &costs) {
            Some(i) => blocks[i] = (blocks[i] + 1) / 2,
            None => break,
        }
    }
    while total_memory_region(&blocks, byte_strides) > BLOCK_MEMORY_SIZE {
        match most_expensive_axis(&blocks, &costs) {
            Some(i) => blocks[i] -= 1,
            None => break,
        }
    }

    blocks
}

/// Estimate the memory footprint of one tile, in bytes, accounting for
/// cache-line granularity.
///
/// Strides smaller than a cache line extend a contiguous region; larger
/// strides multiply the number of distinct cache-line blocks touched.
pub(crate) fn total_memory_region(dims: &[usize], byte_strides: &[&[isize]]) -> usize {
    let mut region = 0usize;
    for strides in byte_strides {
        let mut contiguous_bytes = 0usize;
        let mut line_blocks = 1usize;
        for (&d, &s) in dims.iter().zip(strides.iter()) {
            let s_abs = s.unsigned_abs();
            if s_abs < CACHE_LINE_SIZE {
                contiguous_bytes += d.saturating_sub(1) * s_abs;
            } else {
                line_blocks = line_blocks.saturating_mul(d);
            }
        }
        let lines = contiguous_bytes / CACHE_LINE_SIZE + 1;
        region = region.saturating_add(CACHE_LINE_SIZE * lines * line_blocks);
    }
    region
}

// Axis cost: summed stride magnitude across arrays, each capped at one
// cache line.
fn axis_costs(rank: usize, byte_strides: &[&[isize]]) -> Vec<usize> {
    let mut costs = vec![1usize; rank];
    for (axis, cost) in costs.iter_mut().enumerate() {
        for strides in byte_strides {
            *cost += strides[axis].unsigned_abs().min(CACHE_LINE_SIZE);
        }
    }
    costs
}

/// Last axis maximizing `(extent - 1) * cost` among axes still divisible.
fn most_expensive_axis(blocks: &[usize], costs: &[usize]) -> Option<usize> {
    let mut best = None;
    let mut best_score = 0usize;
    for (i, (&b, &c)) in blocks.iter().zip(costs.iter()).enumerate() {
        if b <= 1 {
            continue;
        }
        let score = (b - 1) * c;
        if score >= best_score {
            best_score = score;
            best = Some(i);
        }
    }
    best
}
