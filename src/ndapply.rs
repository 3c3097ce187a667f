//! N-dimensional apply engine.
//!
//! Generalizes the flat loop engine to views of arbitrary rank. Per call
//! (never per element) the engine selects one of: a zero-dimensional
//! single-element case, unrolled kernels for ranks 1 through 4, or a generic
//! recursive kernel for higher ranks. When the working set of a rank-2+
//! iteration exceeds the cache target, the same kernels run over a blocked
//! plan: axes permuted smallest-stride-innermost and extents tiled by
//! [`crate::block`].
//!
//! The unblocked path visits logical indices in the order declared by the
//! output view (`RowMajor`: last axis fastest; `ColMajor`: first axis
//! fastest), so callback side effects are observed deterministically.
//! Blocking changes only the traversal order, never the output values.
//!
//! Mask and cast conventions match the flat engine: mask byte `0` processes,
//! nonzero skips; casts sit immediately around the callback invocation.

use crate::apply::mask_skips;
use crate::dtype::PodElement;
use crate::view::{NdView, NdViewMut, Order};
use crate::{block, order, ApplyError, Result, BLOCK_MEMORY_SIZE};
use num_traits::AsPrimitive;

fn ensure_same_shape(a: &[usize], b: &[usize]) -> Result<()> {
    if a.len() != b.len() {
        return Err(ApplyError::RankMismatch(a.len(), b.len()));
    }
    if a != b {
        return Err(ApplyError::ShapeMismatch(a.to_vec(), b.to_vec()));
    }
    Ok(())
}

// ============================================================================
// Traversal plan
// ============================================================================

struct Plan {
    /// Axis permutation, innermost first.
    axes: Vec<usize>,
    /// Tile extents aligned with `axes`.
    blocks: Vec<usize>,
}

fn build_plan(
    shape: &[usize],
    byte_strides: &[&[isize]],
    declared: Order,
    dest_index: Option<usize>,
) -> Plan {
    let rank = shape.len();
    let declared_axes: Vec<usize> = match declared {
        Order::RowMajor => (0..rank).rev().collect(),
        Order::ColMajor => (0..rank).collect(),
    };
    if rank < 2 || block::total_memory_region(shape, byte_strides) <= BLOCK_MEMORY_SIZE {
        let blocks = declared_axes.iter().map(|&a| shape[a]).collect();
        return Plan {
            axes: declared_axes,
            blocks,
        };
    }
    let axes = order::compute_order(byte_strides, dest_index);
    let dims_p: Vec<usize> = axes.iter().map(|&a| shape[a]).collect();
    let strides_p: Vec<Vec<isize>> = byte_strides
        .iter()
        .map(|s| axes.iter().map(|&a| s[a]).collect())
        .collect();
    let refs: Vec<&[isize]> = strides_p.iter().map(|v| v.as_slice()).collect();
    let blocks = block::compute_block_sizes(&dims_p, &refs);
    Plan { axes, blocks }
}

/// Plan a traversal and drive `f` over inner runs.
///
/// The callback receives, per run: byte offsets relative to each argument's
/// base pointer, the run length, and each argument's innermost byte stride.
fn run_kernel<F>(
    shape: &[usize],
    byte_strides: &[&[isize]],
    declared: Order,
    dest_index: Option<usize>,
    f: F,
) -> Result<()>
where
    F: FnMut(&[isize], usize, &[isize]) -> Result<()>,
{
    let plan = build_plan(shape, byte_strides, declared, dest_index);
    let dims_p: Vec<usize> = plan.axes.iter().map(|&a| shape[a]).collect();
    let strides_p: Vec<Vec<isize>> = byte_strides
        .iter()
        .map(|s| plan.axes.iter().map(|&a| s[a]).collect())
        .collect();
    for_each_inner(&dims_p, &plan.blocks, &strides_p, f)
}

/// Iterate tiles and rows, invoking `f` once per innermost run.
///
/// `dims`, `blocks`, and every stride array are permuted innermost-first.
fn for_each_inner<F>(
    dims: &[usize],
    blocks: &[usize],
    strides: &[Vec<isize>],
    mut f: F,
) -> Result<()>
where
    F: FnMut(&[isize], usize, &[isize]) -> Result<()>,
{
    let rank = dims.len();
    if rank == 0 {
        return Ok(());
    }
    let nargs = strides.len();
    let inner: Vec<isize> = strides.iter().map(|s| s[0]).collect();
    let mut offsets = vec![0isize; nargs];

    match rank {
        1 => {
            let d0 = dims[0];
            let b0 = blocks[0].max(1);
            let mut j0 = 0usize;
            while j0 < d0 {
                let blen0 = b0.min(d0 - j0);
                for (o, s) in offsets.iter_mut().zip(strides) {
                    *o = j0 as isize * s[0];
                }
                f(&offsets, blen0, &inner)?;
                j0 += blen0;
            }
            Ok(())
        }
        2 => {
            let (d0, d1) = (dims[0], dims[1]);
            let (b0, b1) = (blocks[0].max(1), blocks[1].max(1));
            let mut j1 = 0usize;
            while j1 < d1 {
                let blen1 = b1.min(d1 - j1);
                let mut j0 = 0usize;
                while j0 < d0 {
                    let blen0 = b0.min(d0 - j0);
                    for i1 in j1..j1 + blen1 {
                        for (o, s) in offsets.iter_mut().zip(strides) {
                            *o = i1 as isize * s[1] + j0 as isize * s[0];
                        }
                        f(&offsets, blen0, &inner)?;
                    }
                    j0 += blen0;
                }
                j1 += blen1;
            }
            Ok(())
        }
        3 => {
            let (d0, d1, d2) = (dims[0], dims[1], dims[2]);
            let (b0, b1, b2) = (blocks[0].max(1), blocks[1].max(1), blocks[2].max(1));
            let mut j2 = 0usize;
            while j2 < d2 {
                let blen2 = b2.min(d2 - j2);
                let mut j1 = 0usize;
                while j1 < d1 {
                    let blen1 = b1.min(d1 - j1);
                    let mut j0 = 0usize;
                    while j0 < d0 {
                        let blen0 = b0.min(d0 - j0);
                        for i2 in j2..j2 + blen2 {
                            for i1 in j1..j1 + blen1 {
                                for (o, s) in offsets.iter_mut().zip(strides) {
                                    *o = i2 as isize * s[2]
                                        + i1 as isize * s[1]
                                        + j0 as isize * s[0];
                                }
                                f(&offsets, blen0, &inner)?;
                            }
                        }
                        j0 += blen0;
                    }
                    j1 += blen1;
                }
                j2 += blen2;
            }
            Ok(())
        }
        4 => {
            let (d0, d1, d2, d3) = (dims[0], dims[1], dims[2], dims[3]);
            let (b0, b1, b2, b3) = (
                blocks[0].max(1),
                blocks[1].max(1),
                blocks[2].max(1),
                blocks[3].max(1),
            );
            let mut j3 = 0usize;
            while j3 < d3 {
                let blen3 = b3.min(d3 - j3);
                let mut j2 = 0usize;
                while j2 < d2 {
                    let blen2 = b2.min(d2 - j2);
                    let mut j1 = 0usize;
                    while j1 < d1 {
                        let blen1 = b1.min(d1 - j1);
                        let mut j0 = 0usize;
                        while j0 < d0 {
                            let blen0 = b0.min(d0 - j0);
                            for i3 in j3..j3 + blen3 {
                                for i2 in j2..j2 + blen2 {
                                    for i1 in j1..j1 + blen1 {
                                        for (o, s) in offsets.iter_mut().zip(strides) {
                                            *o = i3 as isize * s[3]
                                                + i2 as isize * s[2]
                                                + i1 as isize * s[1]
                                                + j0 as isize * s[0];
                                        }
                                        f(&offsets, blen0, &inner)?;
                                    }
                                }
                            }
                            j0 += blen0;
                        }
                        j1 += blen1;
                    }
                    j2 += blen2;
                }
                j3 += blen3;
            }
            Ok(())
        }
        _ => {
            let mut tiles = vec![(0usize, 0usize); rank];
            let mut idx = vec![0usize; rank];
            tile_level(
                rank - 1,
                dims,
                blocks,
                strides,
                &inner,
                &mut tiles,
                &mut idx,
                &mut offsets,
                &mut f,
            )
        }
    }
}

// Generic fallback: tile loops for every level first (outermost down to the
// innermost axis), then element loops within the selected tile.
#[allow(clippy::too_many_arguments)]
fn tile_level<F>(
    level: usize,
    dims: &[usize],
    blocks: &[usize],
    strides: &[Vec<isize>],
    inner: &[isize],
    tiles: &mut [(usize, usize)],
    idx: &mut [usize],
    offsets: &mut [isize],
    f: &mut F,
) -> Result<()>
where
    F: FnMut(&[isize], usize, &[isize]) -> Result<()>,
{
    let d = dims[level];
    let b = blocks[level].max(1);
    let mut j = 0usize;
    while j < d {
        let blen = b.min(d - j);
        tiles[level] = (j, blen);
        if level == 0 {
            elem_level(dims.len() - 1, strides, inner, tiles, idx, offsets, f)?;
        } else {
            tile_level(
                level - 1,
                dims,
                blocks,
                strides,
                inner,
                tiles,
                idx,
                offsets,
                f,
            )?;
        }
        j += blen;
    }
    Ok(())
}

fn elem_level<F>(
    level: usize,
    strides: &[Vec<isize>],
    inner: &[isize],
    tiles: &[(usize, usize)],
    idx: &mut [usize],
    offsets: &mut [isize],
    f: &mut F,
) -> Result<()>
where
    F: FnMut(&[isize], usize, &[isize]) -> Result<()>,
{
    if level == 0 {
        let (j0, blen0) = tiles[0];
        for (o, s) in offsets.iter_mut().zip(strides) {
            let mut acc = j0 as isize * s[0];
            for (lvl, &i) in idx.iter().enumerate().skip(1) {
                acc += i as isize * s[lvl];
            }
            *o = acc;
        }
        f(offsets, blen0, inner)
    } else {
        let (start, len) = tiles[level];
        for i in start..start + len {
            idx[level] = i;
            elem_level(level - 1, strides, inner, tiles, idx, offsets, f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Fill an n-dimensional output view from a nullary callback.
pub fn nd_nullary<Y, F>(y: &mut NdViewMut<'_>, mut f: F) -> Result<()>
where
    Y: PodElement,
    F: FnMut() -> Y,
{
    y.check_dtype::<Y>()?;
    if y.spec().is_empty() {
        return Ok(());
    }
    let shape: Vec<usize> = y.shape().to_vec();
    let ys: Vec<isize> = y.strides().to_vec();
    let declared = y.spec().order;
    let base_y = y.base_ptr_mut();
    if shape.is_empty() {
        unsafe { (base_y as *mut Y).write_unaligned(f()) };
        return Ok(());
    }
    let strides_list: [&[isize]; 1] = [&ys];
    run_kernel(&shape, &strides_list, declared, Some(0), |offsets, len, inner| {
        let mut py = base_y.wrapping_offset(offsets[0]);
        for _ in 0..len {
            unsafe { (py as *mut Y).write_unaligned(f()) };
            py = py.wrapping_offset(inner[0]);
        }
        Ok(())
    })
}

/// Apply a unary callback over an n-dimensional input view, assigning
/// results to an output view of identical shape.
pub fn nd_unary<X, Y, F>(x: &NdView<'_>, y: &mut NdViewMut<'_>, mut f: F) -> Result<()>
where
    X: PodElement,
    Y: PodElement,
    F: FnMut(X) -> Y,
{
    x.check_dtype::<X>()?;
    y.check_dtype::<Y>()?;
    ensure_same_shape(x.shape(), y.shape())?;
    if x.spec().is_empty() {
        return Ok(());
    }
    let shape: Vec<usize> = x.shape().to_vec();
    let xs: Vec<isize> = x.strides().to_vec();
    let ys: Vec<isize> = y.strides().to_vec();
    let declared = y.spec().order;
    let base_x = x.base_ptr();
    let base_y = y.base_ptr_mut();
    if shape.is_empty() {
        let v = f(unsafe { (base_x as *const X).read_unaligned() });
        unsafe { (base_y as *mut Y).write_unaligned(v) };
        return Ok(());
    }
    let strides_list: [&[isize]; 2] = [&xs, &ys];
    run_kernel(&shape, &strides_list, declared, Some(1), |offsets, len, inner| {
        let mut px = base_x.wrapping_offset(offsets[0]);
        let mut py = base_y.wrapping_offset(offsets[1]);
        for _ in 0..len {
            let v = f(unsafe { (px as *const X).read_unaligned() });
            unsafe { (py as *mut Y).write_unaligned(v) };
            px = px.wrapping_offset(inner[0]);
            py = py.wrapping_offset(inner[1]);
        }
        Ok(())
    })
}

/// Apply a binary callback over two n-dimensional input views.
pub fn nd_binary<X1, X2, Y, F>(
    x1: &NdView<'_>,
    x2: &NdView<'_>,
    y: &mut NdViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    y.check_dtype::<Y>()?;
    ensure_same_shape(x1.shape(), x2.shape())?;
    ensure_same_shape(x1.shape(), y.shape())?;
    if x1.spec().is_empty() {
        return Ok(());
    }
    let shape: Vec<usize> = x1.shape().to_vec();
    let s1: Vec<isize> = x1.strides().to_vec();
    let s2: Vec<isize> = x2.strides().to_vec();
    let ys: Vec<isize> = y.strides().to_vec();
    let declared = y.spec().order;
    let base_1 = x1.base_ptr();
    let base_2 = x2.base_ptr();
    let base_y = y.base_ptr_mut();
    if shape.is_empty() {
        let v = f(unsafe { (base_1 as *const X1).read_unaligned() }, unsafe {
            (base_2 as *const X2).read_unaligned()
        });
        unsafe { (base_y as *mut Y).write_unaligned(v) };
        return Ok(());
    }
    let strides_list: [&[isize]; 3] = [&s1, &s2, &ys];
    run_kernel(&shape, &strides_list, declared, Some(2), |offsets, len, inner| {
        let mut p1 = base_1.wrapping_offset(offsets[0]);
        let mut p2 = base_2.wrapping_offset(offsets[1]);
        let mut py = base_y.wrapping_offset(offsets[2]);
        for _ in 0..len {
            let v = f(unsafe { (p1 as *const X1).read_unaligned() }, unsafe {
                (p2 as *const X2).read_unaligned()
            });
            unsafe { (py as *mut Y).write_unaligned(v) };
            p1 = p1.wrapping_offset(inner[0]);
            p2 = p2.wrapping_offset(inner[1]);
            py = py.wrapping_offset(inner[2]);
        }
        Ok(())
    })
}

/// Apply a unary callback over an n-dimensional view, honoring an
/// n-dimensional mask of identical shape.
pub fn nd_msk_unary<X, Y, F>(
    x: &NdView<'_>,
    mask: &NdView<'_>,
    y: &mut NdViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X: PodElement,
    Y: PodElement,
    F: FnMut(X) -> Y,
{
    x.check_dtype::<X>()?;
    mask.check_dtype::<u8>()?;
    y.check_dtype::<Y>()?;
    ensure_same_shape(x.shape(), mask.shape())?;
    ensure_same_shape(x.shape(), y.shape())?;
    if x.spec().is_empty() {
        return Ok(());
    }
    let shape: Vec<usize> = x.shape().to_vec();
    let xs: Vec<isize> = x.strides().to_vec();
    let ms: Vec<isize> = mask.strides().to_vec();
    let ys: Vec<isize> = y.strides().to_vec();
    let declared = y.spec().order;
    let base_x = x.base_ptr();
    let base_m = mask.base_ptr();
    let base_y = y.base_ptr_mut();
    if shape.is_empty() {
        if !mask_skips(unsafe { base_m.read() }) {
            let v = f(unsafe { (base_x as *const X).read_unaligned() });
            unsafe { (base_y as *mut Y).write_unaligned(v) };
        }
        return Ok(());
    }
    let strides_list: [&[isize]; 3] = [&xs, &ms, &ys];
    run_kernel(&shape, &strides_list, declared, Some(2), |offsets, len, inner| {
        let mut px = base_x.wrapping_offset(offsets[0]);
        let mut pm = base_m.wrapping_offset(offsets[1]);
        let mut py = base_y.wrapping_offset(offsets[2]);
        for _ in 0..len {
            if !mask_skips(unsafe { pm.read() }) {
                let v = f(unsafe { (px as *const X).read_unaligned() });
                unsafe { (py as *mut Y).write_unaligned(v) };
            }
            px = px.wrapping_offset(inner[0]);
            pm = pm.wrapping_offset(inner[1]);
            py = py.wrapping_offset(inner[2]);
        }
        Ok(())
    })
}

/// Apply a binary callback over two n-dimensional views, honoring a mask.
pub fn nd_msk_binary<X1, X2, Y, F>(
    x1: &NdView<'_>,
    x2: &NdView<'_>,
    mask: &NdView<'_>,
    y: &mut NdViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    mask.check_dtype::<u8>()?;
    y.check_dtype::<Y>()?;
    ensure_same_shape(x1.shape(), x2.shape())?;
    ensure_same_shape(x1.shape(), mask.shape())?;
    ensure_same_shape(x1.shape(), y.shape())?;
    if x1.spec().is_empty() {
        return Ok(());
    }
    let shape: Vec<usize> = x1.shape().to_vec();
    let s1: Vec<isize> = x1.strides().to_vec();
    let s2: Vec<isize> = x2.strides().to_vec();
    let ms: Vec<isize> = mask.strides().to_vec();
    let ys: Vec<isize> = y.strides().to_vec();
    let declared = y.spec().order;
    let base_1 = x1.base_ptr();
    let base_2 = x2.base_ptr();
    let base_m = mask.base_ptr();
    let base_y = y.base_ptr_mut();
    if shape.is_empty() {
        if !mask_skips(unsafe { base_m.read() }) {
            let v = f(unsafe { (base_1 as *const X1).read_unaligned() }, unsafe {
                (base_2 as *const X2).read_unaligned()
            });
            unsafe { (base_y as *mut Y).write_unaligned(v) };
        }
        return Ok(());
    }
    let strides_list: [&[isize]; 4] = [&s1, &s2, &ms, &ys];
    run_kernel(&shape, &strides_list, declared, Some(3), |offsets, len, inner| {
        let mut p1 = base_1.wrapping_offset(offsets[0]);
        let mut p2 = base_2.wrapping_offset(offsets[1]);
        let mut pm = base_m.wrapping_offset(offsets[2]);
        let mut py = base_y.wrapping_offset(offsets[3]);
        for _ in 0..len {
            if !mask_skips(unsafe { pm.read() }) {
                let v = f(unsafe { (p1 as *const X1).read_unaligned() }, unsafe {
                    (p2 as *const X2).read_unaligned()
                });
                unsafe { (py as *mut Y).write_unaligned(v) };
            }
            p1 = p1.wrapping_offset(inner[0]);
            p2 = p2.wrapping_offset(inner[1]);
            pm = pm.wrapping_offset(inner[2]);
            py = py.wrapping_offset(inner[3]);
        }
        Ok(())
    })
}

/// Apply a unary callback whose argument and return types differ from the
/// storage types, over n-dimensional views.
pub fn nd_unary_as<X, Y, A, R, F>(x: &NdView<'_>, y: &mut NdViewMut<'_>, mut f: F) -> Result<()>
where
    X: PodElement + AsPrimitive<A>,
    Y: PodElement,
    A: Copy + 'static,
    R: AsPrimitive<Y>,
    F: FnMut(A) -> R,
{
    x.check_dtype::<X>()?;
    y.check_dtype::<Y>()?;
    ensure_same_shape(x.shape(), y.shape())?;
    if x.spec().is_empty() {
        return Ok(());
    }
    let shape: Vec<usize> = x.shape().to_vec();
    let xs: Vec<isize> = x.strides().to_vec();
    let ys: Vec<isize> = y.strides().to_vec();
    let declared = y.spec().order;
    let base_x = x.base_ptr();
    let base_y = y.base_ptr_mut();
    if shape.is_empty() {
        let v: Y = f(unsafe { (base_x as *const X).read_unaligned() }.as_()).as_();
        unsafe { (base_y as *mut Y).write_unaligned(v) };
        return Ok(());
    }
    let strides_list: [&[isize]; 2] = [&xs, &ys];
    run_kernel(&shape, &strides_list, declared, Some(1), |offsets, len, inner| {
        let mut px = base_x.wrapping_offset(offsets[0]);
        let mut py = base_y.wrapping_offset(offsets[1]);
        for _ in 0..len {
            let v: Y = f(unsafe { (px as *const X).read_unaligned() }.as_()).as_();
            unsafe { (py as *mut Y).write_unaligned(v) };
            px = px.wrapping_offset(inner[0]);
            py = py.wrapping_offset(inner[1]);
        }
        Ok(())
    })
}
