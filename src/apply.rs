//! N-ary loop engine for flat strided arrays.
//!
//! Each function applies a fixed-arity callback across corresponding elements
//! of one-dimensional strided views and stores results in one (or two) output
//! views. Entry points validate element tags and shape agreement up front;
//! the element loops are unchecked cursor walks over geometry the views
//! already proved in-bounds.
//!
//! Zero-length views are a no-op: no callback invocation and no write occurs.
//!
//! Masked variants take a one-byte-per-position mask view (`uint8` or `bool`
//! tagged) where `0` means process and any nonzero byte means skip; skipped
//! output positions retain their prior contents.
//!
//! The `*_as` variants support callbacks whose argument and return types
//! differ from the storage types (for example `float32` storage driven by a
//! `float64` callback). Casts happen immediately adjacent to the callback
//! invocation: cast in, call, cast out.

use crate::dtype::PodElement;
use crate::view::{ArgView, ArgViewMut};
use crate::{ApplyError, Result};
use num_traits::AsPrimitive;

/// Mask byte convention: `0` processes, nonzero skips.
#[inline]
pub(crate) fn mask_skips(byte: u8) -> bool {
    byte != 0
}

fn same_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ApplyError::ShapeMismatch(vec![expected], vec![actual]))
    }
}

/// Apply a nullary callback to each element of a strided output array.
pub fn nullary<Y, F>(y: &mut ArgViewMut<'_>, mut f: F) -> Result<()>
where
    Y: PodElement,
    F: FnMut() -> Y,
{
    y.check_dtype::<Y>()?;
    let n = y.len();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        unsafe { oy.write(f()) };
        oy.step();
    }
    Ok(())
}

/// Apply a unary callback to each element of a strided input array and
/// assign results to a strided output array.
pub fn unary<X, Y, F>(x: &ArgView<'_>, y: &mut ArgViewMut<'_>, mut f: F) -> Result<()>
where
    X: PodElement,
    Y: PodElement,
    F: FnMut(X) -> Y,
{
    x.check_dtype::<X>()?;
    y.check_dtype::<Y>()?;
    same_len(x.len(), y.len())?;
    let n = x.len();
    let mut ix = x.cursor::<X>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        let v = f(unsafe { ix.read() });
        unsafe { oy.write(v) };
        ix.step();
        oy.step();
    }
    Ok(())
}

/// Apply a binary callback to corresponding elements of two strided input
/// arrays.
pub fn binary<X1, X2, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
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
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        let v = f(unsafe { i1.read() }, unsafe { i2.read() });
        unsafe { oy.write(v) };
        i1.step();
        i2.step();
        oy.step();
    }
    Ok(())
}

/// Apply a ternary callback to corresponding elements of three strided input
/// arrays.
pub fn ternary<X1, X2, X3, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    x3: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2, X3) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    x3.check_dtype::<X3>()?;
    y.check_dtype::<Y>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), x3.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut i3 = x3.cursor::<X3>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        let v = f(unsafe { i1.read() }, unsafe { i2.read() }, unsafe {
            i3.read()
        });
        unsafe { oy.write(v) };
        i1.step();
        i2.step();
        i3.step();
        oy.step();
    }
    Ok(())
}

/// Apply a quaternary callback to corresponding elements of four strided
/// input arrays.
pub fn quaternary<X1, X2, X3, X4, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    x3: &ArgView<'_>,
    x4: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2, X3, X4) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    x3.check_dtype::<X3>()?;
    x4.check_dtype::<X4>()?;
    y.check_dtype::<Y>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), x3.len())?;
    same_len(x1.len(), x4.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut i3 = x3.cursor::<X3>();
    let mut i4 = x4.cursor::<X4>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        let v = f(
            unsafe { i1.read() },
            unsafe { i2.read() },
            unsafe { i3.read() },
            unsafe { i4.read() },
        );
        unsafe { oy.write(v) };
        i1.step();
        i2.step();
        i3.step();
        i4.step();
        oy.step();
    }
    Ok(())
}

/// Apply a quinary callback to corresponding elements of five strided input
/// arrays.
#[allow(clippy::too_many_arguments)]
pub fn quinary<X1, X2, X3, X4, X5, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    x3: &ArgView<'_>,
    x4: &ArgView<'_>,
    x5: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    X5: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2, X3, X4, X5) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    x3.check_dtype::<X3>()?;
    x4.check_dtype::<X4>()?;
    x5.check_dtype::<X5>()?;
    y.check_dtype::<Y>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), x3.len())?;
    same_len(x1.len(), x4.len())?;
    same_len(x1.len(), x5.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut i3 = x3.cursor::<X3>();
    let mut i4 = x4.cursor::<X4>();
    let mut i5 = x5.cursor::<X5>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        let v = f(
            unsafe { i1.read() },
            unsafe { i2.read() },
            unsafe { i3.read() },
            unsafe { i4.read() },
            unsafe { i5.read() },
        );
        unsafe { oy.write(v) };
        i1.step();
        i2.step();
        i3.step();
        i4.step();
        i5.step();
        oy.step();
    }
    Ok(())
}

/// Apply a unary callback, writing a pair of results to two strided output
/// arrays.
pub fn unary2<X, Y1, Y2, F>(
    x: &ArgView<'_>,
    y1: &mut ArgViewMut<'_>,
    y2: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X: PodElement,
    Y1: PodElement,
    Y2: PodElement,
    F: FnMut(X) -> (Y1, Y2),
{
    x.check_dtype::<X>()?;
    y1.check_dtype::<Y1>()?;
    y2.check_dtype::<Y2>()?;
    same_len(x.len(), y1.len())?;
    same_len(x.len(), y2.len())?;
    let n = x.len();
    let mut ix = x.cursor::<X>();
    let mut o1 = y1.cursor_mut::<Y1>();
    let mut o2 = y2.cursor_mut::<Y2>();
    for _ in 0..n {
        let (a, b) = f(unsafe { ix.read() });
        unsafe {
            o1.write(a);
            o2.write(b);
        }
        ix.step();
        o1.step();
        o2.step();
    }
    Ok(())
}

/// Apply a binary callback, writing a pair of results to two strided output
/// arrays.
pub fn binary2<X1, X2, Y1, Y2, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    y1: &mut ArgViewMut<'_>,
    y2: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    Y1: PodElement,
    Y2: PodElement,
    F: FnMut(X1, X2) -> (Y1, Y2),
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    y1.check_dtype::<Y1>()?;
    y2.check_dtype::<Y2>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), y1.len())?;
    same_len(x1.len(), y2.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut o1 = y1.cursor_mut::<Y1>();
    let mut o2 = y2.cursor_mut::<Y2>();
    for _ in 0..n {
        let (a, b) = f(unsafe { i1.read() }, unsafe { i2.read() });
        unsafe {
            o1.write(a);
            o2.write(b);
        }
        i1.step();
        i2.step();
        o1.step();
        o2.step();
    }
    Ok(())
}

/// Fill a strided output array from a nullary callback, honoring a mask.
pub fn msk_nullary<Y, F>(mask: &ArgView<'_>, y: &mut ArgViewMut<'_>, mut f: F) -> Result<()>
where
    Y: PodElement,
    F: FnMut() -> Y,
{
    mask.check_dtype::<u8>()?;
    y.check_dtype::<Y>()?;
    same_len(y.len(), mask.len())?;
    let n = y.len();
    let mut im = mask.cursor::<u8>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        if !mask_skips(unsafe { im.read() }) {
            unsafe { oy.write(f()) };
        }
        im.step();
        oy.step();
    }
    Ok(())
}

/// Apply a unary callback, honoring a mask.
pub fn msk_unary<X, Y, F>(
    x: &ArgView<'_>,
    mask: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
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
    same_len(x.len(), mask.len())?;
    same_len(x.len(), y.len())?;
    let n = x.len();
    let mut ix = x.cursor::<X>();
    let mut im = mask.cursor::<u8>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        if !mask_skips(unsafe { im.read() }) {
            let v = f(unsafe { ix.read() });
            unsafe { oy.write(v) };
        }
        ix.step();
        im.step();
        oy.step();
    }
    Ok(())
}

/// Apply a binary callback, honoring a mask.
pub fn msk_binary<X1, X2, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    mask: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
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
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), mask.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut im = mask.cursor::<u8>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        if !mask_skips(unsafe { im.read() }) {
            let v = f(unsafe { i1.read() }, unsafe { i2.read() });
            unsafe { oy.write(v) };
        }
        i1.step();
        i2.step();
        im.step();
        oy.step();
    }
    Ok(())
}

/// Apply a ternary callback, honoring a mask.
pub fn msk_ternary<X1, X2, X3, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    x3: &ArgView<'_>,
    mask: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2, X3) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    x3.check_dtype::<X3>()?;
    mask.check_dtype::<u8>()?;
    y.check_dtype::<Y>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), x3.len())?;
    same_len(x1.len(), mask.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut i3 = x3.cursor::<X3>();
    let mut im = mask.cursor::<u8>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        if !mask_skips(unsafe { im.read() }) {
            let v = f(unsafe { i1.read() }, unsafe { i2.read() }, unsafe {
                i3.read()
            });
            unsafe { oy.write(v) };
        }
        i1.step();
        i2.step();
        i3.step();
        im.step();
        oy.step();
    }
    Ok(())
}

/// Apply a quaternary callback, honoring a mask.
#[allow(clippy::too_many_arguments)]
pub fn msk_quaternary<X1, X2, X3, X4, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    x3: &ArgView<'_>,
    x4: &ArgView<'_>,
    mask: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2, X3, X4) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    x3.check_dtype::<X3>()?;
    x4.check_dtype::<X4>()?;
    mask.check_dtype::<u8>()?;
    y.check_dtype::<Y>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), x3.len())?;
    same_len(x1.len(), x4.len())?;
    same_len(x1.len(), mask.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut i3 = x3.cursor::<X3>();
    let mut i4 = x4.cursor::<X4>();
    let mut im = mask.cursor::<u8>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        if !mask_skips(unsafe { im.read() }) {
            let v = f(
                unsafe { i1.read() },
                unsafe { i2.read() },
                unsafe { i3.read() },
                unsafe { i4.read() },
            );
            unsafe { oy.write(v) };
        }
        i1.step();
        i2.step();
        i3.step();
        i4.step();
        im.step();
        oy.step();
    }
    Ok(())
}

/// Apply a quinary callback, honoring a mask.
#[allow(clippy::too_many_arguments)]
pub fn msk_quinary<X1, X2, X3, X4, X5, Y, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    x3: &ArgView<'_>,
    x4: &ArgView<'_>,
    x5: &ArgView<'_>,
    mask: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    X5: PodElement,
    Y: PodElement,
    F: FnMut(X1, X2, X3, X4, X5) -> Y,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    x3.check_dtype::<X3>()?;
    x4.check_dtype::<X4>()?;
    x5.check_dtype::<X5>()?;
    mask.check_dtype::<u8>()?;
    y.check_dtype::<Y>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), x3.len())?;
    same_len(x1.len(), x4.len())?;
    same_len(x1.len(), x5.len())?;
    same_len(x1.len(), mask.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut i3 = x3.cursor::<X3>();
    let mut i4 = x4.cursor::<X4>();
    let mut i5 = x5.cursor::<X5>();
    let mut im = mask.cursor::<u8>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        if !mask_skips(unsafe { im.read() }) {
            let v = f(
                unsafe { i1.read() },
                unsafe { i2.read() },
                unsafe { i3.read() },
                unsafe { i4.read() },
                unsafe { i5.read() },
            );
            unsafe { oy.write(v) };
        }
        i1.step();
        i2.step();
        i3.step();
        i4.step();
        i5.step();
        im.step();
        oy.step();
    }
    Ok(())
}

/// Apply a unary callback whose argument and return types differ from the
/// storage types.
///
/// Storage elements of type `X` are cast to `A` immediately before the call
/// and the `R` result is cast back to `Y` immediately after.
pub fn unary_as<X, Y, A, R, F>(x: &ArgView<'_>, y: &mut ArgViewMut<'_>, mut f: F) -> Result<()>
where
    X: PodElement + AsPrimitive<A>,
    Y: PodElement,
    A: Copy + 'static,
    R: AsPrimitive<Y>,
    F: FnMut(A) -> R,
{
    x.check_dtype::<X>()?;
    y.check_dtype::<Y>()?;
    same_len(x.len(), y.len())?;
    let n = x.len();
    let mut ix = x.cursor::<X>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        let v: Y = f(unsafe { ix.read() }.as_()).as_();
        unsafe { oy.write(v) };
        ix.step();
        oy.step();
    }
    Ok(())
}

/// Apply a binary callback whose argument and return types differ from the
/// storage types.
pub fn binary_as<X1, X2, Y, A1, A2, R, F>(
    x1: &ArgView<'_>,
    x2: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X1: PodElement + AsPrimitive<A1>,
    X2: PodElement + AsPrimitive<A2>,
    Y: PodElement,
    A1: Copy + 'static,
    A2: Copy + 'static,
    R: AsPrimitive<Y>,
    F: FnMut(A1, A2) -> R,
{
    x1.check_dtype::<X1>()?;
    x2.check_dtype::<X2>()?;
    y.check_dtype::<Y>()?;
    same_len(x1.len(), x2.len())?;
    same_len(x1.len(), y.len())?;
    let n = x1.len();
    let mut i1 = x1.cursor::<X1>();
    let mut i2 = x2.cursor::<X2>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        let v: Y = f(unsafe { i1.read() }.as_(), unsafe { i2.read() }.as_()).as_();
        unsafe { oy.write(v) };
        i1.step();
        i2.step();
        oy.step();
    }
    Ok(())
}

/// Apply a masked unary callback whose argument and return types differ from
/// the storage types.
pub fn msk_unary_as<X, Y, A, R, F>(
    x: &ArgView<'_>,
    mask: &ArgView<'_>,
    y: &mut ArgViewMut<'_>,
    mut f: F,
) -> Result<()>
where
    X: PodElement + AsPrimitive<A>,
    Y: PodElement,
    A: Copy + 'static,
    R: AsPrimitive<Y>,
    F: FnMut(A) -> R,
{
    x.check_dtype::<X>()?;
    mask.check_dtype::<u8>()?;
    y.check_dtype::<Y>()?;
    same_len(x.len(), mask.len())?;
    same_len(x.len(), y.len())?;
    let n = x.len();
    let mut ix = x.cursor::<X>();
    let mut im = mask.cursor::<u8>();
    let mut oy = y.cursor_mut::<Y>();
    for _ in 0..n {
        if !mask_skips(unsafe { im.read() }) {
            let v: Y = f(unsafe { ix.read() }.as_()).as_();
            unsafe { oy.write(v) };
        }
        ix.step();
        im.step();
        oy.step();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::view::StridedSpec;

    fn f64_view(data: &[f64]) -> ArgView<'_> {
        ArgView::from_elements(data, StridedSpec::contiguous(data.len(), DType::Float64)).unwrap()
    }

    #[test]
    fn test_unary_square() {
        let x = [1.0f64, 2.0, 3.0, 4.0];
        let mut y = [0.0f64; 4];
        let xv = f64_view(&x);
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(4, DType::Float64))
                .unwrap();
        unary(&xv, &mut yv, |v: f64| v * v).unwrap();
        assert_eq!(y, [1.0, 4.0, 9.0, 16.0]);
    }

    #[test]
    fn test_unary_zero_length_is_noop() {
        let x: [f64; 0] = [];
        let mut y: [f64; 0] = [];
        let xv = f64_view(&x);
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(0, DType::Float64))
                .unwrap();
        let mut calls = 0usize;
        unary(&xv, &mut yv, |v: f64| {
            calls += 1;
            v
        })
        .unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_unary_negative_stride_input() {
        let x = [1.0f64, 2.0, 3.0, 4.0];
        let mut y = [0.0f64; 4];
        let xv =
            ArgView::from_elements(&x, StridedSpec::new(4, -8, 24, DType::Float64)).unwrap();
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(4, DType::Float64))
                .unwrap();
        unary(&xv, &mut yv, |v: f64| v + 0.5).unwrap();
        assert_eq!(y, [4.5, 3.5, 2.5, 1.5]);
    }

    #[test]
    fn test_unary_gapped_output() {
        let x = [1.0f64, 2.0];
        let mut y = [0.0f64; 4];
        let xv = f64_view(&x);
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::new(2, 16, 0, DType::Float64))
                .unwrap();
        unary(&xv, &mut yv, |v: f64| -v).unwrap();
        assert_eq!(y, [-1.0, 0.0, -2.0, 0.0]);
    }

    #[test]
    fn test_unary_dtype_mismatch() {
        let x = [1.0f64, 2.0];
        let mut y = [0.0f64; 2];
        let xv = f64_view(&x);
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(2, DType::Float64))
                .unwrap();
        let err = unary(&xv, &mut yv, |v: f32| v).unwrap_err();
        assert!(matches!(err, ApplyError::DTypeMismatch { .. }));
    }

    #[test]
    fn test_unary_length_mismatch() {
        let x = [1.0f64, 2.0, 3.0];
        let mut y = [0.0f64; 2];
        let xv = f64_view(&x);
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(2, DType::Float64))
                .unwrap();
        let err = unary(&xv, &mut yv, |v: f64| v).unwrap_err();
        assert!(matches!(err, ApplyError::ShapeMismatch(..)));
    }

    #[test]
    fn test_nullary_fill() {
        let mut y = [0.0f32; 3];
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(3, DType::Float32))
                .unwrap();
        nullary(&mut yv, || 1.0f32).unwrap();
        assert_eq!(y, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_binary_add() {
        let a = [1.0f64, 2.0, 3.0];
        let b = [10.0f64, 20.0, 30.0];
        let mut y = [0.0f64; 3];
        let av = f64_view(&a);
        let bv = f64_view(&b);
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(3, DType::Float64))
                .unwrap();
        binary(&av, &bv, &mut yv, |p: f64, q: f64| p + q).unwrap();
        assert_eq!(y, [11.0, 22.0, 33.0]);
    }

    #[test]
    fn test_binary_zero_stride_broadcast() {
        // A zero-stride input behaves as a constant operand.
        let a = [1.0f64, 2.0, 3.0];
        let b = [100.0f64];
        let mut y = [0.0f64; 3];
        let av = f64_view(&a);
        let bv = ArgView::from_elements(&b, StridedSpec::new(3, 0, 0, DType::Float64)).unwrap();
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(3, DType::Float64))
                .unwrap();
        binary(&av, &bv, &mut yv, |p: f64, q: f64| p + q).unwrap();
        assert_eq!(y, [101.0, 102.0, 103.0]);
    }

    #[test]
    fn test_quinary_sum() {
        let a = [1.0f64, 2.0];
        let mut y = [0.0f64; 2];
        let v1 = f64_view(&a);
        let v2 = f64_view(&a);
        let v3 = f64_view(&a);
        let v4 = f64_view(&a);
        let v5 = f64_view(&a);
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(2, DType::Float64))
                .unwrap();
        quinary(&v1, &v2, &v3, &v4, &v5, &mut yv, |a: f64, b: f64, c: f64, d: f64, e: f64| {
            a + b + c + d + e
        })
        .unwrap();
        assert_eq!(y, [5.0, 10.0]);
    }

    #[test]
    fn test_msk_unary_skips_nonzero() {
        let x = [1.0f64, 2.0, 3.0, 4.0];
        let mask = [0u8, 1, 0, 1];
        let mut y = [-7.0f64; 4];
        let xv = f64_view(&x);
        let mv =
            ArgView::from_elements(&mask, StridedSpec::contiguous(4, DType::Uint8)).unwrap();
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(4, DType::Float64))
                .unwrap();
        msk_unary(&xv, &mv, &mut yv, |v: f64| v * v).unwrap();
        assert_eq!(y, [1.0, -7.0, 9.0, -7.0]);
    }

    #[test]
    fn test_msk_unary_all_masked_invokes_nothing() {
        let x = [1.0f64, 2.0];
        let mask = [255u8, 1];
        let mut y = [0.0f64; 2];
        let xv = f64_view(&x);
        let mv =
            ArgView::from_elements(&mask, StridedSpec::contiguous(2, DType::Uint8)).unwrap();
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(2, DType::Float64))
                .unwrap();
        let mut calls = 0usize;
        msk_unary(&xv, &mv, &mut yv, |v: f64| {
            calls += 1;
            v
        })
        .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(y, [0.0, 0.0]);
    }

    #[test]
    fn test_unary2_two_outputs() {
        let x = [1.5f64, -2.5];
        let mut y1 = [0.0f64; 2];
        let mut y2 = [0.0f64; 2];
        let xv = f64_view(&x);
        let mut o1 =
            ArgViewMut::from_elements_mut(&mut y1, StridedSpec::contiguous(2, DType::Float64))
                .unwrap();
        let mut o2 =
            ArgViewMut::from_elements_mut(&mut y2, StridedSpec::contiguous(2, DType::Float64))
                .unwrap();
        unary2(&xv, &mut o1, &mut o2, |v: f64| (v.floor(), v.ceil())).unwrap();
        assert_eq!(y1, [1.0, -3.0]);
        assert_eq!(y2, [2.0, -2.0]);
    }

    #[test]
    fn test_unary_as_f32_storage_f64_callback() {
        let x = [0.5f32, 1.5, 2.5];
        let mut y = [0.0f32; 3];
        let xv =
            ArgView::from_elements(&x, StridedSpec::contiguous(3, DType::Float32)).unwrap();
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(3, DType::Float32))
                .unwrap();
        unary_as::<f32, f32, f64, f64, _>(&xv, &mut yv, |v| v * 2.0).unwrap();
        assert_eq!(y, [1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_binary_as_widening_storage() {
        // uint8 inputs, float32 output, f64 arithmetic in the callback.
        let a = [200u8, 100];
        let b = [100u8, 50];
        let mut y = [0.0f32; 2];
        let av = ArgView::from_elements(&a, StridedSpec::contiguous(2, DType::Uint8)).unwrap();
        let bv = ArgView::from_elements(&b, StridedSpec::contiguous(2, DType::Uint8)).unwrap();
        let mut yv =
            ArgViewMut::from_elements_mut(&mut y, StridedSpec::contiguous(2, DType::Float32))
                .unwrap();
        binary_as::<u8, u8, f32, f64, f64, f64, _>(&av, &bv, &mut yv, |p, q| p + q).unwrap();
        assert_eq!(y, [300.0, 150.0]);
    }
}
