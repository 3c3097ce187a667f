//! View descriptors and borrowed buffer arguments.
//!
//! A spec describes iteration geometry only (extents, byte strides, byte
//! offset, element tag); pairing a spec with a borrowed byte buffer yields an
//! argument view whose constructor performs the admission bounds check. Once
//! constructed, a view is guaranteed in-bounds, which is what lets the loop
//! engines run unchecked pointer walks.
//!
//! Views are built fresh per call by the binding adapter and only borrowed by
//! the core; nothing here is retained across calls.

use crate::bounds;
use crate::cursor::{Cursor, CursorMut};
use crate::dtype::{DType, PodElement};
use crate::{ApplyError, Result};
use smallvec::SmallVec;

/// Inline-allocated axis storage; ranks up to 8 avoid the heap.
pub type Axes<T> = SmallVec<[T; 8]>;

/// Logical index order for multidimensional traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Last axis varies fastest.
    #[default]
    RowMajor,
    /// First axis varies fastest.
    ColMajor,
}

/// Iteration geometry of a one-dimensional strided view.
///
/// `stride` and `offset` are in bytes; the stride may be zero (constant view)
/// or negative (reverse iteration). `offset` addresses the first
/// logically-indexed element relative to the buffer base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedSpec {
    pub len: usize,
    pub stride: isize,
    pub offset: isize,
    pub dtype: DType,
}

impl StridedSpec {
    pub fn new(len: usize, stride: isize, offset: isize, dtype: DType) -> Self {
        Self {
            len,
            stride,
            offset,
            dtype,
        }
    }

    /// A zero-offset view with unit element stride.
    pub fn contiguous(len: usize, dtype: DType) -> Self {
        Self {
            len,
            stride: dtype.bytes_per_element() as isize,
            offset: 0,
            dtype,
        }
    }

    #[inline]
    pub fn elem_size(&self) -> usize {
        self.dtype.bytes_per_element()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Minimum and maximum byte offsets the view can address.
    #[inline]
    pub fn byte_range(&self) -> (isize, isize) {
        bounds::strided_min_max(self.len, self.stride, self.offset)
    }
}

/// Iteration geometry of a multidimensional strided view.
///
/// Per-axis byte strides may be negative or zero; a zero extent on any axis
/// makes the view logically empty regardless of the other axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdSpec {
    pub dtype: DType,
    pub shape: Axes<usize>,
    pub strides: Axes<isize>,
    pub offset: isize,
    pub order: Order,
}

impl NdSpec {
    pub fn new(
        dtype: DType,
        shape: &[usize],
        strides: &[isize],
        offset: isize,
        order: Order,
    ) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(ApplyError::RankMismatch(shape.len(), strides.len()));
        }
        Ok(Self {
            dtype,
            shape: SmallVec::from_slice(shape),
            strides: SmallVec::from_slice(strides),
            offset,
            order,
        })
    }

    /// The one-dimensional special case.
    pub fn from_strided(spec: &StridedSpec) -> Self {
        Self {
            dtype: spec.dtype,
            shape: SmallVec::from_slice(&[spec.len]),
            strides: SmallVec::from_slice(&[spec.stride]),
            offset: spec.offset,
            order: Order::RowMajor,
        }
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.shape.len()
    }

    /// Total number of logical elements (1 for a zero-dimensional view).
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    #[inline]
    pub fn elem_size(&self) -> usize {
        self.dtype.bytes_per_element()
    }

    /// Minimum and maximum byte offsets the view can address.
    #[inline]
    pub fn byte_range(&self) -> (isize, isize) {
        bounds::min_max_byte_offsets(&self.shape, &self.strides, self.offset)
    }
}

fn check_tag<T: PodElement>(declared: DType) -> Result<()> {
    if declared.storage_eq(T::DTYPE) {
        Ok(())
    } else {
        Err(ApplyError::DTypeMismatch {
            expected: T::DTYPE,
            actual: declared,
        })
    }
}

fn check_bounds(
    buf_len: usize,
    dtype: DType,
    shape: &[usize],
    strides: &[isize],
    offset: isize,
) -> Result<()> {
    if bounds::fits_in_buffer(dtype, buf_len, shape, strides, offset) {
        Ok(())
    } else {
        let (min, max) = bounds::min_max_byte_offsets(shape, strides, offset);
        Err(ApplyError::BoundsViolation {
            min,
            max,
            len: buf_len,
        })
    }
}

/// A read-only strided argument: borrowed bytes plus geometry.
#[derive(Debug)]
pub struct ArgView<'a> {
    buf: &'a [u8],
    spec: StridedSpec,
}

impl<'a> ArgView<'a> {
    /// Create a view, rejecting geometry the buffer cannot back.
    pub fn new(buf: &'a [u8], spec: StridedSpec) -> Result<Self> {
        check_bounds(
            buf.len(),
            spec.dtype,
            &[spec.len],
            &[spec.stride],
            spec.offset,
        )?;
        Ok(Self { buf, spec })
    }

    /// Create a view over a typed slice, rejecting a spec whose declared
    /// dtype does not match `T`'s tag.
    pub fn from_elements<T: PodElement>(data: &'a [T], spec: StridedSpec) -> Result<Self> {
        check_tag::<T>(spec.dtype)?;
        Self::new(bytemuck::cast_slice(data), spec)
    }

    #[inline]
    pub fn spec(&self) -> &StridedSpec {
        &self.spec
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spec.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spec.len == 0
    }

    pub(crate) fn check_dtype<T: PodElement>(&self) -> Result<()> {
        if self.spec.dtype.storage_eq(T::DTYPE) {
            Ok(())
        } else {
            Err(ApplyError::DTypeMismatch {
                expected: T::DTYPE,
                actual: self.spec.dtype,
            })
        }
    }

    /// Cursor positioned at the view's lowest addressed element; the cursor
    /// pre-advances for negative strides. Callers must have checked the
    /// dtype.
    pub(crate) fn cursor<T: PodElement>(&self) -> Cursor<T> {
        let (min, _) = self.spec.byte_range();
        let base = self.buf.as_ptr().wrapping_offset(min);
        unsafe { Cursor::new(base, self.spec.len, self.spec.stride) }
    }
}

/// A mutable strided argument (an output buffer).
#[derive(Debug)]
pub struct ArgViewMut<'a> {
    buf: &'a mut [u8],
    spec: StridedSpec,
}

impl<'a> ArgViewMut<'a> {
    pub fn new(buf: &'a mut [u8], spec: StridedSpec) -> Result<Self> {
        check_bounds(
            buf.len(),
            spec.dtype,
            &[spec.len],
            &[spec.stride],
            spec.offset,
        )?;
        Ok(Self { buf, spec })
    }

    pub fn from_elements_mut<T: PodElement>(data: &'a mut [T], spec: StridedSpec) -> Result<Self> {
        check_tag::<T>(spec.dtype)?;
        Self::new(bytemuck::cast_slice_mut(data), spec)
    }

    #[inline]
    pub fn spec(&self) -> &StridedSpec {
        &self.spec
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spec.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spec.len == 0
    }

    pub(crate) fn check_dtype<T: PodElement>(&self) -> Result<()> {
        if self.spec.dtype.storage_eq(T::DTYPE) {
            Ok(())
        } else {
            Err(ApplyError::DTypeMismatch {
                expected: T::DTYPE,
                actual: self.spec.dtype,
            })
        }
    }

    pub(crate) fn cursor_mut<T: PodElement>(&mut self) -> CursorMut<T> {
        let (min, _) = self.spec.byte_range();
        let base = self.buf.as_mut_ptr().wrapping_offset(min);
        unsafe { CursorMut::new(base, self.spec.len, self.spec.stride) }
    }
}

/// A read-only multidimensional argument.
#[derive(Debug)]
pub struct NdView<'a> {
    buf: &'a [u8],
    spec: NdSpec,
}

impl<'a> NdView<'a> {
    pub fn new(buf: &'a [u8], spec: NdSpec) -> Result<Self> {
        check_bounds(buf.len(), spec.dtype, &spec.shape, &spec.strides, spec.offset)?;
        Ok(Self { buf, spec })
    }

    pub fn from_elements<T: PodElement>(data: &'a [T], spec: NdSpec) -> Result<Self> {
        check_tag::<T>(spec.dtype)?;
        Self::new(bytemuck::cast_slice(data), spec)
    }

    #[inline]
    pub fn spec(&self) -> &NdSpec {
        &self.spec
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.spec.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.spec.strides
    }

    pub(crate) fn check_dtype<T: PodElement>(&self) -> Result<()> {
        if self.spec.dtype.storage_eq(T::DTYPE) {
            Ok(())
        } else {
            Err(ApplyError::DTypeMismatch {
                expected: T::DTYPE,
                actual: self.spec.dtype,
            })
        }
    }

    /// Pointer to the first logically-indexed element. All index
    /// combinations reachable from here are in-bounds by construction.
    pub(crate) fn base_ptr(&self) -> *const u8 {
        self.buf.as_ptr().wrapping_offset(self.spec.offset)
    }
}

/// A mutable multidimensional argument (an output array).
#[derive(Debug)]
pub struct NdViewMut<'a> {
    buf: &'a mut [u8],
    spec: NdSpec,
}

impl<'a> NdViewMut<'a> {
    pub fn new(buf: &'a mut [u8], spec: NdSpec) -> Result<Self> {
        check_bounds(buf.len(), spec.dtype, &spec.shape, &spec.strides, spec.offset)?;
        Ok(Self { buf, spec })
    }

    pub fn from_elements_mut<T: PodElement>(data: &'a mut [T], spec: NdSpec) -> Result<Self> {
        check_tag::<T>(spec.dtype)?;
        Self::new(bytemuck::cast_slice_mut(data), spec)
    }

    #[inline]
    pub fn spec(&self) -> &NdSpec {
        &self.spec
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.spec.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.spec.strides
    }

    pub(crate) fn check_dtype<T: PodElement>(&self) -> Result<()> {
        if self.spec.dtype.storage_eq(T::DTYPE) {
            Ok(())
        } else {
            Err(ApplyError::DTypeMismatch {
                expected: T::DTYPE,
                actual: self.spec.dtype,
            })
        }
    }

    pub(crate) fn base_ptr_mut(&mut self) -> *mut u8 {
        self.buf.as_mut_ptr().wrapping_offset(self.spec.offset)
    }
}
