//! Sign-normalizing iteration cursors.
//!
//! A cursor walks one strided buffer during a single loop-engine call. It is
//! constructed from a pointer to the lowest addressed element of the view;
//! when the stride is negative the constructor pre-advances the pointer by
//! `(1 - n) * stride` bytes so that stepping forward visits elements in
//! logical index order. This keeps the sign handling in one place instead of
//! duplicating it across every arity and dimension specialization.
//!
//! Reads and writes are unaligned: byte strides are not required to respect
//! the element's natural alignment.

use bytemuck::Pod;
use std::marker::PhantomData;

#[inline]
fn normalize(base: *const u8, n: usize, stride: isize) -> *const u8 {
    if stride < 0 && n > 0 {
        base.wrapping_offset((1 - n as isize) * stride)
    } else {
        base
    }
}

/// Read-only cursor over a strided run of `n` elements of type `T`.
pub(crate) struct Cursor<T> {
    ptr: *const u8,
    stride: isize,
    _elem: PhantomData<*const T>,
}

impl<T: Pod> Cursor<T> {
    /// # Safety
    ///
    /// `base` must point at the lowest addressed element of an in-bounds
    /// view of `n` elements with the given byte stride, and the view must
    /// remain borrowed for the cursor's lifetime.
    #[inline]
    pub(crate) unsafe fn new(base: *const u8, n: usize, stride: isize) -> Self {
        Self {
            ptr: normalize(base, n, stride),
            stride,
            _elem: PhantomData,
        }
    }

    /// Read the element at the current position.
    ///
    /// # Safety
    ///
    /// The cursor must not have been stepped past the view's last element.
    #[inline]
    pub(crate) unsafe fn read(&self) -> T {
        (self.ptr as *const T).read_unaligned()
    }

    /// Advance to the next logical element.
    #[inline]
    pub(crate) fn step(&mut self) {
        self.ptr = self.ptr.wrapping_offset(self.stride);
    }
}

/// Mutable cursor over a strided run of `n` elements of type `T`.
pub(crate) struct CursorMut<T> {
    ptr: *mut u8,
    stride: isize,
    _elem: PhantomData<*mut T>,
}

impl<T: Pod> CursorMut<T> {
    /// # Safety
    ///
    /// Same contract as [`Cursor::new`], with exclusive access to the
    /// underlying buffer.
    #[inline]
    pub(crate) unsafe fn new(base: *mut u8, n: usize, stride: isize) -> Self {
        Self {
            ptr: normalize(base, n, stride) as *mut u8,
            stride,
            _elem: PhantomData,
        }
    }

    /// Write an element at the current position.
    ///
    /// # Safety
    ///
    /// The cursor must not have been stepped past the view's last element.
    #[inline]
    pub(crate) unsafe fn write(&mut self, value: T) {
        (self.ptr as *mut T).write_unaligned(value);
    }

    /// Advance to the next logical element.
    #[inline]
    pub(crate) fn step(&mut self) {
        self.ptr = self.ptr.wrapping_offset(self.stride);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_stride() {
        let data = [1.0f64, 2.0, 3.0, 4.0];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        let mut c = unsafe { Cursor::<f64>::new(bytes.as_ptr(), 4, 8) };
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(unsafe { c.read() });
            c.step();
        }
        assert_eq!(seen, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_negative_stride_visits_logical_order() {
        // With stride -8, the pre-advance lands on the last memory element,
        // so logical order is the memory-reversed sequence.
        let data = [1.0f64, 2.0, 3.0, 4.0];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        let mut c = unsafe { Cursor::<f64>::new(bytes.as_ptr(), 4, -8) };
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(unsafe { c.read() });
            c.step();
        }
        assert_eq!(seen, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_zero_stride_repeats() {
        let data = [7u32, 8, 9];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        let mut c = unsafe { Cursor::<u32>::new(bytes.as_ptr(), 3, 0) };
        for _ in 0..3 {
            assert_eq!(unsafe { c.read() }, 7);
            c.step();
        }
    }

    #[test]
    fn test_gapped_stride() {
        let data = [1i16, -1, 2, -1, 3, -1];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        let mut c = unsafe { Cursor::<i16>::new(bytes.as_ptr(), 3, 4) };
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(unsafe { c.read() });
            c.step();
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_cursor_mut_write() {
        let mut data = [0u8; 32];
        let mut c = unsafe { CursorMut::<f64>::new(data.as_mut_ptr(), 4, -8) };
        for v in [1.0f64, 2.0, 3.0, 4.0] {
            unsafe { c.write(v) };
            c.step();
        }
        let out: &[f64] = bytemuck::cast_slice(&data);
        // Logical order filled back-to-front in memory.
        assert_eq!(out, &[4.0, 3.0, 2.0, 1.0]);
    }
}
