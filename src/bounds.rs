//! Buffer bounds predicates.
//!
//! These functions compute the byte-offset range a view can address and
//! decide, before any element is touched, whether a backing buffer is large
//! enough. They are the sole admission-control point: the loop engines
//! themselves perform no per-element bounds checks.
//!
//! All functions here are pure predicates or pure computations; they never
//! panic and never allocate.

use crate::dtype::DType;

/// Compute the minimum and maximum byte offsets addressable by a view.
///
/// `strides` are per-axis byte strides (signed) and `offset` is the byte
/// offset of the first logically-indexed element. If any axis has extent
/// zero, the view is empty and `(offset, offset)` is returned regardless of
/// the remaining axes.
pub fn min_max_byte_offsets(shape: &[usize], strides: &[isize], offset: isize) -> (isize, isize) {
    // Evaluated widened; results beyond the isize range saturate.
    let (min, max) = min_max_i128(shape, strides, offset);
    (saturate_isize(min), saturate_isize(max))
}

#[inline]
fn saturate_isize(v: i128) -> isize {
    v.clamp(isize::MIN as i128, isize::MAX as i128) as isize
}

/// One-dimensional convenience wrapper around [`min_max_byte_offsets`].
#[inline]
pub fn strided_min_max(len: usize, stride: isize, offset: isize) -> (isize, isize) {
    min_max_byte_offsets(&[len], &[stride], offset)
}

/// Whether a buffer holding `buffer_len` elements of `dtype` can back the
/// described view.
///
/// True iff `min >= 0` and `max / bytes_per_element < buffer_len`. Strides
/// and offset are expected to be multiples of the element size; the
/// byte-accurate variant used by the safe view constructors is
/// [`fits_in_buffer`].
pub fn is_buffer_length_compatible(
    dtype: DType,
    buffer_len: usize,
    shape: &[usize],
    strides: &[isize],
    offset: isize,
) -> bool {
    let nbytes = dtype.bytes_per_element() as i128;
    let (min, max) = min_max_i128(shape, strides, offset);
    min >= 0 && max / nbytes < buffer_len as i128
}

/// Whether the view visits every byte between its minimum and maximum offset
/// exactly once, i.e. whether it describes a single contiguous memory
/// segment with no gaps.
pub fn is_single_segment_compatible(
    dtype: DType,
    shape: &[usize],
    strides: &[isize],
    offset: isize,
) -> bool {
    let nbytes = dtype.bytes_per_element() as i128;
    let len: i128 = shape.iter().map(|&d| d as i128).product();
    let (min, max) = min_max_i128(shape, strides, offset);
    len * nbytes == (max - min) + nbytes
}

/// Byte-accurate admission check used by the safe view constructors.
///
/// Unlike [`is_buffer_length_compatible`], this does not assume strides and
/// offset are element-size multiples: it requires the final element read to
/// end within the buffer (`max + bytes_per_element <= buffer_len_bytes`).
pub(crate) fn fits_in_buffer(
    dtype: DType,
    buffer_len_bytes: usize,
    shape: &[usize],
    strides: &[isize],
    offset: isize,
) -> bool {
    let nbytes = dtype.bytes_per_element() as i128;
    let (min, max) = min_max_i128(shape, strides, offset);
    if shape.contains(&0) {
        // Empty views touch nothing; only the descriptor must be sane.
        return min >= 0;
    }
    min >= 0 && max + nbytes <= buffer_len_bytes as i128
}

// Widened arithmetic so that predicate evaluation cannot itself overflow on
// adversarial shape/stride combinations.
fn min_max_i128(shape: &[usize], strides: &[isize], offset: isize) -> (i128, i128) {
    let mut min = offset as i128;
    let mut max = offset as i128;
    for (&d, &s) in shape.iter().zip(strides.iter()) {
        if d == 0 {
            return (offset as i128, offset as i128);
        }
        let extent = s as i128 * (d as i128 - 1);
        if s > 0 {
            max += extent;
        } else if s < 0 {
            min += extent;
        }
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_contiguous() {
        // shape [4], stride 8 bytes, offset 0: addresses 0..=24
        assert_eq!(min_max_byte_offsets(&[4], &[8], 0), (0, 24));
    }

    #[test]
    fn test_min_max_negative_stride() {
        // Logical-first element at byte 24, walking down to 0.
        assert_eq!(min_max_byte_offsets(&[4], &[-8], 24), (0, 24));
    }

    #[test]
    fn test_min_max_zero_stride() {
        assert_eq!(min_max_byte_offsets(&[100], &[0], 16), (16, 16));
    }

    #[test]
    fn test_min_max_empty_axis_short_circuits() {
        // Any zero-extent axis empties the view regardless of other axes.
        assert_eq!(min_max_byte_offsets(&[10, 0, 10], &[80, 8, -800], 40), (40, 40));
        assert_eq!(min_max_byte_offsets(&[0], &[8], 8), (8, 8));
    }

    #[test]
    fn test_min_max_huge_extents_saturate() {
        // Type-valid but unrepresentable geometry must not panic.
        assert_eq!(
            min_max_byte_offsets(&[usize::MAX], &[isize::MAX], 0),
            (0, isize::MAX)
        );
        assert_eq!(
            min_max_byte_offsets(&[usize::MAX], &[isize::MIN], 0),
            (isize::MIN, 0)
        );
    }

    #[test]
    fn test_min_max_mixed_signs() {
        // shape [3, 2], strides [16, -8], offset 8:
        // min = 8 + (-8)*(2-1) = 0, max = 8 + 16*(3-1) = 40
        assert_eq!(min_max_byte_offsets(&[3, 2], &[16, -8], 8), (0, 40));
    }

    #[test]
    fn test_offset_between_min_and_max() {
        let cases: [(&[usize], &[isize], isize); 4] = [
            (&[4], &[8], 0),
            (&[4], &[-8], 24),
            (&[3, 2], &[16, -8], 8),
            (&[5, 5], &[0, 4], 12),
        ];
        for (shape, strides, offset) in cases {
            let (min, max) = min_max_byte_offsets(shape, strides, offset);
            assert!(min <= offset && offset <= max);
        }
    }

    #[test]
    fn test_buffer_length_compatible() {
        // shape [10, 10], strides [10, 1] elements (x8 bytes), offset 0
        let shape = [10usize, 10];
        let strides = [80isize, 8];
        assert!(is_buffer_length_compatible(
            DType::Float64,
            1000,
            &shape,
            &strides,
            0
        ));
        assert!(!is_buffer_length_compatible(
            DType::Float64,
            10,
            &shape,
            &strides,
            0
        ));
    }

    #[test]
    fn test_buffer_length_negative_min() {
        // Negative stride with an offset too small to keep min >= 0.
        assert!(!is_buffer_length_compatible(
            DType::Float64,
            100,
            &[4],
            &[-8],
            8
        ));
    }

    #[test]
    fn test_single_segment() {
        // Fully contiguous: stride == element size.
        assert!(is_single_segment_compatible(DType::Float64, &[4], &[8], 0));
        // Gapped: stride == 2 * element size.
        assert!(!is_single_segment_compatible(DType::Float64, &[4], &[16], 0));
        // Reversed contiguous runs still cover every byte exactly once.
        assert!(is_single_segment_compatible(DType::Float64, &[4], &[-8], 24));
    }

    #[test]
    fn test_single_segment_multidim() {
        // Row-major 3x4 of f32: strides [16, 4] bytes.
        assert!(is_single_segment_compatible(
            DType::Float32,
            &[3, 4],
            &[16, 4],
            0
        ));
        // Same shape with a padded row stride leaves gaps.
        assert!(!is_single_segment_compatible(
            DType::Float32,
            &[3, 4],
            &[32, 4],
            0
        ));
    }
}
