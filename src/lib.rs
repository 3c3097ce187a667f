//! Strided apply engine for typed array buffers.
//!
//! This crate iterates element-wise callbacks over strided views of flat
//! byte buffers. A view pairs a borrowed buffer with iteration geometry
//! (extents, signed byte strides, a byte offset, an element type tag), so
//! the same buffer can be traversed forward, in reverse, with gaps, or with
//! a broadcast zero stride without copying. Admission checks happen once at
//! view construction; the loops themselves run unchecked pointer walks.
//!
//! The flat engine ([`apply`]) covers arities zero through five, masked
//! variants, two-output variants, and casting variants whose callback types
//! differ from the storage types. The n-dimensional engine ([`ndapply`])
//! adds shape-aware traversal with cache-oriented axis reordering and
//! tiling. [`dispatch`] maps element type signatures to type-erased kernels.
//!
//! ```
//! use strided_apply::{apply, ArgView, ArgViewMut, DType, StridedSpec};
//!
//! let x = [1.0f64, 2.0, 3.0, 4.0];
//! let mut y = [0.0f64; 4];
//! let spec = StridedSpec::contiguous(4, DType::Float64);
//! let xv = ArgView::from_elements(&x, spec)?;
//! let mut yv = ArgViewMut::from_elements_mut(&mut y, spec)?;
//! apply::unary(&xv, &mut yv, |v: f64| v * v)?;
//! assert_eq!(y, [1.0, 4.0, 9.0, 16.0]);
//! # Ok::<(), strided_apply::ApplyError>(())
//! ```

pub mod apply;
mod block;
pub mod bounds;
mod cursor;
pub mod dispatch;
mod dtype;
pub mod ndapply;
mod order;
mod view;

pub use dispatch::{
    binary_kernel, nd_binary_kernel, nd_unary_kernel, nullary_kernel, quaternary_kernel,
    quinary_kernel, ternary_kernel, unary_as_kernel, unary_kernel, ApplyArgs, ApplyKernel,
    DispatchTable, DispatchTableBuilder, NdApplyArgs, NdApplyKernel, Signature,
};
pub use dtype::{DType, PodElement};
pub use view::{ArgView, ArgViewMut, Axes, NdSpec, NdView, NdViewMut, Order, StridedSpec};

/// Target working-set size in bytes for one tile of a blocked traversal.
pub const BLOCK_MEMORY_SIZE: usize = 32 * 1024;

/// Assumed cache line size in bytes for memory footprint estimates.
pub const CACHE_LINE_SIZE: usize = 64;

/// Errors reported by view construction, the loop engines, and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// No kernel is registered for the requested type signature.
    #[error("unsupported type signature: {0}")]
    TypeNotSupported(String),

    /// The view geometry addresses bytes outside the buffer.
    #[error("view addresses bytes {min}..={max} outside buffer of {len} bytes")]
    BoundsViolation { min: isize, max: isize, len: usize },

    /// Two arguments that must agree on shape do not.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Two arguments that must agree on rank do not.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// An argument's element type tag does not match the requested element
    /// type.
    #[error("dtype mismatch: expected {expected}, got {actual}")]
    DTypeMismatch { expected: DType, actual: DType },

    /// A kernel received a different number of arguments than it was built
    /// for.
    #[error("arity mismatch: kernel takes {expected} argument(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ApplyError>;
