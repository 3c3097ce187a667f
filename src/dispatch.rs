//! Type dispatch tables.
//!
//! A table is an ordered list of (signature, kernel) entries built once and
//! immutable afterwards. Resolution is a linear scan for an exact signature
//! match; there is no implicit promotion, and a missing entry is reported as
//! [`ApplyError::TypeNotSupported`] rather than falling back to a nearby
//! type. Tables are `Send + Sync` so a built table can be shared across
//! threads.
//!
//! Kernels erase the element types behind [`ApplyKernel`]: each kernel pairs
//! a monomorphized loop with a concrete callback, and the table stores them
//! boxed. The provided constructors cover the common arities; custom kernels
//! implement the trait directly.

use crate::dtype::{DType, PodElement};
use crate::view::{ArgView, ArgViewMut, Axes, NdView, NdViewMut};
use crate::{apply, ndapply, ApplyError, Result};
use num_traits::AsPrimitive;
use std::fmt;
use std::marker::PhantomData;

/// An ordered tuple of element type tags identifying one kernel entry.
///
/// Convention: input tags first, then the output tag(s). A mask argument is
/// not part of the signature; masked and unmasked calls resolve to the same
/// entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    tags: Axes<DType>,
}

impl Signature {
    pub fn new(tags: &[DType]) -> Self {
        Self {
            tags: Axes::from_slice(tags),
        }
    }

    #[inline]
    pub fn tags(&self) -> &[DType] {
        &self.tags
    }

    #[inline]
    pub fn matches(&self, tags: &[DType]) -> bool {
        self.tags.as_slice() == tags
    }

    /// Compact single-character rendering, e.g. `"ddf"`.
    pub fn char_codes(&self) -> String {
        self.tags.iter().map(|t| t.char_code()).collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

/// Arguments handed to a flat (one-dimensional) kernel.
pub struct ApplyArgs<'a, 'v> {
    pub inputs: &'v [ArgView<'a>],
    pub mask: Option<&'v ArgView<'a>>,
    pub outputs: &'v mut [ArgViewMut<'a>],
}

/// A type-erased flat kernel.
pub trait ApplyKernel: Send + Sync {
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()>;
}

/// Arguments handed to an n-dimensional kernel.
pub struct NdApplyArgs<'a, 'v> {
    pub inputs: &'v [NdView<'a>],
    pub mask: Option<&'v NdView<'a>>,
    pub outputs: &'v mut [NdViewMut<'a>],
}

/// A type-erased n-dimensional kernel.
pub trait NdApplyKernel: Send + Sync {
    fn apply(&self, args: NdApplyArgs<'_, '_>) -> Result<()>;
}

fn check_arity(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ApplyError::ArityMismatch { expected, actual })
    }
}

// ============================================================================
// Flat kernel adapters
// ============================================================================

struct NullaryKernel<Y, F> {
    f: F,
    _marker: PhantomData<fn() -> Y>,
}

impl<Y, F> ApplyKernel for NullaryKernel<Y, F>
where
    Y: PodElement,
    F: Fn() -> Y + Send + Sync,
{
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()> {
        check_arity(0, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let y = &mut args.outputs[0];
        match args.mask {
            Some(m) => apply::msk_nullary(m, y, || (self.f)()),
            None => apply::nullary(y, || (self.f)()),
        }
    }
}

/// Wrap a nullary callback as a boxed kernel.
pub fn nullary_kernel<Y, F>(f: F) -> Box<dyn ApplyKernel>
where
    Y: PodElement,
    F: Fn() -> Y + Send + Sync + 'static,
{
    Box::new(NullaryKernel {
        f,
        _marker: PhantomData,
    })
}

struct UnaryKernel<X, Y, F> {
    f: F,
    _marker: PhantomData<fn(X) -> Y>,
}

impl<X, Y, F> ApplyKernel for UnaryKernel<X, Y, F>
where
    X: PodElement,
    Y: PodElement,
    F: Fn(X) -> Y + Send + Sync,
{
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()> {
        check_arity(1, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let y = &mut args.outputs[0];
        match args.mask {
            Some(m) => apply::msk_unary(&args.inputs[0], m, y, |v| (self.f)(v)),
            None => apply::unary(&args.inputs[0], y, |v| (self.f)(v)),
        }
    }
}

/// Wrap a unary callback as a boxed kernel.
pub fn unary_kernel<X, Y, F>(f: F) -> Box<dyn ApplyKernel>
where
    X: PodElement,
    Y: PodElement,
    F: Fn(X) -> Y + Send + Sync + 'static,
{
    Box::new(UnaryKernel {
        f,
        _marker: PhantomData,
    })
}

struct BinaryKernel<X1, X2, Y, F> {
    f: F,
    _marker: PhantomData<fn(X1, X2) -> Y>,
}

impl<X1, X2, Y, F> ApplyKernel for BinaryKernel<X1, X2, Y, F>
where
    X1: PodElement,
    X2: PodElement,
    Y: PodElement,
    F: Fn(X1, X2) -> Y + Send + Sync,
{
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()> {
        check_arity(2, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let y = &mut args.outputs[0];
        match args.mask {
            Some(m) => {
                apply::msk_binary(&args.inputs[0], &args.inputs[1], m, y, |a, b| (self.f)(a, b))
            }
            None => apply::binary(&args.inputs[0], &args.inputs[1], y, |a, b| (self.f)(a, b)),
        }
    }
}

/// Wrap a binary callback as a boxed kernel.
pub fn binary_kernel<X1, X2, Y, F>(f: F) -> Box<dyn ApplyKernel>
where
    X1: PodElement,
    X2: PodElement,
    Y: PodElement,
    F: Fn(X1, X2) -> Y + Send + Sync + 'static,
{
    Box::new(BinaryKernel {
        f,
        _marker: PhantomData,
    })
}

struct TernaryKernel<X1, X2, X3, Y, F> {
    f: F,
    _marker: PhantomData<fn(X1, X2, X3) -> Y>,
}

impl<X1, X2, X3, Y, F> ApplyKernel for TernaryKernel<X1, X2, X3, Y, F>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    Y: PodElement,
    F: Fn(X1, X2, X3) -> Y + Send + Sync,
{
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()> {
        check_arity(3, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let (i, y) = (args.inputs, &mut args.outputs[0]);
        match args.mask {
            Some(m) => apply::msk_ternary(&i[0], &i[1], &i[2], m, y, |a, b, c| (self.f)(a, b, c)),
            None => apply::ternary(&i[0], &i[1], &i[2], y, |a, b, c| (self.f)(a, b, c)),
        }
    }
}

/// Wrap a ternary callback as a boxed kernel.
pub fn ternary_kernel<X1, X2, X3, Y, F>(f: F) -> Box<dyn ApplyKernel>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    Y: PodElement,
    F: Fn(X1, X2, X3) -> Y + Send + Sync + 'static,
{
    Box::new(TernaryKernel {
        f,
        _marker: PhantomData,
    })
}

struct QuaternaryKernel<X1, X2, X3, X4, Y, F> {
    f: F,
    _marker: PhantomData<fn(X1, X2, X3, X4) -> Y>,
}

impl<X1, X2, X3, X4, Y, F> ApplyKernel for QuaternaryKernel<X1, X2, X3, X4, Y, F>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    Y: PodElement,
    F: Fn(X1, X2, X3, X4) -> Y + Send + Sync,
{
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()> {
        check_arity(4, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let (i, y) = (args.inputs, &mut args.outputs[0]);
        match args.mask {
            Some(m) => apply::msk_quaternary(&i[0], &i[1], &i[2], &i[3], m, y, |a, b, c, d| {
                (self.f)(a, b, c, d)
            }),
            None => apply::quaternary(&i[0], &i[1], &i[2], &i[3], y, |a, b, c, d| {
                (self.f)(a, b, c, d)
            }),
        }
    }
}

/// Wrap a quaternary callback as a boxed kernel.
pub fn quaternary_kernel<X1, X2, X3, X4, Y, F>(f: F) -> Box<dyn ApplyKernel>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    Y: PodElement,
    F: Fn(X1, X2, X3, X4) -> Y + Send + Sync + 'static,
{
    Box::new(QuaternaryKernel {
        f,
        _marker: PhantomData,
    })
}

struct QuinaryKernel<X1, X2, X3, X4, X5, Y, F> {
    f: F,
    _marker: PhantomData<fn(X1, X2, X3, X4, X5) -> Y>,
}

impl<X1, X2, X3, X4, X5, Y, F> ApplyKernel for QuinaryKernel<X1, X2, X3, X4, X5, Y, F>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    X5: PodElement,
    Y: PodElement,
    F: Fn(X1, X2, X3, X4, X5) -> Y + Send + Sync,
{
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()> {
        check_arity(5, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let (i, y) = (args.inputs, &mut args.outputs[0]);
        match args.mask {
            Some(m) => {
                apply::msk_quinary(&i[0], &i[1], &i[2], &i[3], &i[4], m, y, |a, b, c, d, e| {
                    (self.f)(a, b, c, d, e)
                })
            }
            None => apply::quinary(&i[0], &i[1], &i[2], &i[3], &i[4], y, |a, b, c, d, e| {
                (self.f)(a, b, c, d, e)
            }),
        }
    }
}

/// Wrap a quinary callback as a boxed kernel.
pub fn quinary_kernel<X1, X2, X3, X4, X5, Y, F>(f: F) -> Box<dyn ApplyKernel>
where
    X1: PodElement,
    X2: PodElement,
    X3: PodElement,
    X4: PodElement,
    X5: PodElement,
    Y: PodElement,
    F: Fn(X1, X2, X3, X4, X5) -> Y + Send + Sync + 'static,
{
    Box::new(QuinaryKernel {
        f,
        _marker: PhantomData,
    })
}

struct UnaryAsKernel<X, Y, A, R, F> {
    f: F,
    _marker: PhantomData<fn(X, A, R) -> Y>,
}

impl<X, Y, A, R, F> ApplyKernel for UnaryAsKernel<X, Y, A, R, F>
where
    X: PodElement + AsPrimitive<A>,
    Y: PodElement,
    A: Copy + Send + Sync + 'static,
    R: AsPrimitive<Y>,
    F: Fn(A) -> R + Send + Sync,
{
    fn apply(&self, args: ApplyArgs<'_, '_>) -> Result<()> {
        check_arity(1, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let y = &mut args.outputs[0];
        match args.mask {
            Some(m) => {
                apply::msk_unary_as::<X, Y, A, R, _>(&args.inputs[0], m, y, |v| (self.f)(v))
            }
            None => apply::unary_as::<X, Y, A, R, _>(&args.inputs[0], y, |v| (self.f)(v)),
        }
    }
}

/// Wrap a unary callback with a casting boundary as a boxed kernel.
///
/// Storage types `X` and `Y` are cast to and from the callback types `A` and
/// `R` at the callback boundary, so one `f64 -> f64` callback can serve many
/// storage signatures.
pub fn unary_as_kernel<X, Y, A, R, F>(f: F) -> Box<dyn ApplyKernel>
where
    X: PodElement + AsPrimitive<A>,
    Y: PodElement,
    A: Copy + Send + Sync + 'static,
    R: AsPrimitive<Y> + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    // X and Y only appear in cast bounds, so inference cannot pin them.
    Box::new(UnaryAsKernel::<X, Y, A, R, F> {
        f,
        _marker: PhantomData,
    })
}

// ============================================================================
// N-dimensional kernel adapters
// ============================================================================

struct NdUnaryKernel<X, Y, F> {
    f: F,
    _marker: PhantomData<fn(X) -> Y>,
}

impl<X, Y, F> NdApplyKernel for NdUnaryKernel<X, Y, F>
where
    X: PodElement,
    Y: PodElement,
    F: Fn(X) -> Y + Send + Sync,
{
    fn apply(&self, args: NdApplyArgs<'_, '_>) -> Result<()> {
        check_arity(1, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let y = &mut args.outputs[0];
        match args.mask {
            Some(m) => ndapply::nd_msk_unary(&args.inputs[0], m, y, |v| (self.f)(v)),
            None => ndapply::nd_unary(&args.inputs[0], y, |v| (self.f)(v)),
        }
    }
}

/// Wrap a unary callback as a boxed n-dimensional kernel.
pub fn nd_unary_kernel<X, Y, F>(f: F) -> Box<dyn NdApplyKernel>
where
    X: PodElement,
    Y: PodElement,
    F: Fn(X) -> Y + Send + Sync + 'static,
{
    Box::new(NdUnaryKernel {
        f,
        _marker: PhantomData,
    })
}

struct NdBinaryKernel<X1, X2, Y, F> {
    f: F,
    _marker: PhantomData<fn(X1, X2) -> Y>,
}

impl<X1, X2, Y, F> NdApplyKernel for NdBinaryKernel<X1, X2, Y, F>
where
    X1: PodElement,
    X2: PodElement,
    Y: PodElement,
    F: Fn(X1, X2) -> Y + Send + Sync,
{
    fn apply(&self, args: NdApplyArgs<'_, '_>) -> Result<()> {
        check_arity(2, args.inputs.len())?;
        check_arity(1, args.outputs.len())?;
        let y = &mut args.outputs[0];
        match args.mask {
            Some(m) => {
                ndapply::nd_msk_binary(&args.inputs[0], &args.inputs[1], m, y, |a, b| {
                    (self.f)(a, b)
                })
            }
            None => ndapply::nd_binary(&args.inputs[0], &args.inputs[1], y, |a, b| (self.f)(a, b)),
        }
    }
}

/// Wrap a binary callback as a boxed n-dimensional kernel.
pub fn nd_binary_kernel<X1, X2, Y, F>(f: F) -> Box<dyn NdApplyKernel>
where
    X1: PodElement,
    X2: PodElement,
    Y: PodElement,
    F: Fn(X1, X2) -> Y + Send + Sync + 'static,
{
    Box::new(NdBinaryKernel {
        f,
        _marker: PhantomData,
    })
}

// ============================================================================
// Table
// ============================================================================

/// An immutable signature-to-kernel table.
///
/// Entries keep registration order; [`DispatchTable::resolve`] returns the
/// first exact match, so duplicate registrations are shadowed by the earliest
/// one.
pub struct DispatchTable<K = Box<dyn ApplyKernel>> {
    entries: Vec<(Signature, K)>,
}

/// Accumulates entries for a [`DispatchTable`].
pub struct DispatchTableBuilder<K = Box<dyn ApplyKernel>> {
    entries: Vec<(Signature, K)>,
}

impl<K> Default for DispatchTableBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> DispatchTableBuilder<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with(mut self, signature: Signature, kernel: K) -> Self {
        self.entries.push((signature, kernel));
        self
    }

    pub fn build(self) -> DispatchTable<K> {
        DispatchTable {
            entries: self.entries,
        }
    }
}

impl<K> DispatchTable<K> {
    pub fn builder() -> DispatchTableBuilder<K> {
        DispatchTableBuilder::new()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first entry whose signature matches `tags` exactly.
    pub fn resolve(&self, tags: &[DType]) -> Option<usize> {
        self.entries.iter().position(|(sig, _)| sig.matches(tags))
    }

    pub fn get(&self, index: usize) -> Option<&K> {
        self.entries.get(index).map(|(_, k)| k)
    }

    pub fn signature(&self, index: usize) -> Option<&Signature> {
        self.entries.get(index).map(|(sig, _)| sig)
    }

    /// Resolve or fail with the unmatched signature rendered in the error.
    pub fn kernel_for(&self, tags: &[DType]) -> Result<&K> {
        match self.resolve(tags) {
            Some(i) => Ok(&self.entries[i].1),
            None => Err(ApplyError::TypeNotSupported(
                Signature::new(tags).to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::StridedSpec;

    fn table() -> DispatchTable {
        DispatchTable::builder()
            .with(
                Signature::new(&[DType::Uint8, DType::Uint8]),
                unary_kernel(|v: u8| v.saturating_add(1)),
            )
            .with(
                Signature::new(&[DType::Float32, DType::Float32]),
                unary_kernel(|v: f32| v + 1.0),
            )
            .with(
                Signature::new(&[DType::Float64, DType::Float64]),
                unary_kernel(|v: f64| v + 1.0),
            )
            .build()
    }

    #[test]
    fn test_resolve_exact_match() {
        let t = table();
        assert_eq!(t.resolve(&[DType::Float32, DType::Float32]), Some(1));
        assert_eq!(t.resolve(&[DType::Float64, DType::Float64]), Some(2));
    }

    #[test]
    fn test_resolve_no_promotion() {
        let t = table();
        // A mixed signature resolves to nothing even though both tags appear
        // in registered entries.
        assert_eq!(t.resolve(&[DType::Uint8, DType::Float32]), None);
        let err = t.kernel_for(&[DType::Uint8, DType::Float32]).err().unwrap();
        match err {
            ApplyError::TypeNotSupported(sig) => {
                assert_eq!(sig, "uint8, float32");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let t = DispatchTable::builder()
            .with(
                Signature::new(&[DType::Float64, DType::Float64]),
                unary_kernel(|v: f64| v),
            )
            .with(
                Signature::new(&[DType::Float64, DType::Float64]),
                unary_kernel(|v: f64| -v),
            )
            .build();
        assert_eq!(t.resolve(&[DType::Float64, DType::Float64]), Some(0));
    }

    #[test]
    fn test_kernel_applies_through_table() {
        let t = table();
        let data = [1.0f64, 2.0, 3.0];
        let mut out = [0.0f64; 3];
        let spec = StridedSpec::contiguous(3, DType::Float64);
        let inputs = [ArgView::from_elements(&data, spec).unwrap()];
        let mut outputs = [ArgViewMut::from_elements_mut(&mut out, spec).unwrap()];
        let kernel = t.kernel_for(&[DType::Float64, DType::Float64]).unwrap();
        kernel
            .apply(ApplyArgs {
                inputs: &inputs,
                mask: None,
                outputs: &mut outputs,
            })
            .unwrap();
        assert_eq!(out, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_kernel_masked_through_table() {
        let t = table();
        let data = [1.0f64, 2.0, 3.0];
        let mask = [0u8, 1, 0];
        let mut out = [0.0f64; 3];
        let spec = StridedSpec::contiguous(3, DType::Float64);
        let mspec = StridedSpec::contiguous(3, DType::Uint8);
        let inputs = [ArgView::from_elements(&data, spec).unwrap()];
        let mview = ArgView::from_elements(&mask, mspec).unwrap();
        let mut outputs = [ArgViewMut::from_elements_mut(&mut out, spec).unwrap()];
        let kernel = t.kernel_for(&[DType::Float64, DType::Float64]).unwrap();
        kernel
            .apply(ApplyArgs {
                inputs: &inputs,
                mask: Some(&mview),
                outputs: &mut outputs,
            })
            .unwrap();
        assert_eq!(out, [2.0, 0.0, 4.0]);
    }

    #[test]
    fn test_kernel_arity_mismatch() {
        let t = table();
        let data = [1.0f64];
        let spec = StridedSpec::contiguous(1, DType::Float64);
        let inputs = [
            ArgView::from_elements(&data, spec).unwrap(),
            ArgView::from_elements(&data, spec).unwrap(),
        ];
        let mut out = [0.0f64];
        let mut outputs = [ArgViewMut::from_elements_mut(&mut out, spec).unwrap()];
        let kernel = t.kernel_for(&[DType::Float64, DType::Float64]).unwrap();
        let err = kernel
            .apply(ApplyArgs {
                inputs: &inputs,
                mask: None,
                outputs: &mut outputs,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ApplyError::ArityMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_unary_as_kernel_shares_callback_across_storage() {
        let half = |v: f64| v * 0.5;
        let t: DispatchTable = DispatchTable::builder()
            .with(
                Signature::new(&[DType::Float32, DType::Float32]),
                unary_as_kernel::<f32, f32, f64, f64, _>(half),
            )
            .with(
                Signature::new(&[DType::Float64, DType::Float64]),
                unary_as_kernel::<f64, f64, f64, f64, _>(half),
            )
            .build();
        let data = [2.0f32, 6.0];
        let mut out = [0.0f32; 2];
        let spec = StridedSpec::contiguous(2, DType::Float32);
        let inputs = [ArgView::from_elements(&data, spec).unwrap()];
        let mut outputs = [ArgViewMut::from_elements_mut(&mut out, spec).unwrap()];
        let kernel = t.kernel_for(&[DType::Float32, DType::Float32]).unwrap();
        kernel
            .apply(ApplyArgs {
                inputs: &inputs,
                mask: None,
                outputs: &mut outputs,
            })
            .unwrap();
        assert_eq!(out, [1.0, 3.0]);
    }

    #[test]
    fn test_nd_kernel_table() {
        use crate::view::{NdSpec, Order};
        let t: DispatchTable<Box<dyn NdApplyKernel>> = DispatchTable::builder()
            .with(
                Signature::new(&[DType::Float64, DType::Float64]),
                nd_unary_kernel(|v: f64| v * 2.0),
            )
            .build();
        let data = [1.0f64, 2.0, 3.0, 4.0];
        let mut out = [0.0f64; 4];
        let spec = NdSpec::new(DType::Float64, &[2, 2], &[16, 8], 0, Order::RowMajor).unwrap();
        let inputs = [NdView::from_elements(&data, spec.clone()).unwrap()];
        let mut outputs = [NdViewMut::from_elements_mut(&mut out, spec).unwrap()];
        let kernel = t.kernel_for(&[DType::Float64, DType::Float64]).unwrap();
        kernel
            .apply(NdApplyArgs {
                inputs: &inputs,
                mask: None,
                outputs: &mut outputs,
            })
            .unwrap();
        assert_eq!(out, [2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_table_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DispatchTable>();
        assert_send_sync::<DispatchTable<Box<dyn NdApplyKernel>>>();
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature::new(&[DType::Float64, DType::Int32, DType::Float64]);
        assert_eq!(sig.to_string(), "float64, int32, float64");
        assert_eq!(sig.char_codes(), "did");
    }
}
