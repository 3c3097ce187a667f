//! Element type tags for strided buffers.
//!
//! Every buffer handed to the loop engines carries a runtime [`DType`] tag
//! describing its element type. Each tag also has a single-character code
//! (`d` = float64, `f` = float32, and so on) matching the convention used by
//! C strided interfaces.

use num_complex::Complex;
use std::fmt;

/// Runtime element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Bool,
}

impl DType {
    /// Number of bytes per element.
    #[inline]
    pub const fn bytes_per_element(self) -> usize {
        match self {
            DType::Int8 | DType::Uint8 | DType::Bool => 1,
            DType::Int16 | DType::Uint16 => 2,
            DType::Int32 | DType::Uint32 | DType::Float32 => 4,
            DType::Int64 | DType::Uint64 | DType::Float64 | DType::Complex64 => 8,
            DType::Complex128 => 16,
        }
    }

    /// Single-character type code.
    #[inline]
    pub const fn char_code(self) -> char {
        match self {
            DType::Int8 => 'b',
            DType::Int16 => 'h',
            DType::Int32 => 'i',
            DType::Int64 => 'l',
            DType::Uint8 => 'B',
            DType::Uint16 => 'H',
            DType::Uint32 => 'I',
            DType::Uint64 => 'L',
            DType::Float32 => 'f',
            DType::Float64 => 'd',
            DType::Complex64 => 'c',
            DType::Complex128 => 'z',
            DType::Bool => 'x',
        }
    }

    /// Resolve a tag from its single-character code.
    pub fn from_char(c: char) -> Option<DType> {
        Some(match c {
            'b' => DType::Int8,
            'h' => DType::Int16,
            'i' => DType::Int32,
            'l' => DType::Int64,
            'B' => DType::Uint8,
            'H' => DType::Uint16,
            'I' => DType::Uint32,
            'L' => DType::Uint64,
            'f' => DType::Float32,
            'd' => DType::Float64,
            'c' => DType::Complex64,
            'z' => DType::Complex128,
            'x' => DType::Bool,
            _ => return None,
        })
    }

    /// Whether a buffer tagged `self` may be reinterpreted as storage of
    /// `other`.
    ///
    /// Identical tags are always compatible. `Bool` and `Uint8` share a
    /// one-byte storage representation, which is what lets mask buffers be
    /// declared with either tag.
    #[inline]
    pub fn storage_eq(self, other: DType) -> bool {
        self == other
            || matches!(
                (self, other),
                (DType::Bool, DType::Uint8) | (DType::Uint8, DType::Bool)
            )
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Uint8 => "uint8",
            DType::Uint16 => "uint16",
            DType::Uint32 => "uint32",
            DType::Uint64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
            DType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A Rust scalar usable as a strided buffer element.
///
/// Ties each plain-old-data scalar to its runtime tag so typed entry points
/// can verify a buffer's declared [`DType`] before reinterpreting raw bytes.
/// `Bool` buffers are processed through `u8` storage.
pub trait PodElement: bytemuck::Pod {
    /// The tag corresponding to `Self`.
    const DTYPE: DType;
}

macro_rules! impl_pod_element {
    ($($ty:ty => $tag:expr),* $(,)?) => {
        $(
            impl PodElement for $ty {
                const DTYPE: DType = $tag;
            }
        )*
    };
}

impl_pod_element! {
    i8 => DType::Int8,
    i16 => DType::Int16,
    i32 => DType::Int32,
    i64 => DType::Int64,
    u8 => DType::Uint8,
    u16 => DType::Uint16,
    u32 => DType::Uint32,
    u64 => DType::Uint64,
    f32 => DType::Float32,
    f64 => DType::Float64,
}

impl PodElement for Complex<f32> {
    const DTYPE: DType = DType::Complex64;
}

impl PodElement for Complex<f64> {
    const DTYPE: DType = DType::Complex128;
}
