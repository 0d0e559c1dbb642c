//! Transform problem descriptors.
//!
//! A [`DftProblem`] describes a complex DFT the same way the execution layer sees it: as four raw
//! pointers to scalars plus strides, counted in scalars. The real and imaginary parts of element `k`
//! of the input live at `ri[k * is]` and `ii[k * is]`.
//!
//! The pointers also carry the transform direction. A forward transform over an interleaved buffer
//! uses `ii == ri + 1`. An inverse transform is expressed by swapping the roles of the two pointers,
//! so that `ri == ii + 1`: running a forward DFT on swapped real/imaginary parts is exactly the
//! inverse DFT of the unswapped data.

use num_complex::Complex;

use crate::{FftDirection, FftNum};

/// One dimension of a problem: `n` elements, input stride `is` and output stride `os`, in scalars
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IoDim {
    pub n: usize,
    pub is: isize,
    pub os: isize,
}

impl IoDim {
    pub fn new(n: usize, is: isize, os: isize) -> Self {
        Self { n, is, os }
    }
}

/// A list of dimensions. The rank of the tensor is the number of dimensions it holds.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Tensor {
    dims: Vec<IoDim>,
}

impl Tensor {
    /// Creates a rank-0 tensor
    pub fn empty() -> Self {
        Self { dims: Vec::new() }
    }

    /// Creates a rank-1 tensor holding `dim`
    pub fn rank1(dim: IoDim) -> Self {
        Self { dims: vec![dim] }
    }

    pub fn from_dims(dims: Vec<IoDim>) -> Self {
        Self { dims }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[IoDim] {
        &self.dims
    }
}

/// Describes a requested complex DFT.
///
/// `sz` holds the transform dimensions and `vecsz` holds the dimensions of the outer loop of
/// independent transforms, if any.
///
/// The problem doesn't borrow the memory its pointers refer to. Whoever executes a plan built
/// from it is responsible for keeping that memory alive and valid for the plan's strides.
#[derive(Clone, Debug)]
pub struct DftProblem<T> {
    pub sz: Tensor,
    pub vecsz: Tensor,
    pub ri: *mut T,
    pub ii: *mut T,
    pub ro: *mut T,
    pub io: *mut T,
}

impl<T: FftNum> DftProblem<T> {
    pub fn new(sz: Tensor, vecsz: Tensor, ri: *mut T, ii: *mut T, ro: *mut T, io: *mut T) -> Self {
        Self {
            sz,
            vecsz,
            ri,
            ii,
            ro,
            io,
        }
    }

    /// Describes a single in-place transform of `buffer`, in the pointer layout for `direction`
    pub fn inplace_interleaved(buffer: &mut [Complex<T>], direction: FftDirection) -> Self {
        let (ri, ii) = interleaved_pointers(buffer, direction);
        Self::new(
            Tensor::rank1(IoDim::new(buffer.len(), 2, 2)),
            Tensor::empty(),
            ri,
            ii,
            ri,
            ii,
        )
    }

    /// Describes a single transform from `input` into `output`, in the pointer layout for `direction`
    pub fn outofplace_interleaved(
        input: &mut [Complex<T>],
        output: &mut [Complex<T>],
        direction: FftDirection,
    ) -> Self {
        assert_eq!(
            input.len(),
            output.len(),
            "Input and output must have the same length. Expected {}, got {}",
            input.len(),
            output.len()
        );
        let (ri, ii) = interleaved_pointers(input, direction);
        let (ro, io) = interleaved_pointers(output, direction);
        Self::new(
            Tensor::rank1(IoDim::new(input.len(), 2, 2)),
            Tensor::empty(),
            ri,
            ii,
            ro,
            io,
        )
    }

    /// Returns true if the output pointers are the input pointers
    pub fn is_inplace(&self) -> bool {
        self.ri == self.ro && self.ii == self.io
    }

    /// Returns true if any of the four pointers is null
    pub fn has_null_pointer(&self) -> bool {
        self.ri.is_null() || self.ii.is_null() || self.ro.is_null() || self.io.is_null()
    }

    /// The direction encoded by the relationship between `ri` and `ii`, if any
    pub fn layout_direction(&self) -> Option<FftDirection> {
        layout_direction(self.ri, self.ii)
    }
}

/// Decodes the transform direction from the relative position of the real and imaginary pointers.
///
/// Returns `Forward` if `ii == ri + 1`, `Inverse` if `ri == ii + 1`, and `None` for any other layout.
/// The two patterns can't hold at the same time.
#[inline]
pub fn layout_direction<T>(ri: *const T, ii: *const T) -> Option<FftDirection> {
    if ii == ri.wrapping_add(1) {
        Some(FftDirection::Forward)
    } else if ri == ii.wrapping_add(1) {
        Some(FftDirection::Inverse)
    } else {
        None
    }
}

/// Splits an interleaved complex buffer into the real and imaginary pointers for `direction`
#[inline]
pub fn interleaved_pointers<T>(
    buffer: &mut [Complex<T>],
    direction: FftDirection,
) -> (*mut T, *mut T) {
    // Complex<T> is repr(C), so element k's real part is scalar 2k and its imaginary part is scalar 2k+1
    let base = buffer.as_mut_ptr() as *mut T;
    match direction {
        FftDirection::Forward => (base, base.wrapping_add(1)),
        FftDirection::Inverse => (base.wrapping_add(1), base),
    }
}
