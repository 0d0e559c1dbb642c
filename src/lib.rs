//! fftsolve is a small set of planner-pluggable FFT strategies.
//!
//! A [`Planner`](crate::Planner) owns a list of [`Solver`](crate::Solver)s. Given a
//! [`DftProblem`](crate::DftProblem), which describes a transform in terms of raw
//! pointers and strides, the planner asks each solver in registration order whether it can
//! handle the problem, and the first one that can builds an executable [`Plan`](crate::Plan).
//!
//! Two solvers are provided:
//!
//! - [`DelegateSolver`](crate::algorithm::DelegateSolver) hands in-place, interleaved,
//! power-of-two transforms to an external FFT routine described by the
//! [`ExternalFft`](crate::external::ExternalFft) trait. The routine only accepts buffers that
//! start on a fixed alignment boundary, so the solver decodes the transform direction from the
//! pointer layout and rejects any layout where the pointer handed to the routine would be misaligned.
//! - [`DftSolver`](crate::algorithm::DftSolver) is a naive O(n^2) DFT that accepts any
//! 1-D problem. It's used as the fallback and as the reference in tests.
//!
//! A built-in pure Rust [`Radix2Backend`](crate::external::Radix2Backend) implements
//! `ExternalFft`, so the delegate can be used without linking anything.
//!
//! The [`rdft::hc2c`](crate::rdft::hc2c) module holds the genus descriptors for the
//! half-complex-to-complex kernel families.
//!
//! ### Usage
//!
//! ```
//! use fftsolve::num_complex::Complex;
//! use fftsolve::{DftProblem, FftDirection, Planner};
//!
//! let planner = Planner::<f32>::with_defaults();
//!
//! let mut buffer = vec![Complex { re: 1.0f32, im: 0.0f32 }; 64];
//! let problem = DftProblem::inplace_interleaved(&mut buffer, FftDirection::Forward);
//! let plan = planner.plan(&problem).unwrap();
//!
//! plan.process_inplace(&mut buffer, FftDirection::Forward);
//! assert!((buffer[0].re - 64.0).abs() < 1e-3);
//! ```
//!
//! ### Normalization
//!
//! No plan normalizes its output. Running a forward transform followed by an inverse transform
//! scales every element by `len`.

pub use num_complex;
pub use num_traits;

mod common;

pub mod algorithm;
pub mod external;
pub mod plan;
pub mod planner;
pub mod problem;
pub mod rdft;
pub mod solver;
mod twiddles;

#[cfg(test)]
mod test_utils;

use std::fmt::Display;

pub use crate::common::FftNum;
pub use crate::plan::{OpCount, Plan};
pub use crate::planner::{Planner, RegistryError};
pub use crate::problem::{DftProblem, IoDim, Tensor};
pub use crate::solver::Solver;

/// A trait that allows FFT algorithms to report their expected input/output size
pub trait Length {
    /// The FFT size that this algorithm can process
    fn len(&self) -> usize;
}

/// Represents a FFT direction, IE a forward FFT or an inverse FFT
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum FftDirection {
    Forward,
    Inverse,
}
impl FftDirection {
    /// Returns the opposite direction of `self`.
    ///
    ///  - If `self` is `FftDirection::Forward`, returns `FftDirection::Inverse`
    ///  - If `self` is `FftDirection::Inverse`, returns `FftDirection::Forward`
    #[inline]
    pub fn opposite_direction(&self) -> FftDirection {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }

    /// Returns true if this is an inverse direction
    #[inline]
    pub fn is_inverse(&self) -> bool {
        matches!(self, Self::Inverse)
    }
}
impl Display for FftDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Forward => f.write_str("Forward"),
            Self::Inverse => f.write_str("Inverse"),
        }
    }
}

/// A trait that allows FFT algorithms to report whether they compute forward FFTs or inverse FFTs
pub trait Direction {
    /// Returns FftDirection::Inverse if this instance computes inverse FFTs, or FftDirection::Forward if this instance computes forward FFTs
    fn fft_direction(&self) -> FftDirection;
}
