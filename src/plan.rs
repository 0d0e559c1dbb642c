use num_complex::Complex;

use crate::common::{fft_error_inplace, fft_error_layout};
use crate::problem::interleaved_pointers;
use crate::{FftDirection, FftNum, Length};

/// Operation counts reported by a plan, used by cost-based plan comparison.
///
/// All-zero counts mean the plan's cost is unknown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OpCount {
    pub add: u64,
    pub mul: u64,
    pub fma: u64,
    pub other: u64,
}

impl OpCount {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// An executable transform produced by a [`Solver`](crate::Solver).
///
/// A plan is created once, applied any number of times, and destroyed exactly once. Destroying
/// releases whatever resources the plan owns; destroying twice is a no-op, and dropping a plan
/// destroys it if that hasn't happened already.
pub trait Plan<T: FftNum>: Length + Send + Sync {
    /// Executes the transform, reading from `ri`/`ii` and writing to `ro`/`io`.
    ///
    /// # Safety
    ///
    /// The four pointers must be valid for reads and writes over the strides of the problem this plan
    /// was built for, and must not be used by anything else for the duration of the call.
    unsafe fn apply(&self, ri: *mut T, ii: *mut T, ro: *mut T, io: *mut T);

    /// Releases the resources owned by this plan. Calling it more than once has no further effect.
    fn destroy(&mut self) {}

    /// A short human-readable identifier for diagnostics
    fn print(&self) -> String;

    /// Operation counts of a single application of this plan
    fn ops(&self) -> OpCount {
        OpCount::zero()
    }

    /// If this plan computes a single transform over a contiguous interleaved buffer, returns the buffer length.
    /// Returns `None` for strided or batched plans.
    fn contiguous_len(&self) -> Option<usize>;

    /// Computes the transform in-place on `buffer`, using the pointer layout for `direction`.
    ///
    /// Plans that infer the direction from the pointer layout will compute a `direction` transform.
    /// Plans that record a direction at construction time panic if `direction` doesn't match it.
    fn process_inplace(&self, buffer: &mut [Complex<T>], direction: FftDirection) {
        match self.contiguous_len() {
            Some(len) if len == buffer.len() => {}
            Some(len) => fft_error_inplace(len, buffer.len()),
            None => fft_error_layout(&self.print()),
        }

        let (ri, ii) = interleaved_pointers(buffer, direction);
        unsafe { self.apply(ri, ii, ri, ii) }
    }
}
