use num_integer::Integer;
use num_traits::{FromPrimitive, Signed};
use std::fmt::Debug;

use crate::FftDirection;

/// Generic floating point number, implemented for f32 and f64
pub trait FftNum: Copy + FromPrimitive + Signed + Sync + Send + Debug + 'static {}

impl<T> FftNum for T where T: Copy + FromPrimitive + Signed + Sync + Send + Debug + 'static {}

/// Returns `Some(k)` if `len == 2^k`, `None` otherwise
#[inline]
pub fn exact_log2(len: usize) -> Option<u32> {
    if len.is_power_of_two() {
        Some(len.trailing_zeros())
    } else {
        None
    }
}

/// Returns true if the address of `ptr` is a multiple of `alignment` bytes
#[inline]
pub fn is_aligned<T>(ptr: *const T, alignment: usize) -> bool {
    alignment == 0 || Integer::is_multiple_of(&(ptr as usize), &alignment)
}

// Prints an error raised by an in-place FFT call
// This is marked cold and inline(never) so the calling code stays small on the happy path
#[cold]
#[inline(never)]
pub fn fft_error_inplace(expected_len: usize, actual_len: usize) -> ! {
    panic!(
        "Provided FFT buffer was the wrong length. Expected len = {}, got len = {}",
        expected_len, actual_len
    );
}

#[cold]
#[inline(never)]
pub fn fft_error_layout(name: &str) -> ! {
    panic!(
        "{} plan was built for a strided or batched layout and can't process a contiguous interleaved buffer",
        name
    );
}

// Raised when the pointers handed to a plan at execution time don't encode the direction the plan was built for.
// Plans built from one pointer layout can't be reused with a different one, so this is a caller contract violation.
#[cold]
#[inline(never)]
pub fn fft_error_direction(planned: FftDirection, found: Option<FftDirection>) -> ! {
    match found {
        Some(found) => panic!(
            "Pointer layout encodes a {} FFT, but this plan was built for a {} FFT",
            found, planned
        ),
        None => panic!(
            "Pointer layout doesn't encode a FFT direction: expected ii == ri + 1 or ri == ii + 1 for a {} FFT",
            planned
        ),
    }
}

// Raised when a buffer handed to a plan at execution time doesn't start on the boundary its external routine requires
#[cold]
#[inline(never)]
pub fn fft_error_alignment(alignment: usize, address: usize) -> ! {
    panic!(
        "Provided FFT buffer is not aligned. Expected a multiple of {} bytes, got address {:#x}",
        alignment, address
    );
}

#[cold]
#[inline(never)]
pub fn fft_error_destroyed(name: &str) -> ! {
    panic!("Attempted to execute a {} plan after it was destroyed", name);
}
