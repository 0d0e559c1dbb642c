use crate::{common::FftNum, FftDirection};
use num_complex::Complex;

/// Computes `exp(-2*pi*i*index/fft_len)` for forward FFTs, and its conjugate for inverse FFTs
pub fn compute_twiddle<T: FftNum>(
    index: usize,
    fft_len: usize,
    direction: FftDirection,
) -> Complex<T> {
    let constant = -2f64 * std::f64::consts::PI / fft_len as f64;
    let angle = constant * index as f64;

    let result = Complex {
        re: T::from_f64(angle.cos()).unwrap_or_else(T::zero),
        im: T::from_f64(angle.sin()).unwrap_or_else(T::zero),
    };

    match direction {
        FftDirection::Forward => result,
        FftDirection::Inverse => result.conj(),
    }
}

pub fn generate_twiddle_factors<T: FftNum>(
    fft_len: usize,
    direction: FftDirection,
) -> Box<[Complex<T>]> {
    (0..fft_len)
        .map(|i| compute_twiddle(i, fft_len, direction))
        .collect()
}
