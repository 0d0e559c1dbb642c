use num_complex::Complex;

use super::{BackendError, ExternalFft};
use crate::common::fft_error_inplace;
use crate::{twiddles, FftDirection, FftNum};

/// A pure Rust fixed radix-2 routine with the same contract as a SIMD-backed external FFT:
/// sizes `2^4` through `2^16`, buffers aligned to 16 bytes, a separate bit-reversal step,
/// unnormalized output.
///
/// ~~~
/// // Computes a forward FFT of size 64
/// use fftsolve::external::{AlignedBuffer, ExternalFft, Radix2Backend};
///
/// let mut buffer = AlignedBuffer::<f32>::zeroed(64, 16);
/// buffer[1].re = 1.0;
///
/// let context = ExternalFft::<f32>::init(&Radix2Backend, 6, false).unwrap();
/// ExternalFft::<f32>::permute(&Radix2Backend, &context, &mut buffer);
/// ExternalFft::<f32>::compute(&Radix2Backend, &context, &mut buffer);
/// ExternalFft::<f32>::end(&Radix2Backend, context);
/// ~~~
#[derive(Copy, Clone, Debug, Default)]
pub struct Radix2Backend;

/// Precomputed state for one radix-2 transform
pub struct Radix2Context<T> {
    twiddles: Box<[Complex<T>]>,
    len: usize,
    direction: FftDirection,
}

impl<T> Radix2Context<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn direction(&self) -> FftDirection {
        self.direction
    }
}

impl<T: FftNum> ExternalFft<T> for Radix2Backend {
    type Context = Radix2Context<T>;

    const MIN_LOG2: u32 = 4;
    const MAX_LOG2: u32 = 16;
    const ALIGNMENT: usize = 16;

    fn init(&self, log2_len: u32, inverse: bool) -> Result<Self::Context, BackendError> {
        let min_log2 = <Self as ExternalFft<T>>::MIN_LOG2;
        let max_log2 = <Self as ExternalFft<T>>::MAX_LOG2;
        if log2_len < min_log2 || log2_len > max_log2 {
            return Err(BackendError::UnsupportedSize {
                log2_len,
                min_log2,
                max_log2,
            });
        }

        let len = 1 << log2_len;
        let direction = if inverse {
            FftDirection::Inverse
        } else {
            FftDirection::Forward
        };

        // Every layer uses a strided subset of the twiddles of the full-size transform, so only the first half is needed
        let twiddles = (0..len / 2)
            .map(|i| twiddles::compute_twiddle(i, len, direction))
            .collect();

        Ok(Radix2Context {
            twiddles,
            len,
            direction,
        })
    }

    fn permute(&self, context: &Self::Context, buffer: &mut [Complex<T>]) {
        if buffer.len() != context.len {
            fft_error_inplace(context.len, buffer.len());
        }
        bit_reverse_permute(buffer);
    }

    fn compute(&self, context: &Self::Context, buffer: &mut [Complex<T>]) {
        if buffer.len() != context.len {
            fft_error_inplace(context.len, buffer.len());
        }

        let mut half_len = 1;
        let mut twiddle_stride = context.len / 2;
        while half_len < context.len {
            for chunk in buffer.chunks_exact_mut(half_len * 2) {
                let (evens, odds) = chunk.split_at_mut(half_len);
                for (k, (even, odd)) in evens.iter_mut().zip(odds.iter_mut()).enumerate() {
                    let twiddled = *odd * context.twiddles[k * twiddle_stride];
                    *odd = *even - twiddled;
                    *even = *even + twiddled;
                }
            }

            half_len *= 2;
            twiddle_stride /= 2;
        }
    }

    fn end(&self, context: Self::Context) {
        drop(context);
    }
}

fn bit_reverse_permute<T: Copy>(buffer: &mut [T]) {
    let len = buffer.len();
    if len <= 2 {
        return;
    }

    let shift = usize::BITS - len.trailing_zeros();
    for i in 0..len {
        let reversed = i.reverse_bits() >> shift;
        if reversed > i {
            buffer.swap(i, reversed);
        }
    }
}
