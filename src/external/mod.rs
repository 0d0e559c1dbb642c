//! The external FFT routine that [`DelegateSolver`](crate::algorithm::DelegateSolver) hands work to.
//!
//! The routine is modelled as a capability: `init` acquires a context sized for one transform length
//! and direction, `permute` and `compute` run the two halves of the transform on an aligned buffer,
//! and `end` releases the context. Plans never hold a bare context. They hold a [`ContextHandle`],
//! which calls `end` exactly once no matter how the plan is torn down.

use std::marker::PhantomData;
use std::sync::Arc;

use num_complex::Complex;
use thiserror::Error;

use crate::FftNum;

mod aligned;
mod radix2;

pub use self::aligned::AlignedBuffer;
pub use self::radix2::{Radix2Backend, Radix2Context};

/// Errors reported by an external routine when it can't create a context
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("unsupported transform size 2^{log2_len}, the routine accepts 2^{min_log2} through 2^{max_log2}")]
    UnsupportedSize {
        log2_len: u32,
        min_log2: u32,
        max_log2: u32,
    },
    #[error("external routine failed to create a context: {0}")]
    InitFailed(String),
}

/// A fixed radix-2 FFT routine operating in place on interleaved complex buffers.
///
/// The routine computes unnormalized transforms. A forward transform uses `exp(-2*pi*i*jk/n)`, an inverse
/// transform uses `exp(+2*pi*i*jk/n)`.
pub trait ExternalFft<T: FftNum>: Send + Sync {
    /// An initialized transform of one size and direction
    type Context: Send + Sync;

    /// Smallest supported transform, as a power of two
    const MIN_LOG2: u32;
    /// Largest supported transform, as a power of two
    const MAX_LOG2: u32;
    /// Byte boundary every buffer passed to `permute` and `compute` must start on
    const ALIGNMENT: usize;

    /// Prepares a transform of length `2^log2_len`. `inverse` selects the inverse direction.
    fn init(&self, log2_len: u32, inverse: bool) -> Result<Self::Context, BackendError>;

    /// Reorders `buffer` into the order `compute` expects. `buffer.len()` must be the context's length.
    fn permute(&self, context: &Self::Context, buffer: &mut [Complex<T>]);

    /// Computes the transform of a permuted buffer, in place
    fn compute(&self, context: &Self::Context, buffer: &mut [Complex<T>]);

    /// Releases a context
    fn end(&self, context: Self::Context);
}

/// Owns one context of an external routine, and releases it exactly once.
///
/// The context is released by [`release`](ContextHandle::release) or on drop, whichever comes first.
pub struct ContextHandle<T: FftNum, B: ExternalFft<T>> {
    backend: Arc<B>,
    context: Option<B::Context>,
    _phantom: PhantomData<fn(T)>,
}

impl<T: FftNum, B: ExternalFft<T>> ContextHandle<T, B> {
    /// Acquires a context from `backend`
    pub fn init(backend: Arc<B>, log2_len: u32, inverse: bool) -> Result<Self, BackendError> {
        let context = backend.init(log2_len, inverse)?;
        Ok(Self {
            backend,
            context: Some(context),
            _phantom: PhantomData,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The live context, or `None` if it has been released
    pub fn get(&self) -> Option<&B::Context> {
        self.context.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.context.is_none()
    }

    /// Releases the context. Does nothing if it has already been released.
    pub fn release(&mut self) {
        if let Some(context) = self.context.take() {
            self.backend.end(context);
        }
    }
}

impl<T: FftNum, B: ExternalFft<T>> Drop for ContextHandle<T, B> {
    fn drop(&mut self) {
        self.release();
    }
}
