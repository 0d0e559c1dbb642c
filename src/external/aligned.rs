use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use num_complex::Complex;

use crate::FftNum;

/// A fixed-length buffer of complex values whose first element starts on a chosen byte boundary.
///
/// External routines usually require their buffers to come from an aligned allocator. This
/// derefs to `[Complex<T>]`, so it can be used almost anywhere a slice can.
pub struct AlignedBuffer<T> {
    ptr: NonNull<Complex<T>>,
    len: usize,
    layout: Layout,
}

impl<T: FftNum> AlignedBuffer<T> {
    /// Allocates `len` zeroed elements, starting on a multiple of `alignment` bytes.
    ///
    /// # Panics
    /// Panics if `alignment` isn't a power of two, or if the size overflows.
    pub fn zeroed(len: usize, alignment: usize) -> Self {
        let layout = match Layout::array::<Complex<T>>(len).and_then(|l| l.align_to(alignment)) {
            Ok(layout) => layout,
            Err(_) => panic!(
                "AlignedBuffer: invalid layout for {} elements aligned to {} bytes",
                len, alignment
            ),
        };

        let ptr = if layout.size() == 0 {
            // No allocation for an empty buffer, but the pointer still has to honor the alignment
            NonNull::new(layout.align() as *mut Complex<T>).unwrap_or_else(NonNull::dangling)
        } else {
            let raw = unsafe { alloc::alloc(layout) } as *mut Complex<T>;
            match NonNull::new(raw) {
                Some(ptr) => ptr,
                None => alloc::handle_alloc_error(layout),
            }
        };

        for i in 0..len {
            unsafe { ptr::write(ptr.as_ptr().add(i), Complex::new(T::zero(), T::zero())) };
        }

        Self { ptr, len, layout }
    }

    /// Allocates an aligned copy of `data`
    pub fn from_slice(data: &[Complex<T>], alignment: usize) -> Self {
        let mut buffer = Self::zeroed(data.len(), alignment);
        buffer.copy_from_slice(data);
        buffer
    }

    /// The byte boundary this buffer was allocated on
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }
}

impl<T> Deref for AlignedBuffer<T> {
    type Target = [Complex<T>];
    fn deref(&self) -> &[Complex<T>] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [Complex<T>] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        // Complex<T> is only ever instantiated with Copy scalars, so there's nothing to drop element-wise
        if self.layout.size() != 0 {
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout) }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

unsafe impl<T: Send> Send for AlignedBuffer<T> {}
unsafe impl<T: Sync> Sync for AlignedBuffer<T> {}
