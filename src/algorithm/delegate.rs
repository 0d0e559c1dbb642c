use std::marker::PhantomData;
use std::sync::Arc;

use log::{debug, trace};
use num_complex::Complex;

use crate::common::{
    exact_log2, fft_error_alignment, fft_error_destroyed, fft_error_direction, is_aligned,
};
use crate::external::{ContextHandle, ExternalFft};
use crate::problem::layout_direction;
use crate::{
    Direction, DftProblem, FftDirection, FftNum, Length, OpCount, Plan, Planner, RegistryError,
    Solver,
};

const SOLVER_NAME: &str = "dft-delegate";

/// The stride, in scalars, between consecutive elements of an interleaved complex buffer
const INTERLEAVED_STRIDE: isize = 2;

/// Hands 1-D power-of-two transforms to an external FFT routine.
///
/// The routine only works in place, on a single contiguous interleaved buffer that starts on its
/// alignment boundary, and for sizes within its documented limits. Everything else is rejected by
/// [`applicable`](DelegateSolver::applicable), and the planner moves on to the next solver.
///
/// The transform direction is read from the pointer layout: `ii == ri + 1` is a forward transform,
/// `ri == ii + 1` is an inverse transform expressed by swapping the real and imaginary roles. In both
/// cases the routine receives the lower of the two pointers, which is the start of the interleaved
/// buffer, and that pointer must be aligned. Swapping the roles of an aligned forward layout shifts the
/// "real" pointer one scalar past the boundary, which is why the check looks at the lower pointer and
/// not at `ri`.
///
/// ~~~
/// use std::sync::Arc;
/// use fftsolve::algorithm::DelegateSolver;
/// use fftsolve::external::{AlignedBuffer, Radix2Backend};
/// use fftsolve::{DftProblem, FftDirection, Plan, Solver};
///
/// let mut buffer = AlignedBuffer::<f32>::zeroed(1024, 16);
/// let problem = DftProblem::inplace_interleaved(&mut buffer, FftDirection::Inverse);
///
/// let solver = DelegateSolver::new(Arc::new(Radix2Backend));
/// assert!(solver.applicable(&problem));
///
/// let plan = solver.mkplan(&problem).unwrap();
/// plan.process_inplace(&mut buffer, FftDirection::Inverse);
/// ~~~
pub struct DelegateSolver<T: FftNum, B: ExternalFft<T>> {
    backend: Arc<B>,
    _phantom: PhantomData<fn(T)>,
}

impl<T: FftNum, B: ExternalFft<T>> DelegateSolver<T, B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            _phantom: PhantomData,
        }
    }

    /// Returns true if the external routine can compute `problem`
    pub fn applicable(&self, problem: &DftProblem<T>) -> bool {
        self.check(problem).is_some()
    }

    /// Builds a plan with the concrete plan type, so that callers who need its direction or its
    /// context handle don't have to go through `dyn Plan`
    pub fn make_plan(&self, problem: &DftProblem<T>) -> Option<DelegatePlan<T, B>> {
        let (log2_len, direction) = self.check(problem)?;

        // Once init succeeds, the context is owned by the handle, so any early exit from here on releases it
        let context = match ContextHandle::init(
            Arc::clone(&self.backend),
            log2_len,
            direction.is_inverse(),
        ) {
            Ok(context) => context,
            Err(err) => {
                debug!("{}: external routine refused n = 2^{}: {}", SOLVER_NAME, log2_len, err);
                return None;
            }
        };

        debug!(
            "{}: planned n = {}, direction = {}",
            SOLVER_NAME,
            1usize << log2_len,
            direction
        );
        Some(DelegatePlan {
            context,
            len: 1 << log2_len,
            direction,
        })
    }

    // Returns the transform size exponent and direction if the problem passes every check
    fn check(&self, problem: &DftProblem<T>) -> Option<(u32, FftDirection)> {
        if problem.sz.rank() != 1 || problem.vecsz.rank() != 0 {
            trace!(
                "{}: rejected rank {} transform with vector rank {}",
                SOLVER_NAME,
                problem.sz.rank(),
                problem.vecsz.rank()
            );
            return None;
        }

        let dim = problem.sz.dims()[0];
        let log2_len = exact_log2(dim.n)
            .filter(|m| (B::MIN_LOG2..=B::MAX_LOG2).contains(m))
            .or_else(|| {
                trace!("{}: rejected size {}", SOLVER_NAME, dim.n);
                None
            })?;

        if dim.is != INTERLEAVED_STRIDE || dim.os != INTERLEAVED_STRIDE {
            trace!(
                "{}: rejected strides is = {}, os = {}",
                SOLVER_NAME,
                dim.is,
                dim.os
            );
            return None;
        }

        if !problem.is_inplace() || problem.has_null_pointer() {
            trace!("{}: rejected out-of-place or null pointers", SOLVER_NAME);
            return None;
        }

        let direction = aligned_direction(problem.ri, problem.ii, B::ALIGNMENT).or_else(|| {
            trace!(
                "{}: rejected pointer layout ri = {:p}, ii = {:p}",
                SOLVER_NAME,
                problem.ri,
                problem.ii
            );
            None
        })?;

        Some((log2_len, direction))
    }
}

/// Decodes the direction from the pointer layout, and checks that the buffer start is aligned
fn aligned_direction<T>(ri: *const T, ii: *const T, alignment: usize) -> Option<FftDirection> {
    let direction = layout_direction(ri, ii)?;
    let buffer_start = match direction {
        FftDirection::Forward => ri,
        FftDirection::Inverse => ii,
    };

    if is_aligned(buffer_start, alignment) {
        Some(direction)
    } else {
        None
    }
}

impl<T: FftNum, B: ExternalFft<T> + 'static> Solver<T> for DelegateSolver<T, B> {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    fn applicable(&self, problem: &DftProblem<T>) -> bool {
        DelegateSolver::applicable(self, problem)
    }

    fn mkplan(&self, problem: &DftProblem<T>) -> Option<Box<dyn Plan<T>>> {
        self.make_plan(problem)
            .map(|plan| Box::new(plan) as Box<dyn Plan<T>>)
    }
}

/// Registers a [`DelegateSolver`] backed by `backend` into `planner`
pub fn register_delegate<T: FftNum, B: ExternalFft<T> + 'static>(
    planner: &mut Planner<T>,
    backend: Arc<B>,
) -> Result<(), RegistryError> {
    planner.register_solver(Box::new(DelegateSolver::<T, B>::new(backend)))
}

/// A plan that runs one in-place transform through the external routine.
///
/// The plan owns its external context and records the direction it was built for. It doesn't keep the
/// pointers it was planned with: `apply` may be called on any buffer of the right length whose pointer
/// layout encodes the same direction, and whose start is aligned for the external routine.
pub struct DelegatePlan<T: FftNum, B: ExternalFft<T>> {
    context: ContextHandle<T, B>,
    len: usize,
    direction: FftDirection,
}

impl<T: FftNum, B: ExternalFft<T>> DelegatePlan<T, B> {
    /// Returns true once the external context has been released
    pub fn is_destroyed(&self) -> bool {
        self.context.is_released()
    }
}

impl<T: FftNum, B: ExternalFft<T>> Plan<T> for DelegatePlan<T, B> {
    unsafe fn apply(&self, ri: *mut T, ii: *mut T, _ro: *mut T, _io: *mut T) {
        // The output pointers are the input pointers, so only the input layout matters
        let found = layout_direction(ri, ii);
        if found != Some(self.direction) || ri.is_null() || ii.is_null() {
            fft_error_direction(self.direction, found);
        }

        let context = match self.context.get() {
            Some(context) => context,
            None => fft_error_destroyed(SOLVER_NAME),
        };

        let buffer_start = match self.direction {
            FftDirection::Forward => ri,
            FftDirection::Inverse => ii,
        };
        if !is_aligned(buffer_start, B::ALIGNMENT) {
            fft_error_alignment(B::ALIGNMENT, buffer_start as usize);
        }
        let buffer = std::slice::from_raw_parts_mut(buffer_start as *mut Complex<T>, self.len);

        let backend = self.context.backend();
        backend.permute(context, buffer);
        backend.compute(context, buffer);
    }

    fn destroy(&mut self) {
        self.context.release();
    }

    fn print(&self) -> String {
        format!("({}-{})", SOLVER_NAME, self.len)
    }

    fn ops(&self) -> OpCount {
        // The external routine doesn't report its operation counts
        OpCount::zero()
    }

    fn contiguous_len(&self) -> Option<usize> {
        Some(self.len)
    }
}
impl<T: FftNum, B: ExternalFft<T>> Length for DelegatePlan<T, B> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }
}
impl<T: FftNum, B: ExternalFft<T>> Direction for DelegatePlan<T, B> {
    #[inline(always)]
    fn fft_direction(&self) -> FftDirection {
        self.direction
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::external::counting::CountingBackend;
    use crate::external::{AlignedBuffer, Radix2Backend};
    use crate::problem::{IoDim, Tensor};
    use crate::test_utils::{compare_vectors, random_signal, reference_dft};
    use num_traits::Zero;
    use paste::paste;

    const ALIGN: usize = 16;

    fn radix2_solver<T: FftNum>() -> DelegateSolver<T, Radix2Backend> {
        DelegateSolver::new(Arc::new(Radix2Backend))
    }

    fn check_delegate_with_length<T: FftNum + Into<f64>>(len: usize, direction: FftDirection) {
        let signal = random_signal::<T>(len);
        let expected = reference_dft(&signal, direction);

        let mut buffer = AlignedBuffer::from_slice(&signal, ALIGN);
        let problem = DftProblem::inplace_interleaved(&mut buffer, direction);

        let solver = radix2_solver::<T>();
        assert!(solver.applicable(&problem), "len = {}", len);

        let plan = solver.make_plan(&problem).unwrap();
        assert_eq!(plan.len(), len);
        assert_eq!(plan.fft_direction(), direction);

        plan.process_inplace(&mut buffer, direction);
        assert!(
            compare_vectors(&expected, &buffer),
            "len = {}, direction = {}",
            len,
            direction
        );
    }

    macro_rules! test_delegate_lengths {
        ($($log2_len:literal),*) => {
            paste! {
                $(
                    #[test]
                    fn [<test_delegate_matches_dft_ $log2_len>]() {
                        let len = 1usize << $log2_len;
                        check_delegate_with_length::<f32>(len, FftDirection::Forward);
                        check_delegate_with_length::<f32>(len, FftDirection::Inverse);
                        check_delegate_with_length::<f64>(len, FftDirection::Forward);
                        check_delegate_with_length::<f64>(len, FftDirection::Inverse);
                    }
                )*
            }
        }
    }
    test_delegate_lengths!(4, 5, 6, 7, 8, 9, 10);

    #[test]
    fn test_roundtrip_scales_by_len() {
        for log2_len in 4..=12 {
            let len = 1usize << log2_len;
            let signal = random_signal::<f64>(len);
            let mut buffer = AlignedBuffer::from_slice(&signal, ALIGN);

            let solver = radix2_solver::<f64>();
            let forward = solver
                .make_plan(&DftProblem::inplace_interleaved(&mut buffer, FftDirection::Forward))
                .unwrap();
            let inverse = solver
                .make_plan(&DftProblem::inplace_interleaved(&mut buffer, FftDirection::Inverse))
                .unwrap();

            forward.process_inplace(&mut buffer, FftDirection::Forward);
            inverse.process_inplace(&mut buffer, FftDirection::Inverse);

            let scale = 1.0 / len as f64;
            let recovered: Vec<Complex<f64>> = buffer.iter().map(|&c| c * scale).collect();
            assert!(compare_vectors(&signal, &recovered), "len = {}", len);
        }
    }

    #[test]
    fn test_size_limits() {
        let solver = radix2_solver::<f32>();
        for len in [1, 2, 4, 8, 12, 24, 100, 1 << 17, 3 << 10] {
            let mut buffer = AlignedBuffer::<f32>::zeroed(len, ALIGN);
            let problem = DftProblem::inplace_interleaved(&mut buffer, FftDirection::Forward);
            assert!(!solver.applicable(&problem), "len = {}", len);
            assert!(solver.make_plan(&problem).is_none(), "len = {}", len);
        }
        for log2_len in [4, 16] {
            let mut buffer = AlignedBuffer::<f32>::zeroed(1 << log2_len, ALIGN);
            let problem = DftProblem::inplace_interleaved(&mut buffer, FftDirection::Forward);
            assert!(solver.applicable(&problem), "log2_len = {}", log2_len);
        }
    }

    #[test]
    fn test_rejects_vector_and_rank() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(64, ALIGN);
        let problem = DftProblem::inplace_interleaved(&mut buffer[..32], FftDirection::Forward);
        assert!(solver.applicable(&problem));

        let mut batched = problem.clone();
        batched.vecsz = Tensor::rank1(IoDim::new(2, 64, 64));
        assert!(!solver.applicable(&batched));

        let mut rank2 = problem.clone();
        rank2.sz = Tensor::from_dims(vec![IoDim::new(16, 2, 2), IoDim::new(2, 32, 32)]);
        assert!(!solver.applicable(&rank2));

        let mut rank0 = problem;
        rank0.sz = Tensor::empty();
        assert!(!solver.applicable(&rank0));
    }

    #[test]
    fn test_rejects_strides() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(64, ALIGN);
        let problem = DftProblem::inplace_interleaved(&mut buffer[..32], FftDirection::Forward);

        for (is, os) in [(4, 2), (2, 4), (1, 1), (-2, -2)] {
            let mut strided = problem.clone();
            strided.sz = Tensor::rank1(IoDim::new(32, is, os));
            assert!(!solver.applicable(&strided), "is = {}, os = {}", is, os);
        }
    }

    #[test]
    fn test_rejects_outofplace_and_null() {
        let solver = radix2_solver::<f64>();
        let mut input = AlignedBuffer::<f64>::zeroed(32, ALIGN);
        let mut output = AlignedBuffer::<f64>::zeroed(32, ALIGN);
        let problem =
            DftProblem::outofplace_interleaved(&mut input, &mut output, FftDirection::Forward);
        assert!(!solver.applicable(&problem));

        let mut problem = DftProblem::inplace_interleaved(&mut input, FftDirection::Forward);
        problem.ri = std::ptr::null_mut();
        problem.ro = std::ptr::null_mut();
        assert!(!solver.applicable(&problem));
    }

    #[test]
    fn test_rejects_non_adjacent_pointers() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(64, ALIGN);
        let base = buffer.as_mut_ptr() as *mut f32;

        // split-format layout: all real parts, then all imaginary parts
        let ri = base;
        let ii = base.wrapping_add(32);
        let problem = DftProblem::new(
            Tensor::rank1(IoDim::new(32, 2, 2)),
            Tensor::empty(),
            ri,
            ii,
            ri,
            ii,
        );
        assert!(!solver.applicable(&problem));

        let same = DftProblem::new(
            Tensor::rank1(IoDim::new(32, 2, 2)),
            Tensor::empty(),
            base,
            base,
            base,
            base,
        );
        assert!(!solver.applicable(&same));
    }

    // An aligned interleaved buffer with its real/imaginary roles swapped the "wrong" way leaves the buffer start
    // one scalar past the boundary. The solver has to reject it instead of handing a misaligned buffer to the routine.
    #[test]
    fn test_rejects_misaligned_buffer_start() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(65, ALIGN);

        for direction in [FftDirection::Forward, FftDirection::Inverse] {
            // each Complex<f32> is 8 bytes, so starting one element in is 8 bytes off the 16 byte boundary
            let problem = DftProblem::inplace_interleaved(&mut buffer[1..], direction);
            assert_eq!(problem.layout_direction(), Some(direction));
            assert!(!solver.applicable(&problem), "direction = {}", direction);
            assert!(solver.make_plan(&problem).is_none());
        }

        // forward layout starting half an element in: ii == ri + 1 holds, but ri is 4 bytes off the boundary
        let base = buffer.as_mut_ptr() as *mut f32;
        let ri = base.wrapping_add(1);
        let ii = base.wrapping_add(2);
        let problem = DftProblem::new(
            Tensor::rank1(IoDim::new(64, 2, 2)),
            Tensor::empty(),
            ri,
            ii,
            ri,
            ii,
        );
        assert_eq!(problem.layout_direction(), Some(FftDirection::Forward));
        assert!(!solver.applicable(&problem));

        // the same pointers swapped: ri == ii + 1, so the buffer start is ii = base + 2, 8 bytes off
        let swapped = DftProblem::new(
            Tensor::rank1(IoDim::new(64, 2, 2)),
            Tensor::empty(),
            base.wrapping_add(3),
            base.wrapping_add(2),
            base.wrapping_add(3),
            base.wrapping_add(2),
        );
        assert_eq!(swapped.layout_direction(), Some(FftDirection::Inverse));
        assert!(!solver.applicable(&swapped));
    }

    #[test]
    fn test_apply_on_different_buffer() {
        let solver = radix2_solver::<f32>();
        let mut planning_buffer = AlignedBuffer::<f32>::zeroed(128, ALIGN);
        let plan = solver
            .make_plan(&DftProblem::inplace_interleaved(
                &mut planning_buffer,
                FftDirection::Forward,
            ))
            .unwrap();
        drop(planning_buffer);

        let signal = random_signal::<f32>(128);
        let expected = reference_dft(&signal, FftDirection::Forward);
        let mut buffer = AlignedBuffer::from_slice(&signal, ALIGN);
        let (ri, ii) = crate::problem::interleaved_pointers(&mut buffer, FftDirection::Forward);
        unsafe { plan.apply(ri, ii, std::ptr::null_mut(), std::ptr::null_mut()) };

        assert!(compare_vectors(&expected, &buffer));
    }

    #[test]
    #[should_panic(expected = "built for a Forward FFT")]
    fn test_apply_direction_mismatch() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(16, ALIGN);
        let plan = solver
            .make_plan(&DftProblem::inplace_interleaved(
                &mut buffer,
                FftDirection::Forward,
            ))
            .unwrap();
        plan.process_inplace(&mut buffer, plan.fft_direction().opposite_direction());
    }

    #[test]
    #[should_panic(expected = "not aligned")]
    fn test_apply_misaligned_buffer() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(65, ALIGN);
        let plan = solver
            .make_plan(&DftProblem::inplace_interleaved(
                &mut buffer[..64],
                FftDirection::Forward,
            ))
            .unwrap();

        // same length and direction as the plan, but 8 bytes past the boundary
        plan.process_inplace(&mut buffer[1..], FftDirection::Forward);
    }

    #[test]
    #[should_panic(expected = "not aligned")]
    fn test_apply_misaligned_buffer_inverse() {
        let solver = radix2_solver::<f64>();
        let mut buffer = AlignedBuffer::<f64>::zeroed(33, ALIGN);
        let plan = solver
            .make_plan(&DftProblem::inplace_interleaved(
                &mut buffer[..32],
                FftDirection::Inverse,
            ))
            .unwrap();

        // a Complex<f64> is 16 bytes, so use a raw layout half an element in: ii = base + 1, ri = base + 2
        let base = buffer.as_mut_ptr() as *mut f64;
        let ii = base.wrapping_add(1);
        let ri = base.wrapping_add(2);
        unsafe { plan.apply(ri, ii, ri, ii) };
    }

    #[test]
    #[should_panic(expected = "doesn't encode a FFT direction")]
    fn test_apply_without_direction() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(16, ALIGN);
        let plan = solver
            .make_plan(&DftProblem::inplace_interleaved(
                &mut buffer,
                FftDirection::Forward,
            ))
            .unwrap();
        let base = buffer.as_mut_ptr() as *mut f32;
        unsafe { plan.apply(base, base.wrapping_add(16), base, base.wrapping_add(16)) };
    }

    #[test]
    fn test_destroy_releases_once() {
        let backend = Arc::new(CountingBackend::new());
        let solver = DelegateSolver::<f32, _>::new(Arc::clone(&backend));

        let mut buffer = AlignedBuffer::<f32>::zeroed(32, ALIGN);
        let mut plan = solver
            .make_plan(&DftProblem::inplace_interleaved(
                &mut buffer,
                FftDirection::Forward,
            ))
            .unwrap();
        assert_eq!(backend.inits(), 1);
        assert!(!plan.is_destroyed());

        plan.destroy();
        plan.destroy();
        assert!(plan.is_destroyed());
        drop(plan);

        assert_eq!(backend.ends(), 1);
    }

    #[test]
    fn test_boxed_plan_releases_on_drop() {
        let backend = Arc::new(CountingBackend::new());
        let solver = DelegateSolver::<f64, _>::new(Arc::clone(&backend));

        let mut buffer = AlignedBuffer::<f64>::zeroed(256, ALIGN);
        let plan = solver
            .mkplan(&DftProblem::inplace_interleaved(
                &mut buffer,
                FftDirection::Inverse,
            ))
            .unwrap();
        assert_eq!(backend.ends(), 0);
        drop(plan);
        assert_eq!(backend.ends(), 1);
    }

    #[test]
    #[should_panic(expected = "after it was destroyed")]
    fn test_apply_after_destroy() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(16, ALIGN);
        let mut plan = solver
            .make_plan(&DftProblem::inplace_interleaved(
                &mut buffer,
                FftDirection::Forward,
            ))
            .unwrap();
        plan.destroy();
        plan.process_inplace(&mut buffer, FftDirection::Forward);
    }

    #[test]
    fn test_context_failure() {
        let backend = Arc::new(CountingBackend::failing());
        let solver = DelegateSolver::<f32, _>::new(Arc::clone(&backend));

        let mut buffer = AlignedBuffer::<f32>::zeroed(32, ALIGN);
        let problem = DftProblem::inplace_interleaved(&mut buffer, FftDirection::Forward);
        assert!(solver.applicable(&problem));
        assert!(solver.mkplan(&problem).is_none());
        assert_eq!(backend.ends(), 0);
    }

    #[test]
    fn test_print_and_ops() {
        let solver = radix2_solver::<f32>();
        let mut buffer = AlignedBuffer::<f32>::zeroed(4096, ALIGN);
        let plan = solver
            .mkplan(&DftProblem::inplace_interleaved(
                &mut buffer,
                FftDirection::Forward,
            ))
            .unwrap();
        assert_eq!(plan.print(), "(dft-delegate-4096)");
        assert!(plan.ops().is_zero());
        assert_eq!(solver.name(), "dft-delegate");
    }

    #[test]
    fn test_impulse() {
        // a unit impulse at index 0 transforms to all ones in both directions
        let solver = radix2_solver::<f32>();
        for direction in [FftDirection::Forward, FftDirection::Inverse] {
            let mut buffer = AlignedBuffer::<f32>::zeroed(16, ALIGN);
            buffer[0] = Complex::new(1.0, 0.0);
            let plan = solver
                .make_plan(&DftProblem::inplace_interleaved(&mut buffer, direction))
                .unwrap();
            plan.process_inplace(&mut buffer, direction);

            let ones = vec![Complex::new(1.0f32, 0.0); 16];
            assert!(compare_vectors(&ones, &buffer));
            assert!(buffer.iter().all(|c| !c.re.is_zero()));
        }
    }
}
