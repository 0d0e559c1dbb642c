use num_complex::Complex;
use num_traits::Zero;

use crate::problem::IoDim;
use crate::twiddles;
use crate::{DftProblem, FftDirection, FftNum, Length, Plan, Planner, RegistryError, Solver};

const SOLVER_NAME: &str = "dft-direct";

/// Naive O(n^2) Discrete Fourier Transform solver.
///
/// Accepts any non-empty 1-D problem, with arbitrary strides, in place or out of place, and with at most one
/// loop of independent transforms. It always computes a forward DFT of the data as addressed by its
/// pointers, so an inverse transform is requested the usual way, by swapping the real and imaginary
/// pointers.
///
/// This implementation is primarily used as the planner's fallback, and to test other solvers.
///
/// ~~~
/// use fftsolve::algorithm::DftSolver;
/// use fftsolve::num_complex::Complex;
/// use fftsolve::{DftProblem, FftDirection, Plan, Solver};
///
/// let mut buffer = vec![Complex { re: 0.0f32, im: 0.0f32 }; 7];
/// let problem = DftProblem::inplace_interleaved(&mut buffer, FftDirection::Forward);
///
/// let plan = DftSolver::new().mkplan(&problem).unwrap();
/// plan.process_inplace(&mut buffer, FftDirection::Forward);
/// ~~~
#[derive(Copy, Clone, Debug, Default)]
pub struct DftSolver;

impl DftSolver {
    pub fn new() -> Self {
        Self
    }

    /// Builds a plan with the concrete plan type
    pub fn make_plan<T: FftNum>(&self, problem: &DftProblem<T>) -> Option<DftPlan<T>> {
        if !self.applicable_to(problem) {
            return None;
        }

        let dim = problem.sz.dims()[0];
        let howmany = problem
            .vecsz
            .dims()
            .first()
            .copied()
            .unwrap_or_else(|| IoDim::new(1, 0, 0));

        Some(DftPlan {
            twiddles: twiddles::generate_twiddle_factors(dim.n, FftDirection::Forward),
            dim,
            howmany,
        })
    }

    fn applicable_to<T: FftNum>(&self, problem: &DftProblem<T>) -> bool {
        problem.sz.rank() == 1
            && problem.vecsz.rank() <= 1
            && problem.sz.dims()[0].n > 0
            && !problem.has_null_pointer()
    }
}

impl<T: FftNum> Solver<T> for DftSolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    fn applicable(&self, problem: &DftProblem<T>) -> bool {
        self.applicable_to(problem)
    }

    fn mkplan(&self, problem: &DftProblem<T>) -> Option<Box<dyn Plan<T>>> {
        self.make_plan(problem)
            .map(|plan| Box::new(plan) as Box<dyn Plan<T>>)
    }
}

/// Registers a [`DftSolver`] into `planner`
pub fn register_dft<T: FftNum>(planner: &mut Planner<T>) -> Result<(), RegistryError> {
    planner.register_solver(Box::new(DftSolver::new()))
}

/// A plan computing a naive DFT for every transform of a problem
pub struct DftPlan<T> {
    twiddles: Box<[Complex<T>]>,
    dim: IoDim,
    howmany: IoDim,
}

impl<T: FftNum> DftPlan<T> {
    // Computes one transform. The input is gathered before anything is written, so in-place is fine.
    unsafe fn perform_dft(&self, ri: *const T, ii: *const T, ro: *mut T, io: *mut T) {
        let input: Vec<Complex<T>> = (0..self.dim.n)
            .map(|i| {
                let offset = i as isize * self.dim.is;
                Complex::new(*ri.offset(offset), *ii.offset(offset))
            })
            .collect();

        for k in 0..self.dim.n {
            let mut output_value = Complex::zero();
            let mut twiddle_index = 0;
            for input_cell in input.iter() {
                let twiddle = self.twiddles[twiddle_index];
                output_value = output_value + twiddle * *input_cell;

                twiddle_index += k;
                if twiddle_index >= self.twiddles.len() {
                    twiddle_index -= self.twiddles.len();
                }
            }

            let offset = k as isize * self.dim.os;
            *ro.offset(offset) = output_value.re;
            *io.offset(offset) = output_value.im;
        }
    }
}

impl<T: FftNum> Plan<T> for DftPlan<T> {
    unsafe fn apply(&self, ri: *mut T, ii: *mut T, ro: *mut T, io: *mut T) {
        for v in 0..self.howmany.n as isize {
            let input_offset = v * self.howmany.is;
            let output_offset = v * self.howmany.os;
            self.perform_dft(
                ri.offset(input_offset),
                ii.offset(input_offset),
                ro.offset(output_offset),
                io.offset(output_offset),
            );
        }
    }

    fn print(&self) -> String {
        if self.howmany.n == 1 {
            format!("({}-{})", SOLVER_NAME, self.dim.n)
        } else {
            format!("({}-{}-x{})", SOLVER_NAME, self.dim.n, self.howmany.n)
        }
    }

    fn contiguous_len(&self) -> Option<usize> {
        if self.dim.is == 2 && self.dim.os == 2 && self.howmany.n == 1 {
            Some(self.dim.n)
        } else {
            None
        }
    }
}
impl<T> Length for DftPlan<T> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.dim.n
    }
}
