use num_complex::Complex;
use num_traits::Zero;

use rand::distributions::{Distribution, Uniform};
use rand::{rngs::StdRng, SeedableRng};

use crate::algorithm::DftSolver;
use crate::{DftProblem, FftDirection, FftNum, Plan};

/// The seed for the random number generator used to generate
/// random signals. It's defined here so that we have deterministic
/// tests
const RNG_SEED: u64 = 1910_11431_4984;

pub fn random_signal<T: FftNum>(length: usize) -> Vec<Complex<T>> {
    let mut sig = Vec::with_capacity(length);
    let dist: Uniform<f64> = Uniform::new(-10.0, 10.0);
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    for _ in 0..length {
        sig.push(Complex {
            re: T::from_f64(dist.sample(&mut rng)).unwrap(),
            im: T::from_f64(dist.sample(&mut rng)).unwrap(),
        });
    }
    sig
}

pub fn compare_vectors<T: FftNum + Into<f64>>(vec1: &[Complex<T>], vec2: &[Complex<T>]) -> bool {
    assert_eq!(vec1.len(), vec2.len());
    let mut error = 0f64;
    for (&a, &b) in vec1.iter().zip(vec2.iter()) {
        let diff = a - b;
        let re: f64 = diff.re.into();
        let im: f64 = diff.im.into();
        error += (re * re + im * im).sqrt();
    }
    (error / vec1.len() as f64) < 0.1
}

/// Computes the reference transform of `input` with the naive DFT solver, out of place
pub fn reference_dft<T: FftNum>(input: &[Complex<T>], direction: FftDirection) -> Vec<Complex<T>> {
    let mut scratch_input = input.to_vec();
    let mut output = vec![Complex::zero(); input.len()];
    let problem = DftProblem::outofplace_interleaved(&mut scratch_input, &mut output, direction);

    let plan = DftSolver::new().make_plan(&problem).unwrap();
    unsafe { plan.apply(problem.ri, problem.ii, problem.ro, problem.io) };
    output
}
