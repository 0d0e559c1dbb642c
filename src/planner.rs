use log::{debug, trace};
use thiserror::Error;

use crate::algorithm::register_dft;
use crate::rdft::hc2c::{Hc2cGenus, RdftKind, HC2CB_GENUS, HC2CF_GENUS};
use crate::{DftProblem, FftNum, Plan, Solver};

/// Errors returned when registering something into a [`Planner`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a solver named `{0}` is already registered")]
    DuplicateSolver(&'static str),
    #[error("a {0} hc2c genus is already registered")]
    DuplicateGenus(RdftKind),
}

/// The planner is responsible for choosing a solver for a given problem and building its plan.
///
/// Solvers are tried in registration order, and the first one whose `applicable` check passes and whose
/// `mkplan` succeeds wins. There is no cost model: registering a fast, picky solver before a slow, general one
/// is how the planner prefers the fast one.
///
/// ~~~
/// // Build a plan for an in-place transform of length 1234, and run it
/// use fftsolve::{DftProblem, FftDirection, Planner};
/// use fftsolve::num_complex::Complex;
///
/// let planner = Planner::<f64>::with_defaults();
///
/// let mut buffer = vec![Complex{ re: 0.0f64, im: 0.0f64 }; 1234];
/// let problem = DftProblem::inplace_interleaved(&mut buffer, FftDirection::Forward);
/// let plan = planner.plan(&problem).unwrap();
/// plan.process_inplace(&mut buffer, FftDirection::Forward);
/// ~~~
///
/// A planner is only mutated while it's being populated. Afterwards it can be shared between threads
/// and used to plan concurrently.
pub struct Planner<T: FftNum> {
    solvers: Vec<Box<dyn Solver<T>>>,
    genera: Vec<&'static Hc2cGenus>,
}

impl<T: FftNum> Planner<T> {
    /// Creates a planner with nothing registered
    pub fn new() -> Self {
        Self {
            solvers: Vec::new(),
            genera: Vec::new(),
        }
    }

    /// Creates a planner with the built-in solvers and genera registered.
    ///
    /// With the `delegate` feature enabled (the default), the delegate solver backed by the
    /// [`Radix2Backend`](crate::external::Radix2Backend) is registered first, followed by the naive DFT
    /// solver as the fallback.
    pub fn with_defaults() -> Self {
        let mut planner = Self::new();

        #[cfg(feature = "delegate")]
        {
            if let Err(err) = crate::algorithm::register_delegate(
                &mut planner,
                std::sync::Arc::new(crate::external::Radix2Backend),
            ) {
                debug!("skipping default delegate solver: {}", err);
            }
        }

        if let Err(err) = register_dft(&mut planner) {
            debug!("skipping default dft solver: {}", err);
        }
        for genus in [&HC2CF_GENUS, &HC2CB_GENUS] {
            if let Err(err) = planner.register_hc2c_genus(genus) {
                debug!("skipping default genus: {}", err);
            }
        }

        planner
    }

    /// Adds `solver` to the end of the list of solvers. Fails if a solver with the same name is already registered.
    pub fn register_solver(&mut self, solver: Box<dyn Solver<T>>) -> Result<(), RegistryError> {
        let name = solver.name();
        if self.solvers.iter().any(|existing| existing.name() == name) {
            return Err(RegistryError::DuplicateSolver(name));
        }

        debug!("registered solver {}", name);
        self.solvers.push(solver);
        Ok(())
    }

    /// Makes a genus descriptor available to kernels of its kind. Fails if a genus of the same kind is already registered.
    pub fn register_hc2c_genus(&mut self, genus: &'static Hc2cGenus) -> Result<(), RegistryError> {
        if self.hc2c_genus(genus.kind()).is_some() {
            return Err(RegistryError::DuplicateGenus(genus.kind()));
        }

        debug!("registered {} hc2c genus", genus.kind());
        self.genera.push(genus);
        Ok(())
    }

    /// Returns the registered genus of the given kind, if there is one
    pub fn hc2c_genus(&self, kind: RdftKind) -> Option<&'static Hc2cGenus> {
        self.genera.iter().copied().find(|genus| genus.kind() == kind)
    }

    /// Returns the names of the registered solvers, in the order they're tried
    pub fn solver_names(&self) -> Vec<&'static str> {
        self.solvers.iter().map(|solver| solver.name()).collect()
    }

    /// Returns a plan for `problem` from the first solver that can build one, or `None` if no solver can.
    pub fn plan(&self, problem: &DftProblem<T>) -> Option<Box<dyn Plan<T>>> {
        for solver in &self.solvers {
            if !solver.applicable(problem) {
                trace!("{} not applicable", solver.name());
                continue;
            }
            match solver.mkplan(problem) {
                Some(plan) => {
                    debug!("planned {} with {}", plan.print(), solver.name());
                    return Some(plan);
                }
                None => debug!("{} was applicable but failed to build a plan", solver.name()),
            }
        }

        debug!("no solver could plan the problem");
        None
    }
}

impl<T: FftNum> Default for Planner<T> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
