//! Individual FFT solvers, and the plans they build.
//!
//! Most users will reach these through a [`Planner`](crate::Planner), but each solver can also be used
//! directly, and each exposes a `make_plan` method returning its concrete plan type.

mod delegate;
mod dft;

pub use self::delegate::{register_delegate, DelegatePlan, DelegateSolver};
pub use self::dft::{register_dft, DftPlan, DftSolver};
