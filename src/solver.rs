use crate::{DftProblem, FftNum, Plan};

/// A planner-pluggable strategy that can build plans for some class of problems.
pub trait Solver<T: FftNum>: Send + Sync {
    /// The name this solver registers under. Names are unique within a planner.
    fn name(&self) -> &'static str;

    /// Returns true if this solver can build a plan for `problem`.
    /// A `false` is a normal negative answer, and the planner moves on to the next solver.
    fn applicable(&self, problem: &DftProblem<T>) -> bool;

    /// Builds a plan for `problem`, or returns `None` if the problem isn't applicable or plan construction failed
    fn mkplan(&self, problem: &DftProblem<T>) -> Option<Box<dyn Plan<T>>>;
}
