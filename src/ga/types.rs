//! Core trait definitions for the GA framework.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Lower fitness is better. For maximization problems, negate.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// A value worse than any real fitness, for unevaluated individuals.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and history.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution in the GA population.
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    fn fitness(&self) -> Self::Fitness;

    /// Called by the runner after evaluation.
    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Defines a GA optimization problem.
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel (feature `parallel`).
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Creates a random individual for the initial population.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual. Lower is better.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Produces one or two offspring from two parents.
    ///
    /// The default clones `parent1`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Mutates an individual in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}
}
