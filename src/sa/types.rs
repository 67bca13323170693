//! Core trait for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The implementor supplies neighbor generation and cost evaluation.
/// The runner handles temperature, acceptance and cooling.
///
/// SA minimizes the cost function. For maximization, negate the cost.
///
/// # Examples
///
/// ```ignore
/// struct TourProblem { distances: Vec<Vec<f64>> }
///
/// impl SaProblem for TourProblem {
///     type Solution = Vec<usize>;
///
///     fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
///         let mut tour: Vec<usize> = (0..self.distances.len()).collect();
///         u_supplynet::random::shuffle(&mut tour, rng);
///         tour
///     }
///
///     fn cost(&self, tour: &Vec<usize>) -> f64 {
///         tour.windows(2).map(|w| self.distances[w[0]][w[1]]).sum()
///     }
///
///     fn neighbor<R: Rng>(&self, tour: &Vec<usize>, rng: &mut R) -> Vec<usize> {
///         let mut next = tour.clone();
///         let i = rng.random_range(0..next.len());
///         let j = rng.random_range(0..next.len());
///         next.swap(i, j);
///         next
///     }
/// }
/// ```
pub trait SaProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// Creates the starting solution.
    ///
    /// Problems seeded from existing data (a current route plan, observed
    /// volumes) may ignore `rng` and return that data.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates a neighbor of the current solution.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;
}
