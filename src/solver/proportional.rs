//! A proportional response solver for Eisenberg-Gale programs.
//!
//! Rather than a general interior-point method, this backend iterates in
//! *spending* space. Each agent splits their budget over the goods; prices
//! are whatever total spending lands on each good; each good is divided
//! among its spenders pro rata; and every agent then re-splits their budget
//! in proportion to the utility each good actually delivered. Fixed points
//! of that map are exactly the optimal primal/dual pairs of the program, so
//! at convergence the per-good spending totals *are* the constraint duals.
//!
//! Two invariants hold at every iterate and make the post-solve checks
//! sharp: each agent's spending sums exactly to their budget, and each
//! priced good's shares sum exactly to one.

use crate::{
    error::Result,
    matrix::Matrix,
    solver::{ConvexSolver, EgProgram, SolverSolution, SolverStatus},
};
use getset::CopyGetters;

/// Tuning knobs for a solve. Built via [`SolverOptions::builder`]; the
/// defaults are tight enough for the equilibrium checks downstream.
#[derive(Clone, Debug, PartialEq, CopyGetters, derive_builder::Builder)]
#[builder(pattern = "owned", setter(into))]
#[getset(get_copy = "pub")]
pub struct SolverOptions {
    /// Hard cap on iterations before the solve is declared non-convergent.
    /// This is the solve's only time bound.
    #[builder(default = "500_000")]
    max_iterations: usize,
    /// Convergence tolerance on the per-iteration change in spending,
    /// relative to the total budget in the market.
    #[builder(default = "1e-10")]
    tolerance: f64,
    /// Tolerance used by the engine's post-solve equilibrium verification
    /// (constraint violation, complementary slackness, budget exhaustion).
    #[builder(default = "1e-6")]
    check_tolerance: f64,
}

impl SolverOptions {
    /// Start building a set of options.
    pub fn builder() -> SolverOptionsBuilder {
        SolverOptionsBuilder::default()
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500_000,
            tolerance: 1e-10,
            check_tolerance: 1e-6,
        }
    }
}

/// The proportional response backend. Stateless across solves; all working
/// memory is scoped to a single [`ConvexSolver::solve`] call.
#[derive(Clone, Debug, Default)]
pub struct ProportionalResponse {
    options: SolverOptions,
}

impl ProportionalResponse {
    /// A solver with the given options.
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }
}

impl ConvexSolver for ProportionalResponse {
    fn solve(&self, program: &EgProgram) -> Result<SolverSolution> {
        let n = program.agents();
        let k = program.active_goods();
        let values = program.values();
        let weights = program.weights();
        let budget_total: f64 = weights.iter().sum();

        // seed each agent's spending in proportion to their valuations.
        // spending stays strictly positive wherever the valuation is, so no
        // utility can hit an exact zero mid-iteration unless the program is
        // degenerate.
        let mut spend = Matrix::zeros(n, k);
        for i in 0..n {
            let total: f64 = values.row(i).iter().sum();
            for j in 0..k {
                spend.set(i, j, weights[i] * values.get(i, j) / total);
            }
        }

        let mut prices = vec![0.0; k];
        let mut shares = Matrix::zeros(n, k);
        let mut status = SolverStatus::MaxIterations(self.options.max_iterations());
        for iteration in 0..self.options.max_iterations() {
            for j in 0..k {
                prices[j] = spend.col_sum(j);
            }
            for i in 0..n {
                for j in 0..k {
                    let share = if prices[j] > 0.0 { spend.get(i, j) / prices[j] } else { 0.0 };
                    shares.set(i, j, share);
                }
            }
            let mut delta = 0.0f64;
            for i in 0..n {
                let utility = values.row_dot(i, shares.row(i));
                if utility <= f64::MIN_POSITIVE {
                    return Ok(SolverSolution::new(SolverStatus::Degenerate(i), shares, prices));
                }
                for j in 0..k {
                    let next = weights[i] * values.get(i, j) * shares.get(i, j) / utility;
                    delta = delta.max((next - spend.get(i, j)).abs());
                    spend.set(i, j, next);
                }
            }
            if delta <= self.options.tolerance() * budget_total {
                tracing::debug!(iteration, delta, "proportional response converged");
                status = SolverStatus::Optimal;
                break;
            }
        }

        // recompute prices and shares off the final spending so the primal,
        // the duals, and the invariants (shares sum to one, spending sums to
        // budgets) all describe the same iterate
        for j in 0..k {
            prices[j] = spend.col_sum(j);
        }
        for i in 0..n {
            for j in 0..k {
                let share = if prices[j] > 0.0 { spend.get(i, j) / prices[j] } else { 0.0 };
                shares.set(i, j, share);
            }
        }
        Ok(SolverSolution::new(status, shares, prices))
    }
}
