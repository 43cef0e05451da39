//! The equilibrium engine: formulate, solve, extract, verify.
//!
//! This module ties the crate together. Given a validated [`Market`], the
//! engine builds the Eisenberg-Gale program for it, runs a [`ConvexSolver`]
//! over the program, maps the solver's primal values back to an allocation
//! and its duals back to per-unit prices, and then *checks* that the result
//! actually is a competitive equilibrium before handing it to the caller.
//!
//! The objective being maximized is `sum_i budget[i] * log(utility[i])`.
//! That exact form matters: it is the one program whose optimal primal
//! together with the supply-constraint duals forms a Fisher competitive
//! equilibrium. A plain utilitarian sum would yield an allocation with no
//! equilibrium prices attached.
//!
//! The engine is a pure function of its inputs. It holds no state between
//! calls, mutates nothing it is given, and every solve's working memory
//! dies with the call, so independent solves can run on as many threads as
//! you like.
//!
//! ```rust
//! use fisher_core::{engine, Market, Matrix};
//!
//! let valuations = Matrix::from_rows(vec![
//!     vec![8.0, 4.0, 2.0],
//!     vec![2.0, 6.0, 5.0],
//! ]).unwrap();
//! let market = Market::new(valuations, vec![60.0, 40.0], vec![1.0, 1.0, 1.0]).unwrap();
//! let equilibrium = engine::solve(&market).unwrap();
//! let spent: f64 = equilibrium.spending().iter().sum();
//! assert!((spent - 100.0).abs() < 1e-6);
//! ```

use crate::{
    error::{Error, Result},
    market::{Equilibrium, Market},
    matrix::Matrix,
    solver::{ConvexSolver, EgProgram, ProportionalResponse, SolverOptions, SolverSolution, SolverStatus},
};

/// Computes competitive equilibria for markets, using whatever solver
/// backend it was built with (proportional response unless told otherwise).
#[derive(Clone, Debug)]
pub struct EquilibriumEngine<S: ConvexSolver = ProportionalResponse> {
    solver: S,
    check_tolerance: f64,
}

/// Convenience entry point: solve a market with a default-configured engine.
pub fn solve(market: &Market) -> Result<Equilibrium> {
    EquilibriumEngine::new().solve(market)
}

impl EquilibriumEngine<ProportionalResponse> {
    /// An engine with default options.
    pub fn new() -> Self {
        Self::with_options(SolverOptions::default())
    }

    /// An engine running proportional response under the given options.
    pub fn with_options(options: SolverOptions) -> Self {
        let check_tolerance = options.check_tolerance();
        Self {
            solver: ProportionalResponse::new(options),
            check_tolerance,
        }
    }
}

impl Default for EquilibriumEngine<ProportionalResponse> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ConvexSolver> EquilibriumEngine<S> {
    /// An engine over a custom solver backend. `check_tolerance` bounds how
    /// much constraint violation the post-solve verification will accept.
    pub fn with_solver(solver: S, check_tolerance: f64) -> Self {
        Self { solver, check_tolerance }
    }

    /// Compute the competitive equilibrium of a market: an allocation under
    /// which every agent's bundle is the best they can afford, and a price
    /// per good under which supply clears.
    ///
    /// The returned [`Equilibrium`] is the caller's; the engine keeps
    /// nothing. All failure modes come back as typed errors, see
    /// [`Error`](crate::error::Error).
    pub fn solve(&self, market: &Market) -> Result<Equilibrium> {
        let program = EgProgram::formulate(market)?;
        let solution = self.solver.solve(&program)?;
        match *solution.status() {
            SolverStatus::Optimal => {}
            SolverStatus::Infeasible => Err(Error::Infeasible)?,
            SolverStatus::Degenerate(agent) => Err(Error::DegenerateUtility(agent))?,
            SolverStatus::MaxIterations(iterations) => Err(Error::SolverNonConvergence(iterations))?,
        }
        let equilibrium = extract(market, &program, &solution);
        self.verify(market, &equilibrium)?;
        Ok(equilibrium)
    }

    /// Check the equilibrium properties the solver is supposed to deliver,
    /// rather than trusting it: supply feasibility, complementary
    /// slackness, budget exhaustion, and strictly positive utilities.
    fn verify(&self, market: &Market, equilibrium: &Equilibrium) -> Result<()> {
        let eps = self.check_tolerance;
        for (i, &utility) in equilibrium.utilities().iter().enumerate() {
            if utility <= eps {
                Err(Error::DegenerateUtility(i))?;
            }
        }
        for (i, &spent) in equilibrium.spending().iter().enumerate() {
            let budget = market.budgets()[i];
            if (spent - budget).abs() > eps * budget {
                Err(Error::NumericalInconsistency(format!(
                    "agent {} spends {} against a budget of {}", i, spent, budget
                )))?;
            }
        }
        for j in 0..market.goods() {
            let supply = market.supply()[j];
            let allocated = equilibrium.allocation().col_sum(j);
            let slack = supply - allocated;
            let scale = if supply > 1.0 { supply } else { 1.0 };
            if slack < -eps * scale {
                Err(Error::NumericalInconsistency(format!(
                    "good {} oversubscribed: {} allocated of {} supplied", j, allocated, supply
                )))?;
            }
            // complementary slackness: a priced good must be (near) sold out
            if equilibrium.prices()[j] > eps && slack > eps * scale {
                if slack <= 100.0 * eps * scale {
                    tracing::warn!(good = j, slack, price = equilibrium.prices()[j],
                        "slack supply on a priced good, within tolerance");
                } else {
                    Err(Error::NumericalInconsistency(format!(
                        "good {} priced at {} but {} of {} supplied units go unsold",
                        j, equilibrium.prices()[j], slack, supply
                    )))?;
                }
            }
        }
        Ok(())
    }
}

/// Map a solver solution back to market coordinates: shares scale up to
/// quantities, unit-supply duals scale down to per-unit prices, and goods
/// that were dropped from the program (zero supply) come back with zero
/// allocation and a zero price.
fn extract(market: &Market, program: &EgProgram, solution: &SolverSolution) -> Equilibrium {
    let n = market.agents();
    let mut allocation = Matrix::zeros(n, market.goods());
    let mut prices = vec![0.0; market.goods()];
    for (col, &j) in program.goods().iter().enumerate() {
        let supply = market.supply()[j];
        let dual = solution.duals()[col];
        prices[j] = if dual > 0.0 { dual / supply } else { 0.0 };
        for i in 0..n {
            allocation.set(i, j, solution.shares().get(i, col) * supply);
        }
    }
    // absorb solver noise on the non-negative variables
    allocation.clip_min(0.0);
    let utilities = (0..n)
        .map(|i| market.valuations().row_dot(i, allocation.row(i)))
        .collect();
    let spending = (0..n)
        .map(|i| allocation.row_dot(i, &prices))
        .collect();
    Equilibrium::new(allocation, prices, utilities, spending)
}
