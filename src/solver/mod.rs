//! The seam between the equilibrium engine and whatever actually solves the
//! Eisenberg-Gale program.
//!
//! The engine formulates a market into an [`EgProgram`] and hands it to a
//! [`ConvexSolver`]. A solver reports back a [`SolverSolution`]: a status, a
//! primal value for every decision variable, and a dual value for every
//! supply constraint. Anything other than [`SolverStatus::Optimal`] is
//! turned into a typed error by the engine, never into a garbage result.
//!
//! The only backend shipped here is [`ProportionalResponse`], a
//! special-purpose iteration that exploits the separable structure of the
//! Eisenberg-Gale program. A general conic solver could be slotted in behind
//! the same trait without touching the engine.

mod proportional;

pub use proportional::{ProportionalResponse, SolverOptions, SolverOptionsBuilder};

use crate::{
    error::{Error, Result},
    market::Market,
    matrix::Matrix,
};
use getset::Getters;

/// The Eisenberg-Gale program for a market, normalized to unit supply.
///
/// Goods with zero supply cannot be allocated, so they are dropped here and
/// reinstated (with zero allocation) when the engine maps a solution back to
/// market coordinates. The remaining goods have their valuation column
/// scaled by the good's supply: the program's decision variables are then
/// *shares* of each good's supply, every supply constraint reads
/// `sum_i y[i][j] <= 1`, and the dual of constraint j is `supply[j]` times
/// the per-unit price of the good.
#[derive(Clone, Debug, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct EgProgram {
    /// Objective weights, one per agent (the agents' budgets).
    weights: Vec<f64>,
    /// Supply-scaled valuations, one column per *active* good.
    values: Matrix,
    /// For each program column, the index of the good in the original
    /// market.
    goods: Vec<usize>,
}

impl EgProgram {
    /// Formulate the program for a market: maximize
    /// `sum_i weights[i] * log(sum_j values[i][j] * y[i][j])` subject to
    /// `sum_i y[i][j] <= 1` and `y >= 0`.
    ///
    /// Fails with [`Error::DegenerateUtility`] if some agent only values
    /// goods that have no supply; such an agent's utility is pinned at zero
    /// and the objective is undefined, so there is no point invoking a
    /// solver.
    pub fn formulate(market: &Market) -> Result<Self> {
        let goods: Vec<usize> = (0..market.goods())
            .filter(|&j| market.supply()[j] > 0.0)
            .collect();
        for i in 0..market.agents() {
            let stocked = goods.iter().any(|&j| market.valuations().get(i, j) > 0.0);
            if !stocked {
                Err(Error::DegenerateUtility(i))?;
            }
        }
        let mut values = Matrix::zeros(market.agents(), goods.len());
        for i in 0..market.agents() {
            for (col, &j) in goods.iter().enumerate() {
                values.set(i, col, market.valuations().get(i, j) * market.supply()[j]);
            }
        }
        Ok(Self {
            weights: market.budgets().clone(),
            values,
            goods,
        })
    }

    /// Number of agents in the program.
    pub fn agents(&self) -> usize {
        self.values.rows()
    }

    /// Number of active (positively supplied) goods in the program.
    pub fn active_goods(&self) -> usize {
        self.goods.len()
    }
}

/// What a solver run came back with, before the engine has interpreted it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolverStatus {
    /// Converged to the requested tolerance.
    Optimal,
    /// No feasible point exists. Cannot actually happen for a validated
    /// market (the zero allocation is always feasible), but a backend
    /// reporting it must be believed.
    Infeasible,
    /// Some agent's utility collapsed to zero during the solve, carrying
    /// the objective to negative infinity.
    Degenerate(usize),
    /// The iteration budget ran out before tolerance was reached.
    MaxIterations(usize),
}

/// The raw output of a solver: primal shares and constraint duals, indexed
/// in program coordinates (active goods only).
#[derive(Clone, Debug, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct SolverSolution {
    /// Terminal status. Only [`SolverStatus::Optimal`] solutions carry
    /// meaningful values.
    status: SolverStatus,
    /// `shares[i][j]`: agent i's share of active good j's supply.
    shares: Matrix,
    /// Dual value of each active good's (unit) supply constraint.
    duals: Vec<f64>,
}

impl SolverSolution {
    pub(crate) fn new(status: SolverStatus, shares: Matrix, duals: Vec<f64>) -> Self {
        Self { status, shares, duals }
    }
}

/// Anything that can solve an [`EgProgram`]: report a status, the optimal
/// primal values, and the optimal dual of every supply constraint.
pub trait ConvexSolver {
    /// Solve the program. An `Err` means the solver itself broke; a
    /// non-optimal [`SolverStatus`] means the program resisted.
    fn solve(&self, program: &EgProgram) -> Result<SolverSolution>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> Market {
        let vals = Matrix::from_rows(vec![
            vec![8.0, 4.0, 2.0],
            vec![2.0, 6.0, 5.0],
        ]).unwrap();
        Market::new(vals, vec![60.0, 40.0], vec![1.0, 0.0, 2.0]).unwrap()
    }

    #[test]
    fn formulates_active_goods_only() {
        let program = EgProgram::formulate(&market()).unwrap();
        assert_eq!(program.agents(), 2);
        assert_eq!(program.active_goods(), 2);
        assert_eq!(program.goods(), &vec![0, 2]);
        // columns scaled by supply
        assert_eq!(program.values().get(0, 0), 8.0);
        assert_eq!(program.values().get(0, 1), 4.0);
        assert_eq!(program.values().get(1, 1), 10.0);
        assert_eq!(program.weights(), &vec![60.0, 40.0]);
    }

    #[test]
    fn rejects_agents_starved_by_zero_supply() {
        // agent 1 only values the good with no supply
        let vals = Matrix::from_rows(vec![
            vec![8.0, 4.0],
            vec![0.0, 6.0],
        ]).unwrap();
        let market = Market::new(vals, vec![60.0, 40.0], vec![1.0, 0.0]).unwrap();
        let res = EgProgram::formulate(&market);
        assert_eq!(res, Err(Error::DegenerateUtility(1)));
    }

    #[test]
    fn rejects_fully_unstocked_markets() {
        let vals = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let market = Market::new(vals, vec![10.0], vec![0.0, 0.0]).unwrap();
        let res = EgProgram::formulate(&market);
        assert_eq!(res, Err(Error::DegenerateUtility(0)));
    }
}
