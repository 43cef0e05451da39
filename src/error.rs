//! The main error enum for the crate lives here, and documents the various
//! conditions that can arise while validating a market or solving for its
//! equilibrium.
//!
//! Every failure is typed and carried back to the caller through the
//! crate-wide [`Result`] alias. The engine never retries and never panics on
//! bad input; policy around retrying with looser tolerances (or a different
//! solver backend) belongs to whoever calls the core.

use thiserror::Error;

/// This is our error enum. It contains an entry for any part of the system in
/// which an expectation is not met or a problem occurs.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// A market was given with no agents or no goods.
    #[error("market is empty: {0}")]
    EmptyMarket(&'static str),
    /// A matrix was constructed from rows of unequal length.
    #[error("matrix row {0} has length {1}, expected {2}")]
    RaggedMatrix(usize, usize, usize),
    /// A vector's length doesn't line up with the valuation matrix.
    #[error("{0} has length {1}, expected {2}")]
    LengthMismatch(&'static str, usize, usize),
    /// A valuation entry is NaN or infinite.
    #[error("valuation for agent {0} / good {1} is not finite")]
    NonFiniteValuation(usize, usize),
    /// A valuation entry is negative. Linear Fisher markets assume agents
    /// never pay to get rid of goods.
    #[error("valuation for agent {0} / good {1} is negative ({2})")]
    NegativeValuation(usize, usize, f64),
    /// An agent values no good at all. Their utility would be pinned at zero
    /// and the log objective would be undefined, so the market is rejected
    /// before the program is ever formulated.
    #[error("agent {0} has no positive valuation for any good")]
    ZeroValuationRow(usize),
    /// A budget entry is zero, negative, or not finite.
    #[error("budget for agent {0} must be positive and finite (got {1})")]
    InvalidBudget(usize, f64),
    /// A supply entry is negative or not finite.
    #[error("supply for good {0} must be non-negative and finite (got {1})")]
    InvalidSupply(usize, f64),
    /// The program has no feasible point. With non-negative supply this
    /// cannot actually happen (the zero allocation is always feasible), but
    /// a solver backend reporting it is still surfaced rather than ignored.
    #[error("the equilibrium program is infeasible")]
    Infeasible,
    /// An agent's realized utility is (numerically) zero at the optimum, so
    /// the log objective diverges. Typically the agent only values goods
    /// that have no supply.
    #[error("agent {0}'s utility vanishes at the optimum; the objective is degenerate")]
    DegenerateUtility(usize),
    /// The solver ran out of its iteration budget before reaching tolerance.
    /// Distinct from [`Error::Infeasible`] so callers can retry with a
    /// larger budget or a looser tolerance.
    #[error("solver failed to converge within {0} iterations")]
    SolverNonConvergence(usize),
    /// A post-solve equilibrium check failed beyond tolerance: the solution
    /// the solver handed back does not actually describe an equilibrium.
    #[error("equilibrium verification failed: {0}")]
    NumericalInconsistency(String),
}

/// The result type we use in this here project.
pub type Result<T> = std::result::Result<T, Error>;
