//! Models for the two sides of an equilibrium computation: the [`Market`]
//! going in and the [`Equilibrium`] coming out.
//!
//! A `Market` can only be constructed through [`Market::new`], which checks
//! every input invariant up front. Holding a `Market` value is proof the
//! inputs are well-formed, so the engine never has to re-check shapes or
//! signs mid-solve. An `Equilibrium` is produced by the engine and owned by
//! the caller; the engine keeps no state between solves.

use crate::{
    error::{Error, Result},
    matrix::Matrix,
};
use getset::Getters;

/// A linear Fisher market: `n` agents with fixed budgets spending on `m`
/// divisible goods in fixed supply.
///
/// ```rust
/// use fisher_core::{Market, Matrix};
///
/// let valuations = Matrix::from_rows(vec![
///     vec![8.0, 4.0, 2.0],
///     vec![2.0, 6.0, 5.0],
/// ]).unwrap();
/// let market = Market::new(valuations, vec![60.0, 40.0], vec![1.0, 1.0, 1.0]).unwrap();
/// assert_eq!(market.agents(), 2);
/// assert_eq!(market.goods(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Getters)]
#[cfg_attr(feature = "with_serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[getset(get = "pub")]
pub struct Market {
    /// `valuations[i][j]` is agent i's utility per unit of good j. All
    /// entries finite and non-negative, every row has a positive entry.
    valuations: Matrix,
    /// One strictly-positive budget per agent. Doubles as the agent's weight
    /// in the Eisenberg-Gale objective.
    budgets: Vec<f64>,
    /// One non-negative capacity per good.
    supply: Vec<f64>,
}

impl Market {
    /// Create a market, checking every invariant the engine relies on:
    /// non-degenerate shape, matching vector lengths, finite non-negative
    /// valuations with no all-zero row, positive budgets, non-negative
    /// supply.
    pub fn new(valuations: Matrix, budgets: Vec<f64>, supply: Vec<f64>) -> Result<Self> {
        let n = valuations.rows();
        let m = valuations.cols();
        if n == 0 {
            Err(Error::EmptyMarket("no agents"))?;
        }
        if m == 0 {
            Err(Error::EmptyMarket("no goods"))?;
        }
        if budgets.len() != n {
            Err(Error::LengthMismatch("budget vector", budgets.len(), n))?;
        }
        if supply.len() != m {
            Err(Error::LengthMismatch("supply vector", supply.len(), m))?;
        }
        for (i, &budget) in budgets.iter().enumerate() {
            if !budget.is_finite() || budget <= 0.0 {
                Err(Error::InvalidBudget(i, budget))?;
            }
        }
        for (j, &cap) in supply.iter().enumerate() {
            if !cap.is_finite() || cap < 0.0 {
                Err(Error::InvalidSupply(j, cap))?;
            }
        }
        for i in 0..n {
            let mut has_positive = false;
            for j in 0..m {
                let val = valuations.get(i, j);
                if !val.is_finite() {
                    Err(Error::NonFiniteValuation(i, j))?;
                }
                if val < 0.0 {
                    Err(Error::NegativeValuation(i, j, val))?;
                }
                if val > 0.0 {
                    has_positive = true;
                }
            }
            if !has_positive {
                Err(Error::ZeroValuationRow(i))?;
            }
        }
        Ok(Self { valuations, budgets, supply })
    }

    /// Number of agents in the market.
    pub fn agents(&self) -> usize {
        self.valuations.rows()
    }

    /// Number of goods in the market.
    pub fn goods(&self) -> usize {
        self.valuations.cols()
    }
}

/// A competitive equilibrium: the allocation, the market-clearing prices,
/// and the per-agent aggregates a presentation layer would otherwise have to
/// re-derive.
#[derive(Clone, Debug, PartialEq, Getters)]
#[cfg_attr(feature = "with_serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[getset(get = "pub")]
pub struct Equilibrium {
    /// `allocation[i][j]` is the amount of good j handed to agent i.
    allocation: Matrix,
    /// Per-unit price of each good, the shadow price of its supply
    /// constraint. A good with zero supply is excluded from the program, so
    /// its reported price is pinned at zero by convention (the true dual is
    /// undefined there).
    prices: Vec<f64>,
    /// Each agent's realized utility under the allocation. Always strictly
    /// positive in a returned equilibrium.
    utilities: Vec<f64>,
    /// Each agent's total spending at the equilibrium prices. Equals the
    /// agent's budget up to numerical tolerance.
    spending: Vec<f64>,
}

impl Equilibrium {
    pub(crate) fn new(allocation: Matrix, prices: Vec<f64>, utilities: Vec<f64>, spending: Vec<f64>) -> Self {
        Self { allocation, prices, utilities, spending }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valuations() -> Matrix {
        Matrix::from_rows(vec![
            vec![8.0, 4.0, 2.0],
            vec![2.0, 6.0, 5.0],
        ]).unwrap()
    }

    #[test]
    fn accepts_well_formed_markets() {
        let market = Market::new(valuations(), vec![60.0, 40.0], vec![1.0, 1.0, 1.0]).unwrap();
        assert_eq!(market.agents(), 2);
        assert_eq!(market.goods(), 3);
        assert_eq!(market.budgets(), &vec![60.0, 40.0]);
    }

    #[test]
    fn rejects_empty_markets() {
        let res = Market::new(Matrix::zeros(0, 0), vec![], vec![]);
        assert_eq!(res, Err(Error::EmptyMarket("no agents")));
        let res = Market::new(Matrix::zeros(2, 0), vec![1.0, 1.0], vec![]);
        assert_eq!(res, Err(Error::EmptyMarket("no goods")));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let res = Market::new(valuations(), vec![60.0], vec![1.0, 1.0, 1.0]);
        assert_eq!(res, Err(Error::LengthMismatch("budget vector", 1, 2)));
        let res = Market::new(valuations(), vec![60.0, 40.0], vec![1.0]);
        assert_eq!(res, Err(Error::LengthMismatch("supply vector", 1, 3)));
    }

    #[test]
    fn rejects_bad_budgets() {
        let res = Market::new(valuations(), vec![60.0, 0.0], vec![1.0, 1.0, 1.0]);
        assert_eq!(res, Err(Error::InvalidBudget(1, 0.0)));
        let res = Market::new(valuations(), vec![-3.0, 40.0], vec![1.0, 1.0, 1.0]);
        assert_eq!(res, Err(Error::InvalidBudget(0, -3.0)));
        let res = Market::new(valuations(), vec![f64::NAN, 40.0], vec![1.0, 1.0, 1.0]);
        assert!(matches!(res, Err(Error::InvalidBudget(0, _))));
    }

    #[test]
    fn rejects_bad_supply() {
        let res = Market::new(valuations(), vec![60.0, 40.0], vec![1.0, -1.0, 1.0]);
        assert_eq!(res, Err(Error::InvalidSupply(1, -1.0)));
        let res = Market::new(valuations(), vec![60.0, 40.0], vec![1.0, f64::INFINITY, 1.0]);
        assert!(matches!(res, Err(Error::InvalidSupply(1, _))));
    }

    #[test]
    fn rejects_bad_valuations() {
        let vals = Matrix::from_rows(vec![
            vec![8.0, f64::NAN, 2.0],
            vec![2.0, 6.0, 5.0],
        ]).unwrap();
        let res = Market::new(vals, vec![60.0, 40.0], vec![1.0, 1.0, 1.0]);
        assert_eq!(res, Err(Error::NonFiniteValuation(0, 1)));

        let vals = Matrix::from_rows(vec![
            vec![8.0, 4.0, 2.0],
            vec![2.0, -6.0, 5.0],
        ]).unwrap();
        let res = Market::new(vals, vec![60.0, 40.0], vec![1.0, 1.0, 1.0]);
        assert_eq!(res, Err(Error::NegativeValuation(1, 1, -6.0)));
    }

    #[cfg(feature = "with_serde")]
    #[test]
    fn serializes_and_back() {
        let market = Market::new(valuations(), vec![60.0, 40.0], vec![1.0, 1.0, 1.0]).unwrap();
        let json = serde_json::to_string(&market).unwrap();
        let back: Market = serde_json::from_str(&json).unwrap();
        assert_eq!(market, back);
    }

    #[test]
    fn rejects_zero_valuation_rows() {
        let vals = Matrix::from_rows(vec![
            vec![8.0, 4.0, 2.0],
            vec![0.0, 0.0, 0.0],
        ]).unwrap();
        let res = Market::new(vals, vec![60.0, 40.0], vec![1.0, 1.0, 1.0]);
        assert_eq!(res, Err(Error::ZeroValuationRow(1)));
    }
}
