//! The core datastructures and algorithms for computing competitive
//! equilibria of linear Fisher markets.
//!
//! A Fisher market has a fixed set of divisible goods in fixed supply and a
//! set of agents, each with a fixed budget and a linear valuation over the
//! goods. A competitive equilibrium is an allocation plus a price per good
//! such that every agent's bundle is the best one they can afford and no
//! good is oversubscribed. By the Eisenberg-Gale theorem, that pair is
//! exactly the optimal primal/dual solution of the convex program
//! "maximize the budget-weighted sum of log utilities subject to supply";
//! this crate formulates that program, solves it, and verifies the result.
//!
//! The pieces:
//!
//! - [`Market`] / [`Equilibrium`] -- the validated input model and the
//!   output model (see [`market`])
//! - [`engine::EquilibriumEngine`] -- formulate, solve, extract, verify
//! - [`solver`] -- the solver seam, with a proportional-response backend
//! - [`error`] -- the typed failure taxonomy
//!
//! This crate is deliberately a *core*: no CLI, no rendering, no report
//! generation, no persistence. Callers pass numeric arrays in and get
//! numeric arrays back, in the same agent/good order.
//!
//! ```rust
//! use fisher_core::{engine, Market, Matrix};
//!
//! let valuations = Matrix::from_rows(vec![
//!     vec![10.0, 4.0, 2.0],
//!     vec![3.0, 9.0, 5.0],
//!     vec![5.0, 2.0, 8.0],
//! ]).unwrap();
//! let market = Market::new(valuations, vec![50.0, 30.0, 20.0], vec![1.0, 1.0, 1.0]).unwrap();
//!
//! let equilibrium = engine::solve(&market).unwrap();
//! // every scarce good is fully allocated at a positive price
//! for j in 0..market.goods() {
//!     assert!(equilibrium.prices()[j] > 0.0);
//!     assert!((equilibrium.allocation().col_sum(j) - 1.0).abs() < 1e-6);
//! }
//! ```

pub mod error;
pub mod engine;
pub mod market;
pub mod matrix;
pub mod solver;

pub use error::{Error, Result};
pub use engine::EquilibriumEngine;
pub use market::{Equilibrium, Market};
pub use matrix::Matrix;
pub use solver::{ConvexSolver, EgProgram, ProportionalResponse, SolverOptions, SolverSolution, SolverStatus};
