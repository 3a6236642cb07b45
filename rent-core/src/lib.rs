#![warn(missing_docs)]
//! Models and ports for envy-free rent division.
//!
//! A fixed total cost is divided among `n` agents over `n` indivisible goods.
//! Each agent states a non-negative valuation for each good; the engine picks a
//! welfare-maximizing assignment and prices the goods so that the prices sum
//! to the budget, no agent envies another's (good, price) pair, and the
//! smallest utility is as large as possible.
//!
//! This crate holds the validated value types shared by the engine and its
//! callers, as well as the port behind which linear programming backends sit.

/// Core domain models for rent division.
///
/// These are validated value types with minimal logic: the valuation matrix,
/// assignments, reconciled price vectors, the currency precision, and the
/// results produced by a solve. Every type that can be constructed from
/// untrusted data goes through a validating constructor.
pub mod models;

/// Interface traits for rent division.
///
/// The engine formulates its pricing problem as a [`models::LinearProgram`]
/// and hands it to an implementation of [`ports::LinearSolver`]. Keeping this
/// seam abstract allows swapping the numerical backend without touching the
/// formulation.
pub mod ports;
