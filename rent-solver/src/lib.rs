#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/**
 * Finding the welfare-maximizing assignment of agents to goods.
 */
pub mod assignment;

/**
 * The envy-free maximin pricing program and its solution.
 */
pub mod pricing;

/**
 * Rounding prices onto the currency grid.
 */
pub mod reconcile;

/**
 * Certification of envy-freeness and swap counterfactuals.
 */
pub mod verify;

/**
 * The engine composing the above into a single solve.
 */
mod divider;
pub use divider::*;

/**
 * Writing the pricing program to standard text formats.
 */
pub mod export;

/**
 * These are implementations of the linear programming port.
 */
mod impls;
pub use impls::*;

/**
 * Documents for reading divisions from and writing allocations to disk.
 */
#[cfg(feature = "io")]
pub mod io;
