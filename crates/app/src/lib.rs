//! Server-side cart consistency engine.
//!
//! Cart items live as separate documents in a store without transactions, while each cart
//! carries denormalised totals. This crate keeps the two in step with optimistic,
//! version-checked retry loops and exposes the cart operations built on top of them.

pub mod clock;
pub mod context;
pub mod domain;
pub mod retry;
pub mod store;

#[cfg(test)]
mod test;
