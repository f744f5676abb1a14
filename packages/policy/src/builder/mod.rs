//! Fluent policy builders
//!
//! Usage: `PolicyGroupBuilder::<A, R>::create(|c| c.start::<H1>().then_complete::<H2>())`
//!
//! [`ChainBuilder`] tracks its state in the type system; [`DynChainBuilder`] does the
//! same checks at runtime for steps only known while the program runs.

mod chain;
mod dyn_chain;
mod group_builder;
pub mod states;

pub use chain::ChainBuilder;
pub use dyn_chain::{ChainState, DynChainBuilder};
pub use group_builder::{ChainCallback, PolicyGroupBuilder};
