//! Common infrastructure for the faultline project
//!
//! This crate provides the exception model shared by all faultline crates:
//! - Error kinds with an explicit generalization hierarchy
//! - Raised errors with their concrete type erased
//! - The handler trait chains are assembled from
//! - Logging setup

pub mod error;
pub mod handlers;

pub use error::*;
pub use handlers::{ConvertHandler, ExceptionHandler, PassThroughHandler};
