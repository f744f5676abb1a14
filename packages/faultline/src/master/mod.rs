//! Master builder for all faultline operations
//!
//! Unified entry point, decomposed by what is being configured.

pub mod core;
pub mod manager;

// Re-export main types
pub use core::Faultline;
pub use manager::ManagerMasterBuilder;
