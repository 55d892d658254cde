//! Builder API for ergonomic instruction set and machine construction.
//!
//! This module provides fluent builders and the `state_enum!` macro for
//! declaring states with minimal boilerplate.

pub mod error;
pub mod instructions;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use instructions::InstructionSetBuilder;
pub use machine::StateMachineBuilder;
