//! Build errors for machine builders.

use thiserror::Error;

/// Errors that can occur when building state machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Instruction set not specified. Call .instructions(set) before .build()")]
    MissingInstructions,
}
