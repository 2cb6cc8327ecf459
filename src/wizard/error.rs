//! Sequencer error types.

use thiserror::Error;

/// Errors raised by step navigation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("step sequence is empty; there is no first step to go to")]
    InvalidSequence,
}
