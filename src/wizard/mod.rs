//! Step sequencing for the evaluation wizard.
//!
//! A [`StepSequence`] is a fixed, ordered list of named steps plus the
//! identifier of the step the user is currently on. Navigation operations
//! return a [`Transition`] describing where the view should go next; the
//! session layer decides whether and how to persist it.

pub mod error;
pub mod sequence;
pub mod step;

pub use error::WizardError;
pub use sequence::{BackLink, StepSequence, Transition};
pub use step::Step;
