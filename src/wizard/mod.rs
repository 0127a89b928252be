//! Wizard orchestration — step sequencing and the controller that owns
//! the session's state.
//!
//! The controller holds the profile accumulator, the verification
//! challenge, and the step cursor. The screen renderer reads state
//! through the accessors and feeds edits and navigation back in; every
//! gate and every collaborator call lives here, not in the renderer.

pub mod controller;
pub mod step;

pub use controller::{PasswordState, Progress, WizardController};
pub use step::Step;
