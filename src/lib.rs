//! Signup wizard — multi-step profile collection core.
//!
//! The wizard walks a new user through ten steps of profile questions,
//! gates completion behind an email ownership proof (6-digit one-time
//! code) and a password check, then hands the finished profile to a
//! submission collaborator. Screen rendering and session storage live
//! outside this crate; the core exposes state and the renderer draws it.

pub mod config;
pub mod error;
pub mod profile;
pub mod services;
pub mod validators;
pub mod verification;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{CollaboratorError, Error, Result, ValidationError};
pub use profile::{Location, ProfileAccumulator, ProfileUpdate, UserProfile};
pub use services::{SessionStore, SubmissionService, VerificationService};
pub use validators::{Strength, classify_strength, password_strength, passwords_match};
pub use verification::{ChallengeManager, CodeEntry, VerificationState};
pub use wizard::{PasswordState, Progress, Step, WizardController};
