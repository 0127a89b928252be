//! The wizard controller — step cursor, gates, and terminal submission.

use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;
use tracing::{info, warn};

use crate::config::WizardConfig;
use crate::error::ValidationError;
use crate::profile::{ProfileAccumulator, ProfileUpdate, UserProfile};
use crate::services::{SessionStore, SubmissionService, VerificationService};
use crate::validators::{Strength, classify_strength, password_strength, passwords_match};
use crate::verification::{ChallengeManager, CodeEntry};

use super::step::Step;

/// Password pair being typed at the terminal step. The strength score
/// is recomputed on every change and never stored anywhere else.
#[derive(Debug, Clone, Default)]
pub struct PasswordState {
    password: String,
    confirm: String,
    strength: u8,
}

impl PasswordState {
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        self.strength = password_strength(&self.password);
    }

    pub fn set_confirm(&mut self, confirm: impl Into<String>) {
        self.confirm = confirm.into();
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn confirm(&self) -> &str {
        &self.confirm
    }

    /// Strength score 0..=5 of the current password.
    pub fn strength(&self) -> u8 {
        self.strength
    }

    /// Weak / Medium / Strong, for the strength meter.
    pub fn classification(&self) -> Strength {
        classify_strength(self.strength)
    }
}

/// Outcome of an `advance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The cursor moved to this step.
    Moved(Step),
    /// A gate or validation blocked the move; the user stays put and
    /// `last_error` carries the message.
    Blocked,
    /// The profile was submitted and acknowledged; the wizard is done.
    Completed,
}

/// Orchestrates the signup session: owns the accumulator, the
/// verification challenge, the password pair, and the step cursor, and
/// talks to the collaborators. One controller per signup session;
/// dropping it abandons the session.
pub struct WizardController {
    config: WizardConfig,
    step: Step,
    accumulator: ProfileAccumulator,
    challenge: ChallengeManager,
    password: PasswordState,
    verifier: Arc<dyn VerificationService>,
    submitter: Arc<dyn SubmissionService>,
    session: Arc<dyn SessionStore>,
    last_error: Option<String>,
    completed: bool,
}

impl WizardController {
    pub fn new(
        config: WizardConfig,
        verifier: Arc<dyn VerificationService>,
        submitter: Arc<dyn SubmissionService>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            step: Step::BasicInfo,
            accumulator: ProfileAccumulator::new(),
            challenge: ChallengeManager::new(),
            password: PasswordState::default(),
            verifier,
            submitter,
            session,
            last_error: None,
            completed: false,
        }
    }

    // ── Read access for the renderer ────────────────────────────────

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn step_index(&self) -> usize {
        self.step.index()
    }

    pub fn total_steps(&self) -> usize {
        Step::COUNT
    }

    pub fn profile(&self) -> &UserProfile {
        self.accumulator.read()
    }

    pub fn verification(&self) -> &ChallengeManager {
        &self.challenge
    }

    pub fn password_state(&self) -> &PasswordState {
        &self.password
    }

    /// The message behind the most recent `Blocked`, for inline display.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    // ── Edits ───────────────────────────────────────────────────────

    /// Merge a field edit into the accumulated profile. Called on every
    /// change; nothing is validated here.
    pub fn update_profile(&mut self, update: ProfileUpdate) {
        self.accumulator.merge(update);
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password.set_password(password);
    }

    pub fn set_confirm_password(&mut self, confirm: impl Into<String>) {
        self.password.set_confirm(confirm);
    }

    /// Mutable access to the six code slots on the verification step.
    pub fn code_entry_mut(&mut self) -> &mut CodeEntry {
        self.challenge.entry_mut()
    }

    // ── Verification delegation ─────────────────────────────────────

    /// Send (or resend) the one-time code to the accumulated email.
    pub async fn send_code(&mut self) {
        let email = self.email();
        self.challenge.send_code(&email, self.verifier.as_ref()).await;
    }

    /// Submit the entered code for the accumulated email.
    pub async fn submit_code(&mut self) {
        let email = self.email();
        self.challenge
            .submit_code(&email, self.verifier.as_ref())
            .await;
    }

    fn email(&self) -> String {
        self.accumulator
            .read()
            .email
            .clone()
            .unwrap_or_default()
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Move forward one step. On the verification step this requires a
    /// verified address; on the terminal step it validates the password
    /// pair and submits the profile instead of moving. Navigation
    /// itself never fails; blocked moves are reported as state.
    pub async fn advance(&mut self) -> Progress {
        if self.completed {
            warn!("advance after completion, ignoring");
            return Progress::Completed;
        }
        if self.step == Step::EmailVerification && !self.challenge.is_verified() {
            warn!("advance blocked: email not verified");
            return Progress::Blocked;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Progress::Moved(next)
            }
            None => self.submit().await,
        }
    }

    /// Move back one step; a no-op on the first step. Previously
    /// entered data is kept, since the accumulator is never cleared by
    /// navigation.
    pub fn retreat(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
    }

    /// "Not your email address?": from the verification step, jump
    /// eight positions back to basic info so the address can be
    /// corrected. Anywhere else this is a guarded no-op.
    pub fn change_email(&mut self) {
        if self.step != Step::EmailVerification {
            warn!(step = %self.step, "change_email outside the verification step, ignoring");
            return;
        }
        match Step::from_index(self.step.index() - 8) {
            Some(target) => self.step = target,
            None => warn!("change_email target out of range, ignoring"),
        }
    }

    // ── Terminal submission ─────────────────────────────────────────

    /// Validate the password pair, stamp the profile, and hand it to
    /// the submission collaborator. The call is awaited and a failure
    /// keeps the user on the terminal step with the message surfaced;
    /// completion is only signalled after an acknowledgement.
    async fn submit(&mut self) -> Progress {
        if self.password.password().len() < self.config.min_password_length {
            self.last_error = Some(
                ValidationError::PasswordTooShort {
                    min: self.config.min_password_length,
                }
                .to_string(),
            );
            return Progress::Blocked;
        }
        if !passwords_match(self.password.password(), self.password.confirm()) {
            self.last_error = Some(ValidationError::PasswordMismatch.to_string());
            return Progress::Blocked;
        }
        self.last_error = None;

        {
            let profile = self.accumulator.profile_mut();
            profile.password = Some(SecretString::from(self.password.password().to_string()));
            profile.completed_at = Some(Utc::now());
        }

        let profile = self.accumulator.read().clone();
        match self.submitter.submit_profile(profile).await {
            Ok(()) => {
                info!("signup complete, profile handed off");
                // Opaque signal; a store failure is the store's problem.
                self.session.set_signed_in().await;
                self.completed = true;
                Progress::Completed
            }
            Err(e) => {
                warn!(error = %e, "profile submission failed");
                self.last_error = Some(e.message().to_string());
                Progress::Blocked
            }
        }
    }
}
