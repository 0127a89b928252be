//! Email verification challenge — OTP lifecycle and code entry.
//!
//! The challenge manager owns the one-time-code sub-state machine:
//!
//! ```text
//! NotSent --send ok--> Sent --submit ok--> Verified   (irreversible)
//!                      Sent --submit err--> Failed
//!                      Failed --resend ok--> Sent
//!                      Failed --submit--> Verified | Failed
//! ```
//!
//! Failures never reset the flow; they surface as an inline message and
//! the user retries. Only one collaborator call is in flight at a time.

use tracing::warn;

use crate::error::ValidationError;
use crate::services::VerificationService;

/// Number of digits in a one-time code.
pub const CODE_LEN: usize = 6;

/// The six one-digit entry slots plus the focus cursor.
///
/// Reproduces the expected interaction pattern for 6-digit code entry:
/// typing a digit advances focus to the next slot; backspacing an empty
/// slot clears the previous one and moves focus back to it, so deleting
/// a filled slot from the right takes two key presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    slots: [Option<char>; CODE_LEN],
    focus: usize,
}

impl Default for CodeEntry {
    fn default() -> Self {
        Self {
            slots: [None; CODE_LEN],
            focus: 0,
        }
    }
}

impl CodeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a character into `slot`. Non-digits and out-of-range slots
    /// are ignored. Focus auto-advances unless `slot` is the last one.
    pub fn enter_digit(&mut self, slot: usize, ch: char) {
        if slot >= CODE_LEN {
            warn!(slot, "digit entry out of range, ignoring");
            return;
        }
        if !ch.is_ascii_digit() {
            return;
        }
        self.slots[slot] = Some(ch);
        if slot < CODE_LEN - 1 {
            self.focus = slot + 1;
        } else {
            self.focus = slot;
        }
    }

    /// Backspace in `slot`: a filled slot is cleared in place; an empty
    /// slot clears the previous one and moves focus there.
    pub fn backspace(&mut self, slot: usize) {
        if slot >= CODE_LEN {
            warn!(slot, "backspace out of range, ignoring");
            return;
        }
        if self.slots[slot].is_some() {
            self.slots[slot] = None;
            self.focus = slot;
        } else if slot > 0 {
            self.slots[slot - 1] = None;
            self.focus = slot - 1;
        }
    }

    /// Which slot currently has focus.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// The digit in `slot`, if any.
    pub fn digit(&self, slot: usize) -> Option<char> {
        self.slots.get(slot).copied().flatten()
    }

    /// Number of filled slots.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// The full 6-digit code, only once every slot is filled.
    pub fn code(&self) -> Option<String> {
        if self.filled() == CODE_LEN {
            Some(self.slots.iter().flatten().collect())
        } else {
            None
        }
    }

    /// Clear all slots and reset focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Where the challenge stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    /// No code has been sent yet.
    NotSent,
    /// A code is on its way to the address; waiting for the user.
    Sent,
    /// The address is proven. Irreversible for the session.
    Verified,
    /// The last check failed; the reason is user-presentable. The user
    /// may resend or re-submit without resending.
    Failed { reason: String },
}

/// Owns the OTP lifecycle: send, collect digits, submit, resend.
///
/// Collaborators are passed in per call; the manager never retains a
/// reference to them.
#[derive(Debug)]
pub struct ChallengeManager {
    state: VerificationState,
    entry: CodeEntry,
    attempt_in_flight: bool,
    message: Option<String>,
}

impl Default for ChallengeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeManager {
    pub fn new() -> Self {
        Self {
            state: VerificationState::NotSent,
            entry: CodeEntry::new(),
            attempt_in_flight: false,
            message: None,
        }
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.state, VerificationState::Verified)
    }

    /// Whether a collaborator call is outstanding (busy indicator).
    pub fn attempt_in_flight(&self) -> bool {
        self.attempt_in_flight
    }

    /// Inline status or error line for display beneath the code inputs.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn entry(&self) -> &CodeEntry {
        &self.entry
    }

    pub fn entry_mut(&mut self) -> &mut CodeEntry {
        &mut self.entry
    }

    /// Send (or resend) a code to `email`. Resend is unconditional, no
    /// cooldown is modeled. On collaborator failure the state is left
    /// unchanged and the message carries the error.
    pub async fn send_code(&mut self, email: &str, service: &dyn VerificationService) {
        if self.attempt_in_flight {
            return;
        }
        if self.is_verified() {
            warn!("send_code after verification, ignoring");
            return;
        }
        if email.is_empty() {
            self.message = Some(ValidationError::MissingEmail.to_string());
            return;
        }

        self.attempt_in_flight = true;
        let result = service.send_otp(email).await;
        self.attempt_in_flight = false;

        match result {
            Ok(()) => {
                self.state = VerificationState::Sent;
                self.message = Some("OTP Sent Successfully!".to_string());
            }
            Err(e) => {
                // Stay where we were; the user can try again.
                self.message = Some(e.message().to_string());
            }
        }
    }

    /// Submit the entered code for `email`. Fewer than six digits is
    /// rejected locally without a collaborator call.
    pub async fn submit_code(&mut self, email: &str, service: &dyn VerificationService) {
        if self.attempt_in_flight {
            return;
        }
        if self.is_verified() {
            warn!("submit_code after verification, ignoring");
            return;
        }
        if self.state == VerificationState::NotSent {
            warn!("submit_code before a code was sent, ignoring");
            return;
        }
        let code = match self.entry.code() {
            Some(code) => code,
            None => {
                self.message = Some(
                    ValidationError::IncompleteCode {
                        entered: self.entry.filled(),
                    }
                    .to_string(),
                );
                return;
            }
        };

        self.attempt_in_flight = true;
        let result = service.verify_otp(email, &code).await;
        self.attempt_in_flight = false;

        match result {
            Ok(()) => {
                self.state = VerificationState::Verified;
                self.message = Some("Verification Successful!".to_string());
            }
            Err(e) => {
                self.state = VerificationState::Failed {
                    reason: e.message().to_string(),
                };
                self.message = Some(e.message().to_string());
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn force_in_flight(&mut self, value: bool) {
        self.attempt_in_flight = value;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::CollaboratorError;

    /// Scriptable verification collaborator that records every call.
    struct StubVerifier {
        send_result: Result<(), CollaboratorError>,
        verify_result: Result<(), CollaboratorError>,
        calls: Mutex<Vec<String>>,
    }

    impl StubVerifier {
        fn ok() -> Self {
            Self {
                send_result: Ok(()),
                verify_result: Ok(()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_verify(message: &str) -> Self {
            Self {
                verify_result: Err(CollaboratorError::Verify {
                    message: message.to_string(),
                }),
                ..Self::ok()
            }
        }

        fn failing_send(message: &str) -> Self {
            Self {
                send_result: Err(CollaboratorError::Send {
                    message: message.to_string(),
                }),
                ..Self::ok()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VerificationService for StubVerifier {
        async fn send_otp(&self, email: &str) -> Result<(), CollaboratorError> {
            self.calls.lock().unwrap().push(format!("send:{email}"));
            self.send_result.clone()
        }

        async fn verify_otp(&self, email: &str, code: &str) -> Result<(), CollaboratorError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("verify:{email}:{code}"));
            self.verify_result.clone()
        }
    }

    fn fill_code(entry: &mut CodeEntry, digits: &str) {
        for (i, ch) in digits.chars().enumerate() {
            entry.enter_digit(i, ch);
        }
    }

    // ── CodeEntry ───────────────────────────────────────────────────

    #[test]
    fn digit_entry_advances_focus() {
        let mut entry = CodeEntry::new();
        entry.enter_digit(0, '1');
        assert_eq!(entry.focus(), 1);
        entry.enter_digit(1, '2');
        assert_eq!(entry.focus(), 2);
        // Last slot keeps focus
        entry.enter_digit(5, '6');
        assert_eq!(entry.focus(), 5);
    }

    #[test]
    fn non_digits_are_ignored() {
        let mut entry = CodeEntry::new();
        entry.enter_digit(0, 'x');
        entry.enter_digit(0, ' ');
        assert_eq!(entry.digit(0), None);
        assert_eq!(entry.focus(), 0);
    }

    #[test]
    fn backspace_on_filled_slot_clears_in_place() {
        let mut entry = CodeEntry::new();
        entry.enter_digit(0, '1');
        entry.enter_digit(1, '2');
        entry.backspace(1);
        assert_eq!(entry.digit(1), None);
        assert_eq!(entry.digit(0), Some('1'));
        assert_eq!(entry.focus(), 1);
    }

    #[test]
    fn backspace_on_empty_slot_chains_to_previous() {
        let mut entry = CodeEntry::new();
        entry.enter_digit(0, '1');
        entry.enter_digit(1, '2');
        // Focus is on slot 2, which is empty: first press clears slot 1
        // and moves focus back.
        entry.backspace(2);
        assert_eq!(entry.digit(1), None);
        assert_eq!(entry.focus(), 1);
        // Second press clears slot 0.
        entry.backspace(1);
        assert_eq!(entry.digit(0), None);
        assert_eq!(entry.focus(), 0);
        // At the first slot there is nothing left to chain to.
        entry.backspace(0);
        assert_eq!(entry.focus(), 0);
    }

    #[test]
    fn code_requires_all_six_digits() {
        let mut entry = CodeEntry::new();
        fill_code(&mut entry, "12345");
        assert_eq!(entry.code(), None);
        assert_eq!(entry.filled(), 5);
        entry.enter_digit(5, '6');
        assert_eq!(entry.code().as_deref(), Some("123456"));
    }

    // ── ChallengeManager ────────────────────────────────────────────

    #[tokio::test]
    async fn send_moves_not_sent_to_sent() {
        let verifier = StubVerifier::ok();
        let mut mgr = ChallengeManager::new();
        mgr.send_code("a@b.com", &verifier).await;
        assert_eq!(*mgr.state(), VerificationState::Sent);
        assert_eq!(mgr.message(), Some("OTP Sent Successfully!"));
        assert_eq!(verifier.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_send_leaves_state_unchanged() {
        let verifier = StubVerifier::failing_send("Mail server unavailable");
        let mut mgr = ChallengeManager::new();
        mgr.send_code("a@b.com", &verifier).await;
        assert_eq!(*mgr.state(), VerificationState::NotSent);
        assert_eq!(mgr.message(), Some("Mail server unavailable"));
    }

    #[tokio::test]
    async fn send_without_email_is_local_only() {
        let verifier = StubVerifier::ok();
        let mut mgr = ChallengeManager::new();
        mgr.send_code("", &verifier).await;
        assert_eq!(*mgr.state(), VerificationState::NotSent);
        assert_eq!(verifier.call_count(), 0);
        assert!(mgr.message().is_some());
    }

    #[tokio::test]
    async fn incomplete_code_never_reaches_the_collaborator() {
        let verifier = StubVerifier::ok();
        let mut mgr = ChallengeManager::new();
        mgr.send_code("a@b.com", &verifier).await;
        fill_code(mgr.entry_mut(), "123");
        mgr.submit_code("a@b.com", &verifier).await;
        assert_eq!(*mgr.state(), VerificationState::Sent);
        assert_eq!(
            mgr.message(),
            Some("Please enter the 6 digit verification code")
        );
        // Only the send call went out.
        assert_eq!(verifier.call_count(), 1);
    }

    #[tokio::test]
    async fn full_code_verifies() {
        let verifier = StubVerifier::ok();
        let mut mgr = ChallengeManager::new();
        mgr.send_code("a@b.com", &verifier).await;
        fill_code(mgr.entry_mut(), "123456");
        mgr.submit_code("a@b.com", &verifier).await;
        assert!(mgr.is_verified());
        assert_eq!(mgr.message(), Some("Verification Successful!"));
        assert_eq!(
            verifier.calls.lock().unwrap().as_slice(),
            ["send:a@b.com", "verify:a@b.com:123456"]
        );
    }

    #[tokio::test]
    async fn wrong_code_fails_with_collaborator_reason() {
        let verifier = StubVerifier::failing_verify("Invalid OTP");
        let mut mgr = ChallengeManager::new();
        mgr.send_code("a@b.com", &verifier).await;
        fill_code(mgr.entry_mut(), "000000");
        mgr.submit_code("a@b.com", &verifier).await;
        assert_eq!(
            *mgr.state(),
            VerificationState::Failed {
                reason: "Invalid OTP".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failed_permits_resend_and_direct_resubmit() {
        let verifier = StubVerifier::failing_verify("Invalid OTP");
        let mut mgr = ChallengeManager::new();
        mgr.send_code("a@b.com", &verifier).await;
        fill_code(mgr.entry_mut(), "000000");
        mgr.submit_code("a@b.com", &verifier).await;
        assert!(matches!(mgr.state(), VerificationState::Failed { .. }));

        // Re-attempt without resending, now against a passing backend.
        let passing = StubVerifier::ok();
        mgr.submit_code("a@b.com", &passing).await;
        assert!(mgr.is_verified());

        // Or, from Failed, a resend would have gone back to Sent:
        let mut mgr2 = ChallengeManager::new();
        mgr2.send_code("a@b.com", &verifier).await;
        fill_code(mgr2.entry_mut(), "000000");
        mgr2.submit_code("a@b.com", &verifier).await;
        mgr2.send_code("a@b.com", &verifier).await;
        assert_eq!(*mgr2.state(), VerificationState::Sent);
    }

    #[tokio::test]
    async fn verified_is_irreversible() {
        let verifier = StubVerifier::ok();
        let mut mgr = ChallengeManager::new();
        mgr.send_code("a@b.com", &verifier).await;
        fill_code(mgr.entry_mut(), "123456");
        mgr.submit_code("a@b.com", &verifier).await;
        assert!(mgr.is_verified());

        let calls_before = verifier.call_count();
        mgr.send_code("a@b.com", &verifier).await;
        mgr.submit_code("a@b.com", &verifier).await;
        assert!(mgr.is_verified());
        assert_eq!(verifier.call_count(), calls_before, "no-ops once verified");
    }

    #[tokio::test]
    async fn submit_before_send_is_a_guarded_no_op() {
        let verifier = StubVerifier::ok();
        let mut mgr = ChallengeManager::new();
        fill_code(mgr.entry_mut(), "123456");
        mgr.submit_code("a@b.com", &verifier).await;
        assert_eq!(*mgr.state(), VerificationState::NotSent);
        assert_eq!(verifier.call_count(), 0);
    }

    #[tokio::test]
    async fn in_flight_attempts_are_mutually_exclusive() {
        let verifier = StubVerifier::ok();
        let mut mgr = ChallengeManager::new();
        mgr.force_in_flight(true);
        mgr.send_code("a@b.com", &verifier).await;
        mgr.submit_code("a@b.com", &verifier).await;
        assert_eq!(verifier.call_count(), 0);
        assert_eq!(*mgr.state(), VerificationState::NotSent);
    }
}
