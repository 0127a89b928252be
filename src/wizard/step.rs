//! The wizard's ten fixed steps.

use serde::{Deserialize, Serialize};

/// One screen of the signup flow.
///
/// Steps form a doubly-linked sequence with two exceptions: advancing
/// off `PasswordSetup` triggers submission instead of a step change,
/// and the "change email" action on `EmailVerification` jumps straight
/// back to `BasicInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    BasicInfo,
    TobaccoHistory,
    Triggers,
    Health,
    Motivation,
    Behavior,
    Financial,
    Preferences,
    EmailVerification,
    PasswordSetup,
}

impl Step {
    /// All steps in wizard order.
    pub const ALL: [Step; 10] = [
        Step::BasicInfo,
        Step::TobaccoHistory,
        Step::Triggers,
        Step::Health,
        Step::Motivation,
        Step::Behavior,
        Step::Financial,
        Step::Preferences,
        Step::EmailVerification,
        Step::PasswordSetup,
    ];

    /// Number of steps.
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position in the sequence.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// The step at `index`, if in range.
    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    /// The following step, `None` on the terminal step.
    pub fn next(&self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, `None` on the first step.
    pub fn prev(&self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Whether advancing from here submits instead of moving.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::PasswordSetup)
    }

    /// Title shown in the step indicator.
    pub fn title(&self) -> &'static str {
        match self {
            Step::BasicInfo => "Basic Information",
            Step::TobaccoHistory => "Tobacco Consumption History",
            Step::Triggers => "Triggers",
            Step::Health => "Health",
            Step::Motivation => "Motivation",
            Step::Behavior => "Behavior",
            Step::Financial => "Financial",
            Step::Preferences => "Preferences",
            Step::EmailVerification => "Email Verification",
            Step::PasswordSetup => "Password Setup",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
