//! Configuration types.

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Minimum accepted password length at the terminal step.
    pub min_password_length: usize,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            min_password_length: 8,
        }
    }
}
