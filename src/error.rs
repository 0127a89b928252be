//! Error types for the signup wizard.

/// Top-level error type for the wizard core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

/// Local, synchronous validation failures. No collaborator call is made;
/// the user corrects the input and retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter the 6 digit verification code")]
    IncompleteCode { entered: usize },

    #[error("An email address is required before verification")]
    MissingEmail,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Remote collaborator failures. Each carries the user-presentable
/// message from the collaborator's error payload, or a generic fallback
/// when the collaborator raised a non-domain fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{message}")]
    Send { message: String },

    #[error("{message}")]
    Verify { message: String },

    #[error("{message}")]
    Submit { message: String },
}

impl CollaboratorError {
    /// Generic fallbacks used when the collaborator gives no message.
    pub fn send_fallback() -> Self {
        Self::Send {
            message: "OTP sending failed".to_string(),
        }
    }

    pub fn verify_fallback() -> Self {
        Self::Verify {
            message: "Verification failed".to_string(),
        }
    }

    pub fn submit_fallback() -> Self {
        Self::Submit {
            message: "Profile submission failed".to_string(),
        }
    }

    /// The user-presentable message, for inline display.
    pub fn message(&self) -> &str {
        match self {
            Self::Send { message } | Self::Verify { message } | Self::Submit { message } => message,
        }
    }
}

/// Result type alias for the wizard.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_presentable() {
        let e = ValidationError::IncompleteCode { entered: 4 };
        assert_eq!(e.to_string(), "Please enter the 6 digit verification code");

        let e = ValidationError::PasswordTooShort { min: 8 };
        assert_eq!(e.to_string(), "Password must be at least 8 characters long");
    }

    #[test]
    fn collaborator_fallbacks() {
        assert_eq!(CollaboratorError::send_fallback().message(), "OTP sending failed");
        assert_eq!(CollaboratorError::verify_fallback().message(), "Verification failed");
        assert_eq!(
            CollaboratorError::submit_fallback().message(),
            "Profile submission failed"
        );
    }

    #[test]
    fn errors_nest_into_top_level() {
        let e: Error = ValidationError::PasswordMismatch.into();
        assert!(matches!(e, Error::Validation(_)));

        let e: Error = CollaboratorError::verify_fallback().into();
        assert!(matches!(e, Error::Collaborator(_)));
    }
}
