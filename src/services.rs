//! Collaborator contracts and their HTTP implementations.
//!
//! The wizard core only ever talks to the outside world through these
//! three traits. The `Http*` implementations speak the stub backend's
//! `{success, message}` JSON envelope; tests substitute their own stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::profile::UserProfile;

/// Email ownership proof: send a one-time code, then check it.
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Ask the backend to mail a 6-digit code to `email`.
    async fn send_otp(&self, email: &str) -> Result<(), CollaboratorError>;

    /// Check a collected 6-digit code against `email`.
    async fn verify_otp(&self, email: &str, code: &str) -> Result<(), CollaboratorError>;
}

/// Accepts a finished profile at the end of the wizard.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit_profile(&self, profile: UserProfile) -> Result<(), CollaboratorError>;
}

/// Scoped key-value store recording the signed-in flag. Opaque signal;
/// the wizard sets it after a successful submission and never reads it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set_signed_in(&self);
}

/// Response envelope the stub backend wraps every reply in.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendOtpRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

/// Verification backend client. POSTs to `{base}/api/verify/send-otp`
/// and `{base}/api/verify`.
pub struct HttpVerificationService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVerificationService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: CollaboratorError,
    ) -> Result<(), CollaboratorError> {
        let url = format!("{}{}", self.base_url, path);
        let response = match self.client.post(&url).json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%url, error = %e, "verification request failed to send");
                return Err(fallback);
            }
        };
        let envelope: ApiEnvelope = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(%url, error = %e, "verification response was not the expected envelope");
                return Err(fallback);
            }
        };
        if envelope.success {
            Ok(())
        } else {
            // Prefer the backend's own message over the generic fallback.
            match envelope.message {
                Some(message) => Err(match fallback {
                    CollaboratorError::Send { .. } => CollaboratorError::Send { message },
                    CollaboratorError::Verify { .. } => CollaboratorError::Verify { message },
                    CollaboratorError::Submit { .. } => CollaboratorError::Submit { message },
                }),
                None => Err(fallback),
            }
        }
    }
}

#[async_trait]
impl VerificationService for HttpVerificationService {
    async fn send_otp(&self, email: &str) -> Result<(), CollaboratorError> {
        self.post(
            "/api/verify/send-otp",
            &SendOtpRequest { email },
            CollaboratorError::send_fallback(),
        )
        .await
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<(), CollaboratorError> {
        self.post(
            "/api/verify",
            &VerifyOtpRequest { email, otp: code },
            CollaboratorError::verify_fallback(),
        )
        .await
    }
}

/// Profile submission client. POSTs the finished profile to
/// `{base}/api/user-profile`.
pub struct HttpSubmissionService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSubmissionService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SubmissionService for HttpSubmissionService {
    async fn submit_profile(&self, profile: UserProfile) -> Result<(), CollaboratorError> {
        let url = format!("{}/api/user-profile", self.base_url);
        let response = match self.client.post(&url).json(&profile).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%url, error = %e, "profile submission failed to send");
                return Err(CollaboratorError::submit_fallback());
            }
        };
        if response.status().is_success() {
            tracing::info!("profile submitted");
            Ok(())
        } else {
            let status = response.status();
            let message = response
                .json::<ApiEnvelope>()
                .await
                .ok()
                .and_then(|e| e.message);
            tracing::warn!(%status, "profile submission rejected");
            Err(match message {
                Some(message) => CollaboratorError::Submit { message },
                None => CollaboratorError::submit_fallback(),
            })
        }
    }
}
