//! Caller-supplied bearer token.

use crate::error::{Result, SoraChatError};

/// Environment variable consulted by [`Credential::from_env`].
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// An OpenAI API key passed explicitly into every call.
///
/// The core never stores or persists it; the caller owns its lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Creates a credential, rejecting empty or whitespace-only tokens.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SoraChatError::Auth("no API key provided".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Reads the credential from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(API_KEY_ENV)
            .map_err(|_| SoraChatError::Auth(format!("{API_KEY_ENV} not set")))?;
        Self::new(token)
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}
