//! Access-token acquisition.
//!
//! The orchestrator asks a [`TokenProvider`] for a bearer token once per
//! invocation and never caches or refreshes it; whatever caching exists
//! belongs to the provider. Tokens are never written to logs.

use crate::error::Arxiv2DriveError;
use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Command used when no token or token command is configured.
pub const DEFAULT_TOKEN_COMMAND: &str = "gcloud auth print-access-token";

/// Source of OAuth bearer tokens for the Drive API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a token, possibly interacting with the user.
    ///
    /// Refusal, cancellation and provider errors all surface as
    /// [`Arxiv2DriveError::AuthenticationFailed`].
    async fn access_token(&self) -> Result<String, Arxiv2DriveError>;
}

/// A token handed in up front (flag or `GOOGLE_DRIVE_TOKEN`).
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().trim().to_string(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, Arxiv2DriveError> {
        if self.token.is_empty() {
            return Err(Arxiv2DriveError::AuthenticationFailed {
                detail: "empty access token".into(),
            });
        }
        Ok(self.token.clone())
    }
}

/// Runs an external program and reads the token from its stdout.
///
/// stdin and stderr stay attached to the terminal so the program can walk
/// the user through an interactive consent flow.
#[derive(Debug, Clone)]
pub struct CommandTokenProvider {
    program: String,
    args: Vec<String>,
}

impl CommandTokenProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line on whitespace. Quoting is not supported.
    pub fn from_command_line(line: &str) -> Result<Self, Arxiv2DriveError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            Arxiv2DriveError::InvalidConfig("token command must not be empty".into())
        })?;
        Ok(Self::new(program, parts.collect()))
    }
}

impl Default for CommandTokenProvider {
    fn default() -> Self {
        let mut parts = DEFAULT_TOKEN_COMMAND.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self::new(program, parts.collect())
    }
}

#[async_trait]
impl TokenProvider for CommandTokenProvider {
    async fn access_token(&self) -> Result<String, Arxiv2DriveError> {
        debug!("Requesting access token from `{}`", self.program);

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdout(Stdio::piped())
            .output()
            .await
            .map_err(|e| Arxiv2DriveError::AuthenticationFailed {
                detail: format!("could not run `{}`: {e}", self.program),
            })?;

        if !output.status.success() {
            return Err(Arxiv2DriveError::AuthenticationFailed {
                detail: format!("`{}` exited with {}", self.program, output.status),
            });
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(Arxiv2DriveError::AuthenticationFailed {
                detail: format!("`{}` printed no token", self.program),
            });
        }
        Ok(token)
    }
}
