//! Command handling: one user trigger → resolve → upload.
//!
//! The handler is the only entry point that touches the [`InvocationGate`],
//! so overlapping triggers are turned away with `Busy` rather than racing
//! each other through the folder lookup. [`save_to_drive`] shares one gate
//! across the whole process.

use crate::auth::TokenProvider;
use crate::config::UploadConfig;
use crate::error::Arxiv2DriveError;
use crate::gate::InvocationGate;
use crate::output::{CommandOutcome, PageReference, Resolution};
use crate::pipeline::drive::{DriveApi, DriveClient};
use crate::pipeline::fetch::{HttpSource, PaperSource};
use crate::resolve::Resolver;
use crate::upload::Orchestrator;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::info;

/// Gate shared by every [`save_to_drive`] call in this process.
static SAVE_GATE: Lazy<InvocationGate> = Lazy::new(InvocationGate::new);

/// Wires a [`Resolver`] and an [`Orchestrator`] behind an [`InvocationGate`].
#[derive(Clone)]
pub struct CommandHandler {
    resolver: Resolver,
    orchestrator: Orchestrator,
    gate: InvocationGate,
}

impl CommandHandler {
    /// Build a handler that talks to arXiv and Drive over HTTPS.
    pub fn new(
        config: UploadConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, Arxiv2DriveError> {
        let client = config.http_client()?;
        let source = Arc::new(HttpSource::new(client.clone(), config.request_timeout_secs));
        let drive = Arc::new(DriveClient::new(
            client,
            config.drive_api_url.clone(),
            config.drive_upload_url.clone(),
        ));
        Ok(Self::with_parts(config, tokens, source, drive))
    }

    /// Build a handler from caller-supplied collaborators.
    pub fn with_parts(
        config: UploadConfig,
        tokens: Arc<dyn TokenProvider>,
        source: Arc<dyn PaperSource>,
        drive: Arc<dyn DriveApi>,
    ) -> Self {
        Self {
            resolver: Resolver::new(Arc::clone(&source), config.clone()),
            orchestrator: Orchestrator::new(tokens, source, drive, config),
            gate: InvocationGate::new(),
        }
    }

    /// Replace the handler's own gate, e.g. with one shared by several handlers.
    pub fn with_gate(mut self, gate: InvocationGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Handle one trigger for `page`.
    ///
    /// `command` identifies the trigger and is only logged.
    pub async fn on_command(
        &self,
        command: &str,
        page: &PageReference,
    ) -> Result<CommandOutcome, Arxiv2DriveError> {
        info!("Command received: {} (page {:?})", command, page.id);
        let _guard = self.gate.try_enter()?;

        let document = match self.resolver.resolve(page).await? {
            Resolution::Resolved(doc) => doc,
            Resolution::NotApplicable => {
                return Ok(CommandOutcome::NotApplicable {
                    url: page.url.clone(),
                })
            }
        };

        let result = self.orchestrator.upload(&document).await?;
        Ok(CommandOutcome::Uploaded(result))
    }
}

/// Resolve `page` and upload it with HTTPS collaborators built from `config`.
///
/// Overlapping calls anywhere in the process fail with
/// [`Arxiv2DriveError::Busy`] until the running one finishes.
///
/// # Example
/// ```rust,no_run
/// use arxiv2drive::{save_to_drive, CommandOutcome, PageReference, StaticTokenProvider, UploadConfig};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let page = PageReference::new("https://arxiv.org/abs/1706.03762");
/// let tokens = Arc::new(StaticTokenProvider::new(std::env::var("GOOGLE_DRIVE_TOKEN")?));
/// match save_to_drive(&page, &UploadConfig::default(), tokens).await? {
///     CommandOutcome::Uploaded(r) => println!("saved {}", r.file.filename),
///     CommandOutcome::NotApplicable { url } => println!("{url} is not an arXiv page"),
/// }
/// # Ok(())
/// # }
/// ```
pub async fn save_to_drive(
    page: &PageReference,
    config: &UploadConfig,
    tokens: Arc<dyn TokenProvider>,
) -> Result<CommandOutcome, Arxiv2DriveError> {
    CommandHandler::new(config.clone(), tokens)?
        .with_gate(SAVE_GATE.clone())
        .on_command("save-to-drive", page)
        .await
}
