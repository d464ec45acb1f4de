//! Editor protocol server
//!
//! Serves completion, completion resolution and script execution over stdio.
//! Requests run the pipeline on a snapshot of the document text; nothing parsed
//! is kept between requests.

mod documents;

pub use documents::DocumentStore;

use std::sync::Arc;

use serde_json::Value;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info, warn};

use crate::completion::{
    CachedCandidateProvider, Completion, CompletionContext, CompletionEngine, Triggers,
};
use crate::config::Config;
use crate::connection::{NameCache, StoreClient};
use crate::documentation::DocumentationStore;
use crate::error::ExecutionError;
use crate::executor::{CommandExecutor, ExecutionOutcome};

/// Name of the command that runs a script
pub const EXECUTE_COMMAND: &str = "server.executeCommand";

/// Everything a request handler needs, built once at start-up
pub struct Services {
    pub engine: CompletionEngine,
    pub executor: CommandExecutor,
    pub documentation: DocumentationStore,
}

impl Services {
    /// Wire the services from configuration
    ///
    /// # Arguments
    /// * `config` - Validated configuration
    /// * `store` - Client used to execute scripts
    /// * `cache` - Names preloaded for completion
    pub fn new(config: &Config, store: Arc<dyn StoreClient>, cache: NameCache) -> Self {
        let provider = Arc::new(CachedCandidateProvider::new(Arc::new(cache)));
        let triggers = Triggers::from_config(&config.completion);

        Self {
            engine: CompletionEngine::new(provider, triggers),
            executor: CommandExecutor::new(store),
            documentation: DocumentationStore::new(config.documentation.directory.clone()),
        }
    }
}

/// Language server backend
pub struct Backend {
    client: Client,
    documents: DocumentStore,
    services: Services,
}

impl Backend {
    pub fn new(client: Client, services: Services) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            services,
        }
    }

    /// Send one execution outcome to the editor
    async fn report(&self, outcome: &ExecutionOutcome) {
        let message = outcome.to_string();
        match outcome {
            ExecutionOutcome::Reply(_) => self.client.log_message(MessageType::LOG, message).await,
            ExecutionOutcome::Nil => self.client.log_message(MessageType::ERROR, message).await,
            ExecutionOutcome::Failed(_) => {
                self.client.show_message(MessageType::ERROR, message).await
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        info!("initialize");

        Ok(InitializeResult {
            capabilities: capabilities(),
            server_info: Some(ServerInfo {
                name: "redis-lsp".into(),
                version: Some(crate::VERSION.into()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "redis-lsp initialized")
            .await;
    }

    async fn shutdown(&self) -> jsonrpc::Result<()> {
        info!("shutdown");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        debug!(uri = %doc.uri, "did_open");
        self.documents.set(doc.uri, doc.text).await;
        let open = self.documents.len().await;
        debug!(open, "tracking documents");
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents.set(uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!(uri = %params.text_document.uri, "did_close");
        self.documents.remove(&params.text_document.uri).await;
        if self.documents.is_empty().await {
            debug!("no open documents");
        }
    }

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> jsonrpc::Result<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        let uri = params.text_document_position.text_document.uri;
        let text = self.documents.get(&uri).await.unwrap_or_default();

        let line = position.line as usize;
        let character = char_column(&text, line, position.character as usize);
        let completion = self.services.engine.complete(&text, line, character);

        Ok(Some(CompletionResponse::Array(completion_items(completion))))
    }

    async fn completion_resolve(&self, mut item: CompletionItem) -> jsonrpc::Result<CompletionItem> {
        match self.services.documentation.markdown(&item.label) {
            Ok(value) => {
                item.documentation = Some(Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value,
                }));
            }
            // Keys and users have no documentation.
            Err(e) => debug!(label = %item.label, error = %e, "no documentation"),
        }

        Ok(item)
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> jsonrpc::Result<Option<Value>> {
        if params.command != EXECUTE_COMMAND {
            return Err(jsonrpc::Error::invalid_params(format!(
                "unknown command: {}",
                params.command
            )));
        }

        let text = script_argument(&params.arguments)?;

        let outcomes = match self.services.executor.run(text).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                warn!(error = %e, "script could not be run");
                vec![ExecutionOutcome::Failed(e.to_string())]
            }
        };

        for outcome in &outcomes {
            self.report(outcome).await;
        }

        Ok(None)
    }
}

/// Serve the editor protocol over stdin/stdout until the client exits
pub async fn serve_stdio(services: Services) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::new(client, services));
    Server::new(stdin, stdout, socket).serve(service).await;
}

fn capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(true),
            ..CompletionOptions::default()
        }),
        execute_command_provider: Some(ExecuteCommandOptions {
            commands: vec![EXECUTE_COMMAND.to_string()],
            ..ExecuteCommandOptions::default()
        }),
        ..ServerCapabilities::default()
    }
}

/// Convert engine output into protocol items
fn completion_items(completion: Completion) -> Vec<CompletionItem> {
    let kind = match completion.context {
        CompletionContext::Command { .. } => CompletionItemKind::KEYWORD,
        CompletionContext::User | CompletionContext::Key => CompletionItemKind::VALUE,
    };

    completion
        .candidates
        .into_iter()
        .map(|label| CompletionItem {
            label,
            kind: Some(kind),
            ..CompletionItem::default()
        })
        .collect()
}

/// Convert a UTF-16 column on `line` into a column counted in chars.
///
/// Columns past the end of the line, or on a line that does not exist, are
/// kept as they are.
fn char_column(text: &str, line: usize, utf16_column: usize) -> usize {
    let Some(content) = text.split('\n').nth(line) else {
        return utf16_column;
    };

    let mut units = 0;
    for (index, ch) in content.chars().enumerate() {
        if units >= utf16_column {
            return index;
        }
        units += ch.len_utf16();
    }

    let chars = content.chars().count();
    chars + utf16_column.saturating_sub(units)
}

/// The script text carried as the first command argument
fn script_argument(arguments: &[Value]) -> jsonrpc::Result<&str> {
    arguments
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| jsonrpc::Error::invalid_params(ExecutionError::MissingArgument.to_string()))
}
